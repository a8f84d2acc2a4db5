use serde::Serialize;
use serde_json::Value;

use crate::view::view_model::RepeatKind;

/// Row operation requested by a repeating layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListActionKind {
    Add,
    Delete,
}

impl ListActionKind {
    pub fn from_name(name: &str) -> Option<ListActionKind> {
        match name {
            "add" => Some(ListActionKind::Add),
            "delete" => Some(ListActionKind::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn error(title: impl ToString, message: impl ToString) -> Self {
        Toast {
            title: title.to_string(),
            message: message.to_string(),
            variant: ToastVariant::Error,
        }
    }

    pub fn success(title: impl ToString, message: impl ToString) -> Self {
        Toast {
            title: title.to_string(),
            message: message.to_string(),
            variant: ToastVariant::Success,
        }
    }
}

/// Title shown by the surrounding container for the open work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleInfo {
    pub case_name: String,
    /// Short case id, the part after the case class prefix.
    pub case_id: String,
    pub case_key: String,
    pub assignment_id: String,
    pub action: String,
}

/// Notifications raised for the surrounding UI, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ContainerEvent {
    FieldChanged {
        reference: String,
        value: Value,
    },
    #[serde(rename = "listactionevent")]
    ListAction {
        reference_type: RepeatKind,
        reference: String,
        action: ListActionKind,
    },
    WorkItemSelected {
        assignment_id: String,
        case_id: String,
    },
    WorkObjectClosed {
        assignment_id: Option<String>,
        case_id: Option<String>,
    },
    WorkObjectCreated {
        case_id: String,
    },
    RefreshAssignments,
    ChangeTitle(TitleInfo),
    Toast(Toast),
}
