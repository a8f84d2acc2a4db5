use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::view::view_model::ViewTree;

// ============================================================================
// Case engine payloads
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentAction {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A unit of work routed to an operator, associated with one case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub actions: Vec<AssignmentAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A tracked business transaction with stages and status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseInfo {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub content: Value,
    /// Taken from the response `etag` header, not the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewResponse {
    #[serde(default)]
    pub view: ViewTree,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformResult {
    #[serde(rename = "nextAssignmentID", default, skip_serializing_if = "Option::is_none")]
    pub next_assignment_id: Option<String>,
    #[serde(rename = "nextPageID", default, skip_serializing_if = "Option::is_none")]
    pub next_page_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateCaseRequest {
    #[serde(rename = "caseTypeID")]
    pub case_type_id: String,
    #[serde(rename = "processID")]
    pub process_id: String,
    pub content: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatedCase {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nextAssignmentID", default, skip_serializing_if = "Option::is_none")]
    pub next_assignment_id: Option<String>,
}

/// Rows returned by a data-page lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPageResult {
    #[serde(rename = "pxResults", default)]
    pub px_results: Vec<Map<String, Value>>,
}

/// Body of refresh, perform and save requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBody {
    pub content: Value,
}

// ============================================================================
// Error payloads
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    #[serde(rename = "Path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "ValidationMessage", default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "ValidationMessages", default, skip_serializing_if = "Option::is_none")]
    pub validation_messages: Option<Vec<ValidationMessage>>,
}

/// Structured error body returned by the case engine on a failed call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorPayload {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

impl ApiErrorPayload {
    /// The first error carries field-level validation messages.
    pub fn is_validation(&self) -> bool {
        self.errors
            .first()
            .is_some_and(|e| e.validation_messages.is_some())
    }

    pub fn validation(id: &str, message: &str, messages: Vec<ValidationMessage>) -> Self {
        ApiErrorPayload {
            errors: vec![ApiError {
                id: id.to_string(),
                message: message.to_string(),
                validation_messages: Some(messages),
            }],
        }
    }
}
