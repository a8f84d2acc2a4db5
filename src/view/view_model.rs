use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::view::lenient;

// ============================================================================
// Server view tree
// ============================================================================

/// Identity of a field inside one view instance. Unique per view, and the
/// node identity of the dependency graph.
pub type FieldIndex = usize;

/// A server-described tree of groups, layouts and fields for one
/// assignment action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewTree {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub visible: bool,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub groups: Vec<Group>,

    #[serde(rename = "viewID", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ViewTree {
    pub fn empty() -> Self {
        ViewTree {
            visible: true,
            ..Default::default()
        }
    }
}

/// One slot of a view or layout. The server fills exactly one member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldDescriptor>,

    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,

    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub view: Option<Box<ViewTree>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<Value>,
}

/// Kind of repeating structure a layout is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatKind {
    List,
    Group,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub groups: Vec<Group>,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub rows: Vec<Row>,

    #[serde(rename = "groupFormat", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub group_format: Option<String>,

    #[serde(rename = "referenceType", default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<RepeatKind>,

    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub groups: Vec<Group>,
}

// ============================================================================
// Fields
// ============================================================================

/// A single rendered field. Immutable for one render cycle and replaced
/// wholesale when the view is refreshed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub index: Option<FieldIndex>,

    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub reference: String,

    #[serde(rename = "type", default, deserialize_with = "lenient::text_or_empty")]
    pub data_type: String,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub control: Control,

    #[serde(default)]
    pub value: Value,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub required: bool,

    #[serde(rename = "readOnly", default, deserialize_with = "lenient::or_default")]
    pub read_only: bool,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub visible: bool,

    #[serde(rename = "testID", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldDescriptor {
    /// Graph identity. Views that went through `assign_indices` always
    /// carry one.
    pub fn node(&self) -> FieldIndex {
        self.index.unwrap_or_default()
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::from_control_type(&self.control.control_type)
    }

    pub fn first_mode(&self) -> Option<&ControlMode> {
        self.control.modes.first()
    }

    /// Modeless fields never take part in dependency propagation.
    pub fn has_modes(&self) -> bool {
        !self.control.modes.is_empty()
    }

    /// Date-only fields rendered through the date-time control.
    pub fn is_date(&self) -> bool {
        self.data_type == "Date" && self.kind() == FieldKind::DateTime
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    #[serde(rename = "type", default, deserialize_with = "lenient::text_or_empty")]
    pub control_type: String,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub modes: Vec<ControlMode>,

    #[serde(rename = "actionSets", default, deserialize_with = "lenient::seq")]
    pub action_sets: Vec<ActionSet>,
}

/// Where a control draws its option list from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListSource {
    #[serde(rename = "datapage")]
    DataPage,
    #[serde(rename = "pageList")]
    PageList,
    #[serde(rename = "constant")]
    Constant,
    #[serde(rename = "locallist")]
    LocalList,
    #[serde(other)]
    Unknown,
}

/// Describes how a field sources its options and which upstream
/// references feed the lookup as parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlMode {
    #[serde(rename = "listSource", default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub list_source: Option<ListSource>,

    #[serde(rename = "dataPageID", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub data_page_id: Option<String>,

    #[serde(rename = "dataPageValue", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub data_page_value: Option<String>,

    #[serde(rename = "dataPagePrompt", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub data_page_prompt: Option<String>,

    #[serde(rename = "dataPageParams", default, deserialize_with = "lenient::seq")]
    pub data_page_params: Vec<DataPageParam>,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub options: Vec<LocalOption>,

    #[serde(rename = "clipboardPageID", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub clipboard_page_id: Option<String>,

    #[serde(rename = "clipboardPagePrompt", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub clipboard_page_prompt: Option<String>,

    #[serde(rename = "clipboardPageValue", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub clipboard_page_value: Option<String>,
}

impl ControlMode {
    /// References this mode reads its lookup parameters from.
    pub fn parameter_sources(&self) -> impl Iterator<Item = &str> {
        self.data_page_params
            .iter()
            .filter_map(|param| param.source_reference())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPageParam {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "valueReference", default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub value_reference: Option<ValueReference>,
}

impl DataPageParam {
    pub fn source_reference(&self) -> Option<&str> {
        self.value_reference
            .as_ref()
            .and_then(|vr| vr.reference.as_deref())
            .filter(|r| !r.is_empty())
    }
}

/// Pointer to another location in the case content, with the value the
/// server last saved there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueReference {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(rename = "lastSavedValue", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub last_saved_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalOption {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub value: String,
}

// ============================================================================
// Action sets
// ============================================================================

/// A field's configured list of triggered behaviors bound to UI events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSet {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub actions: Vec<ActionData>,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub events: Vec<ActionEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub event: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionData {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub action: String,

    #[serde(rename = "actionProcess", default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub action_process: Option<ActionProcess>,

    #[serde(rename = "refreshFor", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub refresh_for: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionProcess {
    #[serde(rename = "setValuePairs", default, deserialize_with = "lenient::seq")]
    pub set_value_pairs: Vec<SetValuePair>,

    #[serde(rename = "actionName", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,

    #[serde(rename = "functionName", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,

    #[serde(rename = "functionParameters", default, deserialize_with = "lenient::seq")]
    pub function_parameters: Vec<QueryParam>,

    #[serde(rename = "alternateDomain", default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub alternate_domain: Option<AlternateDomain>,

    #[serde(rename = "queryParams", default, deserialize_with = "lenient::seq")]
    pub query_params: Vec<QueryParam>,

    #[serde(rename = "windowName", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub window_name: Option<String>,

    #[serde(rename = "windowOptions", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub window_options: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetValuePair {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(rename = "valueReference", default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub value_reference: Option<ValueReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlternateDomain {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "urlReference", default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub url_reference: Option<ValueReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParam {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "valueReference", default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub value_reference: Option<ValueReference>,
}

// ============================================================================
// Field kinds
// ============================================================================

/// Closed set of control kinds the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    TextInput,
    Dropdown,
    Checkbox,
    TextArea,
    Email,
    DateTime,
    Integer,
    Percent,
    Phone,
    DisplayText,
    Hidden,
    Button,
    Label,
    Link,
    Url,
    Icon,
    RadioButtons,
    AutoComplete,
    Currency,
    Number,
    Unknown,
}

impl FieldKind {
    pub fn from_control_type(control_type: &str) -> FieldKind {
        match control_type {
            "pxTextInput" => FieldKind::TextInput,
            "pxDropdown" => FieldKind::Dropdown,
            "pxCheckbox" => FieldKind::Checkbox,
            "pxTextArea" => FieldKind::TextArea,
            "pxEmail" => FieldKind::Email,
            "pxDateTime" => FieldKind::DateTime,
            "pxInteger" => FieldKind::Integer,
            "pxPercentage" => FieldKind::Percent,
            "pxPhone" => FieldKind::Phone,
            "pxDisplayText" => FieldKind::DisplayText,
            "pxHidden" => FieldKind::Hidden,
            "pxButton" => FieldKind::Button,
            "label" => FieldKind::Label,
            "pxLink" => FieldKind::Link,
            "pxURL" => FieldKind::Url,
            "pxIcon" => FieldKind::Icon,
            "pxRadioButtons" => FieldKind::RadioButtons,
            "pxAutoComplete" => FieldKind::AutoComplete,
            "pxCurrency" => FieldKind::Currency,
            "pxNumber" => FieldKind::Number,
            _ => FieldKind::Unknown,
        }
    }

    /// Controls whose rendered input takes part in built-in validity checks.
    pub fn is_validatable(self) -> bool {
        matches!(
            self,
            FieldKind::Dropdown
                | FieldKind::TextArea
                | FieldKind::DisplayText
                | FieldKind::RadioButtons
                | FieldKind::TextInput
                | FieldKind::Integer
                | FieldKind::Url
                | FieldKind::Email
                | FieldKind::DateTime
                | FieldKind::Checkbox
        )
    }

    /// Controls that present a list of choices.
    pub fn has_options(self) -> bool {
        matches!(
            self,
            FieldKind::Dropdown | FieldKind::RadioButtons | FieldKind::AutoComplete
        )
    }
}
