use case_forms::api::api_model::{Assignment, AssignmentAction, CaseInfo, DataPageResult, Stage};
use case_forms::view::view_model::{FieldDescriptor, ViewTree};
use serde_json::{Value, json};

// ============================================================================
// Field descriptors
// ============================================================================

pub fn text_input(index: usize, reference: &str, value: &str) -> Value {
    json!({
        "index": index,
        "reference": reference,
        "type": "Text",
        "value": value,
        "visible": true,
        "control": { "type": "pxTextInput", "modes": [{ "modeType": "editable" }] }
    })
}

/// A display-only field: no control modes, so no graph participation.
pub fn display_text(index: usize, reference: &str, value: &str) -> Value {
    json!({
        "index": index,
        "reference": reference,
        "type": "Text",
        "value": value,
        "visible": true,
        "control": { "type": "pxDisplayText" }
    })
}

/// Dropdown fed by a data page. `params` are `(name, source reference)`.
pub fn dropdown(index: usize, reference: &str, data_page_id: &str, params: &[(&str, &str)]) -> Value {
    let params: Vec<Value> = params
        .iter()
        .map(|(name, source)| json!({ "name": name, "valueReference": { "reference": source } }))
        .collect();
    json!({
        "index": index,
        "reference": reference,
        "type": "Text",
        "value": "",
        "visible": true,
        "control": {
            "type": "pxDropdown",
            "modes": [{
                "listSource": "datapage",
                "dataPageID": data_page_id,
                "dataPageValue": ".pyValue",
                "dataPagePrompt": ".pyLabel",
                "dataPageParams": params
            }]
        }
    })
}

/// Dropdown over a `locallist`. `options` are `(key, value)`.
pub fn local_dropdown(index: usize, reference: &str, options: &[(&str, &str)]) -> Value {
    let options: Vec<Value> = options
        .iter()
        .map(|(key, value)| json!({ "key": key, "value": value }))
        .collect();
    json!({
        "index": index,
        "reference": reference,
        "type": "Text",
        "value": "",
        "visible": true,
        "control": {
            "type": "pxDropdown",
            "modes": [{ "listSource": "locallist", "options": options }]
        }
    })
}

pub fn checkbox(index: usize, reference: &str, checked: bool) -> Value {
    json!({
        "index": index,
        "reference": reference,
        "type": "True-False",
        "value": checked,
        "visible": true,
        "control": { "type": "pxCheckbox", "modes": [{ "modeType": "editable" }] }
    })
}

pub fn date_input(index: usize, reference: &str, value: &str) -> Value {
    json!({
        "index": index,
        "reference": reference,
        "type": "Date",
        "value": value,
        "visible": true,
        "control": { "type": "pxDateTime", "modes": [{ "modeType": "editable" }] }
    })
}

pub fn required(mut field: Value) -> Value {
    field["required"] = json!(true);
    field
}

pub fn read_only(mut field: Value) -> Value {
    field["readOnly"] = json!(true);
    field
}

/// Attach one change-triggered action set.
pub fn with_actions(mut field: Value, actions: Value) -> Value {
    field["control"]["actionSets"] = json!([{ "actions": actions, "events": [{ "event": "change" }] }]);
    field
}

pub fn field(raw: Value) -> FieldDescriptor {
    serde_json::from_value(raw).expect("field fixture")
}

// ============================================================================
// Views
// ============================================================================

pub fn view_of(fields: Vec<Value>) -> ViewTree {
    let groups: Vec<Value> = fields.into_iter().map(|f| json!({ "field": f })).collect();
    serde_json::from_value(json!({ "visible": true, "groups": groups })).expect("view fixture")
}

/// Fields nested in a layout with a page-list row, to exercise traversal.
pub fn nested_view(top: Value, row_fields: Vec<Value>) -> ViewTree {
    let row_groups: Vec<Value> = row_fields.into_iter().map(|f| json!({ "field": f })).collect();
    serde_json::from_value(json!({
        "visible": true,
        "groups": [
            { "caption": { "value": "Details" } },
            { "field": top },
            {
                "layout": {
                    "groupFormat": "Grid",
                    "referenceType": "List",
                    "reference": ".Items",
                    "rows": [{ "groups": row_groups }]
                }
            }
        ]
    }))
    .expect("nested view fixture")
}

// ============================================================================
// Server payloads
// ============================================================================

/// Data-page rows with `pyLabel` / `pyValue` properties.
pub fn rows(options: &[(&str, &str)]) -> DataPageResult {
    let rows: Vec<Value> = options
        .iter()
        .map(|(label, value)| json!({ "pyLabel": label, "pyValue": value }))
        .collect();
    serde_json::from_value(json!({ "pxResults": rows })).expect("rows fixture")
}

pub fn assignment(id: &str, name: &str, actions: &[(&str, &str)]) -> Assignment {
    Assignment {
        id: id.to_string(),
        name: name.to_string(),
        actions: actions
            .iter()
            .map(|(id, name)| AssignmentAction {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect(),
    }
}

pub fn case_info(id: &str, stages: &[(&str, &str)], content: Value) -> CaseInfo {
    CaseInfo {
        id: id.to_string(),
        stages: stages
            .iter()
            .map(|(id, name)| Stage {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect(),
        stage: stages.first().map(|(id, _)| id.to_string()),
        status: Some("New".into()),
        content,
        etag: Some("\"20261018T101500.000 GMT\"".into()),
    }
}
