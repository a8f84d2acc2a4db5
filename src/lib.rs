use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    api::{
        api_model::{DataPageResult, ViewResponse},
        error::CaseError,
    },
    view::view_model::ViewTree,
};

pub mod action;
pub mod api;
pub mod cli;
pub mod container;
pub mod graph;
pub mod options;
pub mod registry;
pub mod store;
pub mod trace;
pub mod view;

/// Read a view from a JSON file holding either a bare view tree or a
/// `{"view": ...}` response.
pub fn load_view_file(path: &str) -> Result<ViewTree, CaseError> {
    let raw = read_json(path)?;
    if raw.get("view").is_some_and(Value::is_object) {
        let response: ViewResponse = parse(raw, path)?;
        Ok(response.view)
    } else {
        parse(raw, path)
    }
}

/// Read canned data-page answers keyed by data page id.
pub fn load_option_table(path: &str) -> Result<IndexMap<String, DataPageResult>, CaseError> {
    parse(read_json(path)?, path)
}

fn read_json(path: &str) -> Result<Value, CaseError> {
    let text = std::fs::read_to_string(path).map_err(|e| CaseError::Io {
        path: path.to_string(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| CaseError::JsonParse {
        context: path.to_string(),
        source: e,
    })
}

fn parse<T: serde::de::DeserializeOwned>(raw: Value, path: &str) -> Result<T, CaseError> {
    serde_json::from_value(raw).map_err(|e| CaseError::JsonParse {
        context: path.to_string(),
        source: e,
    })
}
