use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::api_model::DataPageResult;
use crate::api::error::CaseError;
use crate::store::path::expand_relative_path;
use crate::store::reference_store::{ReferenceStore, decode_html, is_blank, value_to_text};
use crate::view::view_model::{ControlMode, DataPageParam, FieldDescriptor, ListSource};

/// One selectable choice of a dropdown, radio group or autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub label: String,
    pub value: String,
}

/// Request to re-resolve a dependent field's options after one of its
/// parameter sources changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshRequest {
    pub refresh: bool,
    /// Name of the parameter whose source is the changed field.
    pub param_key: Option<String>,
    pub param_value: Value,
    pub params: Vec<DataPageParam>,
}

/// Anything that can answer a data-page lookup.
pub trait DataPageSource {
    fn fetch_data_page(
        &self,
        data_page_id: &str,
        params: &IndexMap<String, String>,
    ) -> Result<DataPageResult, CaseError>;
}

/// What happened while resolving an option list.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    /// Options came from local metadata or the case content.
    Local,
    /// A data-page request was made and answered.
    Fetched { data_page_id: String },
    /// At least one parameter had no value, so nothing was requested.
    MissingParameters,
    /// The request failed; the error stays local to this field.
    Failed { data_page_id: String, error: String },
    /// The field has no option source.
    NoSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionLookup {
    pub options: Vec<OptionItem>,
    pub status: FetchStatus,
}

impl OptionLookup {
    fn new(options: Vec<OptionItem>, status: FetchStatus) -> Self {
        OptionLookup { options, status }
    }

    fn empty(status: FetchStatus) -> Self {
        OptionLookup::new(Vec::new(), status)
    }
}

/// Resolves the option list of a field from its first control mode.
///
/// Never fails: missing parameters and fetch errors resolve to an empty
/// list, reported through `FetchStatus`.
pub struct OptionResolver<'a> {
    source: &'a dyn DataPageSource,
    store: &'a ReferenceStore,
    case_content: Option<&'a Value>,
}

impl<'a> OptionResolver<'a> {
    pub fn new(
        source: &'a dyn DataPageSource,
        store: &'a ReferenceStore,
        case_content: Option<&'a Value>,
    ) -> Self {
        OptionResolver {
            source,
            store,
            case_content,
        }
    }

    pub fn resolve(&self, field: &FieldDescriptor, refresh: Option<&RefreshRequest>) -> OptionLookup {
        let Some(mode) = field.first_mode() else {
            return OptionLookup::empty(FetchStatus::NoSource);
        };

        if refresh.is_none()
            && !mode.data_page_params.is_empty()
            && mode.data_page_params.iter().any(|p| self.param_value(p, None).is_none())
        {
            return if mode.options.is_empty() {
                OptionLookup::empty(FetchStatus::MissingParameters)
            } else {
                OptionLookup::new(local_options(mode), FetchStatus::Local)
            };
        }

        match mode.list_source {
            Some(ListSource::DataPage) => self.from_data_page(mode, refresh),
            Some(ListSource::PageList) => OptionLookup::new(self.from_page_list(mode), FetchStatus::Local),
            Some(ListSource::LocalList) if !mode.options.is_empty() => {
                OptionLookup::new(local_options(mode), FetchStatus::Local)
            }
            // Dependent lookups are declared by data page id even when the
            // list source is omitted.
            _ if mode.data_page_id.is_some() && refresh.is_some() => self.from_data_page(mode, refresh),
            _ => OptionLookup::empty(FetchStatus::NoSource),
        }
    }

    fn from_data_page(&self, mode: &ControlMode, refresh: Option<&RefreshRequest>) -> OptionLookup {
        let Some(data_page_id) = mode.data_page_id.as_deref() else {
            return OptionLookup::empty(FetchStatus::NoSource);
        };

        let mut params = IndexMap::new();
        for param in &mode.data_page_params {
            match self.param_value(param, refresh) {
                Some(value) => {
                    params.insert(param.name.clone(), value);
                }
                None => return OptionLookup::empty(FetchStatus::MissingParameters),
            }
        }

        match self.source.fetch_data_page(data_page_id, &params) {
            Ok(result) => OptionLookup::new(
                rows_to_options(&result, mode),
                FetchStatus::Fetched {
                    data_page_id: data_page_id.to_string(),
                },
            ),
            Err(e) => OptionLookup::empty(FetchStatus::Failed {
                data_page_id: data_page_id.to_string(),
                error: e.to_string(),
            }),
        }
    }

    fn from_page_list(&self, mode: &ControlMode) -> Vec<OptionItem> {
        let (Some(page_id), Some(prompt), Some(value)) = (
            mode.clipboard_page_id.as_deref(),
            mode.clipboard_page_prompt.as_deref(),
            mode.clipboard_page_value.as_deref(),
        ) else {
            return Vec::new();
        };

        self.case_content
            .and_then(|content| content.get(page_id))
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|row| OptionItem {
                        label: row.get(prompt).map(value_to_text).unwrap_or_default(),
                        value: row.get(value).map(value_to_text).unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Live value of one lookup parameter. The refreshed parameter takes
    /// the value carried by the request; others read the store and fall
    /// back to the server's saved value.
    fn param_value(&self, param: &DataPageParam, refresh: Option<&RefreshRequest>) -> Option<String> {
        if let Some(request) = refresh {
            if request.param_key.as_deref() == Some(param.name.as_str()) {
                return Some(value_to_text(&request.param_value)).filter(|v| !v.is_empty());
            }
        }

        let value = match &param.value_reference {
            Some(value_reference) => self.store.resolve_reference(value_reference),
            None => param.value.clone().filter(|v| !v.is_empty() && v != "\"\""),
        };
        value.map(|v| decode_html(v.trim_matches('"')))
    }
}

/// `locallist` options map `{key, value}` to `{label: value, value: key}`.
pub fn local_options(mode: &ControlMode) -> Vec<OptionItem> {
    mode.options
        .iter()
        .map(|option| OptionItem {
            label: option.value.clone(),
            value: option.key.clone(),
        })
        .collect()
}

/// Map data-page rows through the mode's value and prompt properties.
/// Rows without a value are skipped.
pub fn rows_to_options(result: &DataPageResult, mode: &ControlMode) -> Vec<OptionItem> {
    let value_property = mode
        .data_page_value
        .as_deref()
        .map(expand_relative_path)
        .unwrap_or_default();
    let prompt_property = mode
        .data_page_prompt
        .as_deref()
        .map(expand_relative_path)
        .unwrap_or(value_property);

    result
        .px_results
        .iter()
        .filter_map(|row| {
            let value = row.get(value_property).filter(|v| !is_blank(v))?;
            Some(OptionItem {
                label: row.get(prompt_property).map(value_to_text).unwrap_or_default(),
                value: value_to_text(value),
            })
        })
        .collect()
}
