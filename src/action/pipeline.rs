use serde_json::Value;

use crate::action::action_model::{ActionKind, PipelineStep, UrlTarget};
use crate::api::error::CaseError;
use crate::store::path::expand_relative_path;
use crate::store::reference_store::{ReferenceStore, decode_html, is_blank, value_to_text};
use crate::view::view_model::{FieldDescriptor, QueryParam, SetValuePair};

// ============================================================================
// Pipeline construction
// ============================================================================

/// Ordered handler chain built from a field's action sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionPipeline {
    steps: Vec<PipelineStep>,
}

/// Runs one step. The container is the only real executor.
pub trait StepExecutor {
    fn execute(&mut self, step: &PipelineStep) -> Result<(), CaseError>;
}

impl ActionPipeline {
    /// Build the chain for `field`.
    ///
    /// Actions outside the allow-list are dropped, only the first
    /// `postValue`/`refresh` becomes a server refresh, and a final
    /// `Propagate` step is always appended.
    pub fn for_field(field: &FieldDescriptor) -> Self {
        let mut steps = Vec::new();
        let mut has_refresh = false;

        let actions = field
            .control
            .action_sets
            .iter()
            .flat_map(|set| set.actions.iter());

        for action in actions {
            let Some(kind) = ActionKind::from_name(&action.action) else {
                continue;
            };
            if kind.is_server_refresh() {
                if has_refresh {
                    continue;
                }
                has_refresh = true;
            }
            let process = action.action_process.clone().unwrap_or_default();

            let step = match kind {
                ActionKind::SetValue => PipelineStep::SetValue {
                    pairs: process.set_value_pairs,
                },
                ActionKind::PostValue => PipelineStep::Refresh { refresh_for: None },
                ActionKind::Refresh => PipelineStep::Refresh {
                    refresh_for: action.refresh_for.clone(),
                },
                ActionKind::TakeAction => match process.action_name {
                    Some(action_name) => PipelineStep::PerformAction { action_name },
                    None => continue,
                },
                ActionKind::RunScript => match process.function_name {
                    Some(function_name) => PipelineStep::RunScript {
                        function_name,
                        parameters: process.function_parameters,
                    },
                    None => continue,
                },
                ActionKind::OpenUrl => PipelineStep::OpenUrl(UrlTarget {
                    alternate_domain: process.alternate_domain,
                    query_params: process.query_params,
                    window_name: process.window_name,
                    window_options: process.window_options,
                }),
            };
            steps.push(step);
        }

        steps.push(PipelineStep::Propagate);
        ActionPipeline { steps }
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the steps in order, each finishing before the next starts.
    /// Stops at the first failing step and returns its error.
    pub fn run<E: StepExecutor + ?Sized>(&self, executor: &mut E) -> Result<usize, CaseError> {
        for step in &self.steps {
            executor.execute(step)?;
        }
        Ok(self.steps.len())
    }
}

// ============================================================================
// Step data resolution
// ============================================================================

/// Target path and resolved value of one set-value pair.
pub fn resolve_set_value(store: &ReferenceStore, pair: &SetValuePair) -> (String, Value) {
    let path = expand_relative_path(&pair.name).to_string();

    let value = match &pair.value_reference {
        Some(value_reference) => {
            let reference = value_reference.reference.clone().unwrap_or_default();
            let resolved = store.resolve_property(&Value::String(reference.clone()), None);
            if is_blank(&resolved) || resolved == Value::String(reference) {
                value_reference
                    .last_saved_value
                    .as_deref()
                    .map(|saved| Value::String(decode_html(saved)))
                    .unwrap_or(Value::Null)
            } else {
                resolved
            }
        }
        None => pair
            .value
            .as_ref()
            .map(|v| store.resolve_property(v, None))
            .unwrap_or(Value::Null),
    };

    (path, value)
}

/// `name=value` pairs for query or script parameters. A static value wins;
/// otherwise the reference is resolved with its last saved value as
/// fallback.
pub fn resolve_params(store: &ReferenceStore, params: &[QueryParam]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|param| {
            let value = param
                .value
                .clone()
                .filter(|v| !v.is_empty())
                .or_else(|| {
                    let value_reference = param.value_reference.as_ref()?;
                    let reference = value_reference.reference.as_deref()?;
                    let resolved =
                        store.resolve_property(&Value::String(reference.to_string()), Some(value_reference));
                    Some(value_to_text(&resolved)).filter(|v| !v.is_empty())
                })
                .or_else(|| {
                    param
                        .value_reference
                        .as_ref()
                        .and_then(|vr| vr.last_saved_value.as_deref())
                        .map(decode_html)
                })
                .unwrap_or_default();
            (param.name.replace('"', ""), value.replace('"', ""))
        })
        .collect()
}

/// Address an open-url step points at, or None when it names no domain.
pub fn build_open_url(store: &ReferenceStore, target: &UrlTarget) -> Option<String> {
    let domain = target.alternate_domain.as_ref()?;

    let mut url = domain
        .url
        .clone()
        .filter(|u| !u.is_empty())
        .or_else(|| {
            let value_reference = domain.url_reference.as_ref()?;
            let reference = value_reference.reference.as_deref()?;
            let resolved = store.resolve_property(&Value::String(reference.to_string()), Some(value_reference));
            Some(value_to_text(&resolved)).filter(|u| !u.is_empty())
        })
        .or_else(|| {
            domain
                .url_reference
                .as_ref()
                .and_then(|vr| vr.last_saved_value.as_deref())
                .map(decode_html)
        })
        .filter(|u| !u.is_empty())?;

    if !url.starts_with("http") {
        url = format!("http://{}", url.replace('"', ""));
    }

    let query = resolve_params(store, &target.query_params)
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    Some(url)
}
