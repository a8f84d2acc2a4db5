use serde::{Deserialize, Serialize};

use crate::view::view_model::{AlternateDomain, QueryParam, SetValuePair};

// ============================================================================
// Action kinds
// ============================================================================

/// Action kinds a field's action sets may carry that the container acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    SetValue,
    PostValue,
    Refresh,
    TakeAction,
    RunScript,
    OpenUrl,
}

impl ActionKind {
    /// Map a server action name onto the allow-list. Anything else is
    /// ignored by the pipeline.
    pub fn from_name(name: &str) -> Option<ActionKind> {
        match name {
            "setValue" => Some(ActionKind::SetValue),
            "postValue" => Some(ActionKind::PostValue),
            "refresh" => Some(ActionKind::Refresh),
            "takeAction" => Some(ActionKind::TakeAction),
            "runScript" => Some(ActionKind::RunScript),
            "openUrlInWindow" | "openUrl" => Some(ActionKind::OpenUrl),
            _ => None,
        }
    }

    /// Kinds that post the form content back to the server.
    pub fn is_server_refresh(self) -> bool {
        matches!(self, ActionKind::PostValue | ActionKind::Refresh)
    }
}

// ============================================================================
// Pipeline steps
// ============================================================================

/// Where an open-url step takes its address from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlTarget {
    pub alternate_domain: Option<AlternateDomain>,
    pub query_params: Vec<QueryParam>,
    pub window_name: Option<String>,
    pub window_options: Option<String>,
}

/// One step of a field's handler chain, carrying only what it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStep {
    /// Write resolved values into the store and every widget at each path.
    SetValue { pairs: Vec<SetValuePair> },
    /// Post the content and replace the view with the server's answer.
    Refresh { refresh_for: Option<String> },
    /// Reload the assignment under another action.
    PerformAction { action_name: String },
    RunScript {
        function_name: String,
        parameters: Vec<QueryParam>,
    },
    OpenUrl(UrlTarget),
    /// Propagate the originating field's value through the graph.
    Propagate,
}

impl PipelineStep {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStep::SetValue { .. } => "set_value",
            PipelineStep::Refresh { .. } => "refresh",
            PipelineStep::PerformAction { .. } => "perform_action",
            PipelineStep::RunScript { .. } => "run_script",
            PipelineStep::OpenUrl(_) => "open_url",
            PipelineStep::Propagate => "propagate",
        }
    }
}
