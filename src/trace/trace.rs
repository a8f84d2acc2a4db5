use serde::Serialize;
use sha1::{Digest, Sha1};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::view::view_model::{FieldIndex, ViewTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    ViewLoaded,
    FieldChanged,
    Propagate,
    MirrorWrite,
    OptionFetch,
    StaleResult,
    Action,
    Transition,
    Validation,
    Error,
}

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub state: String,
    pub kind: TraceKind,

    pub reference: Option<String>,
    pub index: Option<FieldIndex>,
    pub detail: Option<String>,

    pub view_fingerprint: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, state: impl ToString, kind: TraceKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            state: state.to_string(),
            kind,
            reference: None,
            index: None,
            detail: None,
            view_fingerprint: None,
        }
    }

    pub fn with_reference(mut self, reference: impl ToString) -> Self {
        self.reference = Some(reference.to_string());
        self
    }

    pub fn with_index(mut self, index: FieldIndex) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: Option<&str>) -> Self {
        self.view_fingerprint = fingerprint.map(str::to_string);
        self
    }
}

/// SHA-1 hex digest of the serialized view, identifying which view a trace
/// line was produced against.
pub fn view_fingerprint(view: &ViewTree) -> String {
    let bytes = serde_json::to_vec(view).unwrap_or_default();
    let digest = Sha1::digest(&bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
