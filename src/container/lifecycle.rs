use std::fmt;

use serde::Serialize;

use crate::api::error::CaseError;

/// Assignment/view lifecycle of one case container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContainerState {
    /// No view installed.
    Empty,
    /// Graph and store built from a fetched view, no edits yet.
    Loaded,
    /// Local edits pending, no server call outstanding.
    Editing,
    /// A load, refresh or submit call is in flight.
    Refreshing,
    /// Flow finished on a confirmation page.
    Confirming,
    /// Work item dismissed.
    Closed,
}

impl ContainerState {
    /// Allowed transitions. Staying in the same state is always allowed.
    pub fn can_transition(self, to: ContainerState) -> bool {
        use ContainerState::*;

        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (Empty, Refreshing | Closed)
                | (Loaded, Editing | Refreshing | Closed | Empty)
                | (Editing, Refreshing | Closed | Empty)
                | (Refreshing, Loaded | Editing | Confirming | Closed | Empty)
                | (Confirming, Refreshing | Closed)
                | (Closed, Refreshing)
        )
    }

    pub fn transition(self, to: ContainerState, operation: &str) -> Result<ContainerState, CaseError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(CaseError::InvalidState {
                operation: operation.to_string(),
                state: self.to_string(),
            })
        }
    }

    /// States in which field handlers may run.
    pub fn accepts_edits(self) -> bool {
        matches!(self, ContainerState::Loaded | ContainerState::Editing)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerState::Empty => "Empty",
            ContainerState::Loaded => "Loaded",
            ContainerState::Editing => "Editing",
            ContainerState::Refreshing => "Refreshing",
            ContainerState::Confirming => "Confirming",
            ContainerState::Closed => "Closed",
        };
        write!(f, "{}", name)
    }
}
