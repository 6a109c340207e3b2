//! Local consent list state
//!
//! One state machine per list-bearing view: transitions are triggered only
//! by the retrieval and mutation operations on the workflow, so the UI
//! never observes a partially-updated list.

use medledger_core::Consent;

/// State of the displayed consent list
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// Last fetch succeeded
    Loaded(Vec<Consent>),
    /// Last fetch failed; the list is empty
    Failed(String),
}

impl ListState {
    /// The consents currently displayable (empty unless loaded)
    pub fn consents(&self) -> &[Consent] {
        match self {
            ListState::Loaded(consents) => consents,
            _ => &[],
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ListState::Loaded(_))
    }

    /// The error message of a failed fetch, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            ListState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_loaded_exposes_consents() {
        assert!(ListState::Idle.consents().is_empty());
        assert!(ListState::Loading.consents().is_empty());
        assert!(ListState::Failed("boom".into()).consents().is_empty());
        assert!(ListState::Loaded(vec![]).is_loaded());
    }

    #[test]
    fn test_error_accessor() {
        assert_eq!(ListState::Failed("timeout".into()).error(), Some("timeout"));
        assert_eq!(ListState::Idle.error(), None);
    }
}
