//! Domain events
//!
//! Mutations publish one event per affected entity after the write has been
//! committed. Delivery is best-effort: the emitter never reports failure
//! back to the caller, and a lost event does not undo the mutation.

use serde_json::Value;

/// Names of the events the platform publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    TeamsAdd,
    HacksAdd,
    HacksUpdateChallengesAdd,
    HacksUpdateChallengesDelete,
    TeamsUpdateEntriesAdd,
    TeamsUpdateEntriesDelete,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TeamsAdd => "teams_add",
            Self::HacksAdd => "hacks_add",
            Self::HacksUpdateChallengesAdd => "hacks_update_challenges_add",
            Self::HacksUpdateChallengesDelete => "hacks_update_challenges_delete",
            Self::TeamsUpdateEntriesAdd => "teams_update_entries_add",
            Self::TeamsUpdateEntriesDelete => "teams_update_entries_delete",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fire-and-forget event sink.
///
/// `trigger` returns immediately; transport failures are logged by the
/// implementation and are not observable to the caller.
pub trait EventEmitter: Send + Sync + std::fmt::Debug {
    fn trigger(&self, name: EventName, payload: Value);
}

/// Emitter that drops every event, for wiring the service without a
/// broadcast endpoint configured.
#[derive(Debug, Default)]
pub struct NullEventEmitter;

impl EventEmitter for NullEventEmitter {
    fn trigger(&self, name: EventName, _payload: Value) {
        tracing::debug!(event = %name, "event broadcasting disabled, dropping event");
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Emitter that records triggered events for assertions
    #[derive(Debug, Default)]
    pub struct RecordingEmitter {
        events: Mutex<Vec<(EventName, Value)>>,
    }

    impl RecordingEmitter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<(EventName, Value)> {
            self.events.lock().unwrap().clone()
        }

        pub fn names(&self) -> Vec<EventName> {
            self.events.lock().unwrap().iter().map(|(n, _)| *n).collect()
        }

        pub fn is_empty(&self) -> bool {
            self.events.lock().unwrap().is_empty()
        }
    }

    impl EventEmitter for RecordingEmitter {
        fn trigger(&self, name: EventName, payload: Value) {
            self.events.lock().unwrap().push((name, payload));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(EventName::TeamsAdd.as_str(), "teams_add");
        assert_eq!(
            EventName::HacksUpdateChallengesAdd.as_str(),
            "hacks_update_challenges_add"
        );
        assert_eq!(
            EventName::TeamsUpdateEntriesDelete.as_str(),
            "teams_update_entries_delete"
        );
    }
}
