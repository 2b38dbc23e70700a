use std::fmt;

use serde::Serialize;

use crate::db::entities::employee;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Onboarded,
    Updated,
    Offboarded,
    Reboarded,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionKind::Onboarded => "onboarded",
            TransitionKind::Updated => "updated",
            TransitionKind::Offboarded => "offboarded",
            TransitionKind::Reboarded => "reboarded",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emitted after a transition has been committed.
#[derive(Debug, Clone)]
pub struct TransitionEvent {
    pub kind: TransitionKind,
    pub employee: employee::Model,
    pub actor: String,
}

/// Receives committed transitions. Publishing must not block and must not
/// fail the transition.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: TransitionEvent);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::{EventSink, TransitionEvent, TransitionKind};

    #[derive(Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<TransitionEvent>>,
    }

    impl RecordingSink {
        pub fn kinds(&self) -> Vec<TransitionKind> {
            self.events
                .lock()
                .map(|events| events.iter().map(|event| event.kind).collect())
                .unwrap_or_default()
        }
    }

    impl EventSink for RecordingSink {
        fn publish(&self, event: TransitionEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event);
            }
        }
    }
}
