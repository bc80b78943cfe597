// ── Listener policies ──
//
// Each intent is bound to one concurrency policy for its lifetime.

use std::time::Duration;

use tokio::time::Instant;

use crate::action::Intent;

/// How a listener treats a REQUESTED action while earlier ones are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Only the latest request's result is honoured.
    Supersede,
    /// Requests inside the window after an accepted one are dropped.
    Throttle(Duration),
    /// Every request runs independently.
    Unconstrained,
}

/// Fixed behaviour of the listener for one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSpec {
    pub policy: Policy,
    /// Whether the pending decorator wraps the call.
    pub pending: bool,
}

impl ListenerSpec {
    pub fn for_intent(intent: Intent, throttle_window: Duration) -> Self {
        let policy = match intent {
            Intent::CreateReference
            | Intent::CreateOtu
            | Intent::EditOtu
            | Intent::AddIsolate
            | Intent::EditIsolate
            | Intent::AddSequence
            | Intent::EditSequence
            | Intent::CreateGroup
            | Intent::CreateSample
            | Intent::EditSample
            | Intent::Analyze
            | Intent::ClearJobs
            | Intent::InstallHmms => Policy::Throttle(throttle_window),

            Intent::RemoveReference
            | Intent::RemoveOtu
            | Intent::RemoveIsolate
            | Intent::RemoveSequence
            | Intent::SetGroupPermission
            | Intent::RemoveGroup
            | Intent::RemoveSample
            | Intent::RemoveAnalysis
            | Intent::CancelJob
            | Intent::RemoveJob
            | Intent::UpdateSettings => Policy::Unconstrained,

            _ => Policy::Supersede,
        };

        Self {
            policy,
            pending: tracks_pending(intent),
        }
    }
}

/// Intents whose in-flight operations carry a pending flag.
pub fn tracks_pending(intent: Intent) -> bool {
    matches!(
        intent,
        Intent::RemoveReference
            | Intent::ImportReference
            | Intent::RemoveOtu
            | Intent::AddIsolate
            | Intent::EditIsolate
            | Intent::SetIsolateAsDefault
            | Intent::RemoveIsolate
            | Intent::AddSequence
            | Intent::EditSequence
            | Intent::RemoveSequence
            | Intent::CreateGroup
            | Intent::SetGroupPermission
            | Intent::RemoveGroup
            | Intent::RemoveSample
            | Intent::InstallHmms
    )
}

/// Admission gate for `Policy::Throttle`.
#[derive(Debug)]
pub(crate) struct ThrottleGate {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl ThrottleGate {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// Accept the request if the window since the last accepted one has
    /// elapsed. Dropped requests do not extend the window.
    pub(crate) fn admit(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::config::DEFAULT_THROTTLE_WINDOW;

    #[test]
    fn gate_drops_inside_window() {
        let start = Instant::now();
        let mut gate = ThrottleGate::new(Duration::from_millis(300));

        assert!(gate.admit(start));
        assert!(!gate.admit(start + Duration::from_millis(100)));
        assert!(!gate.admit(start + Duration::from_millis(299)));
        assert!(gate.admit(start + Duration::from_millis(300)));
    }

    #[test]
    fn create_intents_are_throttled() {
        let spec = ListenerSpec::for_intent(Intent::CreateGroup, DEFAULT_THROTTLE_WINDOW);
        assert_eq!(spec.policy, Policy::Throttle(DEFAULT_THROTTLE_WINDOW));
        assert!(spec.pending);
    }

    #[test]
    fn fetches_supersede() {
        for intent in [Intent::ListReferences, Intent::GetOtu, Intent::FindSamples] {
            let spec = ListenerSpec::for_intent(intent, DEFAULT_THROTTLE_WINDOW);
            assert_eq!(spec.policy, Policy::Supersede, "{intent}");
            assert!(!spec.pending, "{intent}");
        }
    }

    #[test]
    fn get_and_find_intents_never_throttle() {
        for intent in Intent::iter() {
            let name = intent.as_ref();
            if name.starts_with("GET_") || name.starts_with("FIND_") || name.starts_with("LIST_") {
                let spec = ListenerSpec::for_intent(intent, DEFAULT_THROTTLE_WINDOW);
                assert_eq!(spec.policy, Policy::Supersede, "{intent}");
            }
        }
    }
}
