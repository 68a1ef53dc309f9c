use crate::fingerprint::Fingerprint;

/// Lifecycle of one mounted section's change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Mounted but not rendered yet; nothing seeded.
    Uninitialized,
    /// Seeded. `inbound` is the value the parent is believed to hold (seen
    /// at the last downward check, or pushed by us since), `emitted` the
    /// last value the parent is known to hold from us.
    Ready {
        inbound: Option<Fingerprint>,
        emitted: Fingerprint,
    },
}

/// Decision of a downward-sync check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// External value identical to the last one seen.
    Unchanged,
    /// External value changed but is local state or our own last emission:
    /// the parent merged what we reported.
    Echo,
    /// Genuinely new external data; local state must be replaced.
    Replace,
}

/// Two independent comparisons, one per direction.
///
/// A value pulled from the parent is recorded as emitted too, so it is
/// never pushed back up; a value pushed up is recognised as an echo when it
/// comes back down.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    state: DetectorState,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self {
            state: DetectorState::Uninitialized,
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, DetectorState::Ready { .. })
    }

    /// Uninitialized -> Ready. The seed counts as already emitted, so the
    /// first render after mount does not report the initial value upward.
    pub fn seed(&mut self, seed: Fingerprint, inbound: Option<Fingerprint>) {
        self.state = DetectorState::Ready {
            inbound,
            emitted: seed,
        };
    }

    /// Downward check against the parent's current value.
    pub fn inbound(&mut self, external: Fingerprint, local: Fingerprint) -> Inbound {
        let (inbound, emitted) = match self.state {
            DetectorState::Uninitialized => {
                self.seed(external, Some(external));
                return if external == local {
                    Inbound::Unchanged
                } else {
                    Inbound::Replace
                };
            }
            DetectorState::Ready { inbound, emitted } => (inbound, emitted),
        };

        if inbound == Some(external) {
            return Inbound::Unchanged;
        }
        if external == local || external == emitted {
            self.state = DetectorState::Ready {
                inbound: Some(external),
                emitted,
            };
            return Inbound::Echo;
        }
        self.state = DetectorState::Ready {
            inbound: Some(external),
            emitted: external,
        };
        Inbound::Replace
    }

    /// Upward check. True exactly once per distinct local value; the caller
    /// must then notify the parent, which from then on holds `local`.
    pub fn outbound(&mut self, local: Fingerprint) -> bool {
        match self.state {
            DetectorState::Uninitialized => {
                self.seed(local, None);
                false
            }
            DetectorState::Ready { emitted, .. } if emitted == local => false,
            DetectorState::Ready { .. } => {
                self.state = DetectorState::Ready {
                    inbound: Some(local),
                    emitted: local,
                };
                true
            }
        }
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Snapshot;
    use crate::models::{Row, TableState};

    fn fp(row_id: &str) -> Fingerprint {
        TableState::new(vec![], vec![Row::new(row_id)]).fingerprint()
    }

    #[test]
    fn test_seed_is_not_reemitted() {
        let mut detector = ChangeDetector::new();
        assert!(!detector.is_ready());
        detector.seed(fp("a"), Some(fp("a")));
        assert!(detector.is_ready());
        assert!(!detector.outbound(fp("a")));
    }

    #[test]
    fn test_outbound_once_per_distinct_value() {
        let mut detector = ChangeDetector::new();
        detector.seed(fp("a"), None);
        assert!(detector.outbound(fp("b")));
        assert!(!detector.outbound(fp("b")));
        assert!(detector.outbound(fp("c")));
        assert!(detector.outbound(fp("b")));
    }

    #[test]
    fn test_echo_of_own_emission() {
        let mut detector = ChangeDetector::new();
        detector.seed(fp("a"), Some(fp("a")));
        assert!(detector.outbound(fp("b")));
        // Parent merged "b" and re-rendered.
        assert_eq!(detector.inbound(fp("b"), fp("b")), Inbound::Unchanged);
        assert!(!detector.outbound(fp("b")));
    }

    #[test]
    fn test_pushed_value_is_not_taken_for_new_data() {
        let mut detector = ChangeDetector::new();
        detector.seed(fp("a"), Some(fp("a")));
        assert!(detector.outbound(fp("b")));
        // Edited again before the parent rendered: the parent still holds "b".
        assert_eq!(detector.inbound(fp("b"), fp("c")), Inbound::Unchanged);
        assert!(detector.outbound(fp("c")));
    }

    #[test]
    fn test_own_emission_seen_late_is_an_echo() {
        let mut detector = ChangeDetector::new();
        // Seeded from the template while the parent had nothing yet.
        detector.seed(fp("a"), None);
        // Parent now holds the seed; the section has been edited since.
        assert_eq!(detector.inbound(fp("a"), fp("c")), Inbound::Echo);
        assert!(detector.outbound(fp("c")));
    }

    #[test]
    fn test_reload_of_original_after_push_replaces() {
        let mut detector = ChangeDetector::new();
        detector.seed(fp("saved"), Some(fp("saved")));
        assert!(detector.outbound(fp("edited")));
        assert_eq!(
            detector.inbound(fp("saved"), fp("edited")),
            Inbound::Replace
        );
        assert!(!detector.outbound(fp("saved")));
    }

    #[test]
    fn test_replace_is_not_pushed_back() {
        let mut detector = ChangeDetector::new();
        detector.seed(fp("a"), Some(fp("a")));
        assert_eq!(detector.inbound(fp("loaded"), fp("a")), Inbound::Replace);
        // Local now holds "loaded".
        assert!(!detector.outbound(fp("loaded")));
    }

    #[test]
    fn test_unchanged_external_does_not_override_local_edits() {
        let mut detector = ChangeDetector::new();
        detector.seed(fp("a"), Some(fp("a")));
        assert_eq!(detector.inbound(fp("a"), fp("edited")), Inbound::Unchanged);
    }

    #[test]
    fn test_inbound_before_seed_seeds() {
        let mut detector = ChangeDetector::new();
        assert_eq!(detector.inbound(fp("x"), fp("y")), Inbound::Replace);
        assert_eq!(
            detector.state(),
            DetectorState::Ready {
                inbound: Some(fp("x")),
                emitted: fp("x"),
            }
        );
    }
}
