//! Startup gate: nothing is drawn and no events have side effects until the
//! host's render surface has real dimensions and its data model reports a
//! positive spectrum-region height. The two conditions must hold in the same
//! poll. Phases only move forward; once `Running` is reached the poll stops
//! for good, so a host that later becomes unready degrades per-frame instead
//! of re-entering a waiting phase.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadinessPhase {
    WaitingForSurface,
    WaitingForData,
    Running,
}

#[derive(Clone, Copy, Debug)]
pub struct Readiness {
    phase: ReadinessPhase,
}

impl Readiness {
    pub fn new() -> Self {
        Self {
            phase: ReadinessPhase::WaitingForSurface,
        }
    }

    pub fn phase(&self) -> ReadinessPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == ReadinessPhase::Running
    }

    /// One poll step. `surface_ok`: the host canvas exists with nonzero
    /// dimensions. `data_ok`: the host data model reports a positive
    /// spectrum-region height.
    pub fn advance(&mut self, surface_ok: bool, data_ok: bool) -> ReadinessPhase {
        self.phase = match self.phase {
            ReadinessPhase::WaitingForSurface => {
                if surface_ok && data_ok {
                    ReadinessPhase::Running
                } else if surface_ok {
                    ReadinessPhase::WaitingForData
                } else {
                    ReadinessPhase::WaitingForSurface
                }
            }
            ReadinessPhase::WaitingForData => {
                if surface_ok && data_ok {
                    ReadinessPhase::Running
                } else {
                    ReadinessPhase::WaitingForData
                }
            }
            ReadinessPhase::Running => ReadinessPhase::Running,
        };
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_both_conditions_simultaneously() {
        let mut r = Readiness::new();
        assert_eq!(r.advance(false, false), ReadinessPhase::WaitingForSurface);
        assert_eq!(r.advance(true, false), ReadinessPhase::WaitingForData);
        // Surface flickering away does not regress the phase.
        assert_eq!(r.advance(false, true), ReadinessPhase::WaitingForData);
        assert_eq!(r.advance(true, true), ReadinessPhase::Running);
    }

    #[test]
    fn test_running_is_terminal() {
        let mut r = Readiness::new();
        r.advance(true, true);
        assert!(r.is_running());
        assert_eq!(r.advance(false, false), ReadinessPhase::Running);
        assert_eq!(r.advance(true, false), ReadinessPhase::Running);
    }

    #[test]
    fn test_both_true_on_first_poll_runs_immediately() {
        let mut r = Readiness::new();
        assert_eq!(r.advance(true, true), ReadinessPhase::Running);
    }
}
