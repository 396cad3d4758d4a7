//! Readiness evaluation: progress, composite score and gate state.
//!
//! Everything here is derived on demand from the current [`Checklist`].
//! Nothing is cached, so a result can never drift from the checklist it
//! was computed from; callers re-evaluate after every mutation.
//!
//! Two gates are supported:
//!
//! ```text
//! Simple (pre-procedure):   Incomplete ──all critical done──▶ Ready
//!
//! Scored (discharge):       Incomplete ──any progress──▶ Monitoring
//!                                                         │
//!                          all critical done AND score ≥ threshold
//!                                                         ▼
//!                                                 DischargeEligible
//! ```
//!
//! There is no hysteresis: toggling an item back or lowering a score
//! moves the state back on the next evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checklist::Checklist;

/// Completed and total item counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completion as a whole percentage, rounded half up. An empty set is
    /// 100% complete.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        (self.completed as f64 / self.total as f64 * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Progress of a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryProgress {
    pub category: String,
    pub progress: Progress,
}

/// Sum of all sub-score values against the sum of their maxima.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompositeScore {
    pub total: u32,
    pub max: u32,
}

/// Derived readiness summary of a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessResult {
    /// Per-category progress, categories in first-seen order.
    pub categories: Vec<CategoryProgress>,
    pub overall: Progress,
    /// Progress over critical items only.
    pub critical: Progress,
    pub score: CompositeScore,
    /// Every critical item is completed (vacuously true with none).
    pub critical_gate_satisfied: bool,
    /// The composite score meets the configured threshold (true when no
    /// threshold applies).
    pub score_gate_satisfied: bool,
}

impl ReadinessResult {
    /// Progress of one category, if it exists.
    pub fn category(&self, name: &str) -> Option<Progress> {
        self.categories
            .iter()
            .find(|c| c.category == name)
            .map(|c| c.progress)
    }
}

/// Which gate a checklist is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "gate")]
pub enum GatePolicy {
    /// Open once every critical item is complete.
    Simple,
    /// Open once every critical item is complete and the composite score
    /// reaches `threshold`. Without a threshold the score gate is always
    /// satisfied.
    Scored { threshold: Option<u32> },
}

/// States of the simple gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PreProcedureState {
    Incomplete,
    Ready,
}

/// States of the scored gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DischargeState {
    /// Nothing has been recorded yet.
    Incomplete,
    /// Assessment under way; at least one gate is still closed.
    Monitoring,
    DischargeEligible,
}

/// State of whichever gate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateState {
    PreProcedure(PreProcedureState),
    Discharge(DischargeState),
}

impl GateState {
    /// Whether the downstream action (submit / discharge) is permitted.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            GateState::PreProcedure(PreProcedureState::Ready)
                | GateState::Discharge(DischargeState::DischargeEligible)
        )
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            GateState::PreProcedure(PreProcedureState::Incomplete) => "Incomplete",
            GateState::PreProcedure(PreProcedureState::Ready) => "Ready",
            GateState::Discharge(DischargeState::Incomplete) => "Incomplete",
            GateState::Discharge(DischargeState::Monitoring) => "Continue monitoring",
            GateState::Discharge(DischargeState::DischargeEligible) => "Discharge eligible",
        }
    }
}

/// A reason the gate is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "blocker")]
pub enum GateBlocker {
    /// Some critical items are not completed yet.
    CriticalItemsIncomplete { remaining: usize },
    /// The composite score is under the threshold.
    ScoreBelowThreshold { score: u32, threshold: u32 },
}

impl fmt::Display for GateBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateBlocker::CriticalItemsIncomplete { remaining } => {
                write!(f, "Critical items must be completed ({} remaining)", remaining)
            }
            GateBlocker::ScoreBelowThreshold { score, threshold } => {
                write!(f, "Composite score must be at least {} (currently {})", threshold, score)
            }
        }
    }
}

/// Computes [`ReadinessResult`]s and gate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessEvaluator {
    policy: GatePolicy,
}

impl ReadinessEvaluator {
    pub fn new(policy: GatePolicy) -> Self {
        Self { policy }
    }

    /// Evaluator for the pre-procedure gate.
    pub fn simple() -> Self {
        Self::new(GatePolicy::Simple)
    }

    /// Evaluator for the discharge gate with a score threshold.
    pub fn scored(threshold: u32) -> Self {
        Self::new(GatePolicy::Scored {
            threshold: Some(threshold),
        })
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Derive the readiness summary of `checklist`.
    pub fn evaluate(&self, checklist: &Checklist) -> ReadinessResult {
        let items = checklist.items();

        let categories = checklist
            .categories()
            .into_iter()
            .map(|category| {
                let in_category = items.iter().filter(|item| item.category == category);
                let (completed, total) = in_category.fold((0, 0), |(done, total), item| {
                    (done + usize::from(item.completed), total + 1)
                });
                CategoryProgress {
                    category: category.to_string(),
                    progress: Progress { completed, total },
                }
            })
            .collect();

        let overall = Progress {
            completed: items.iter().filter(|item| item.completed).count(),
            total: items.len(),
        };

        let score = CompositeScore {
            total: items.iter().map(|item| item.score_total()).sum(),
            max: items.iter().map(|item| item.score_max()).sum(),
        };

        let critical = items
            .iter()
            .filter(|item| item.critical)
            .fold(Progress::default(), |progress, item| Progress {
                completed: progress.completed + usize::from(item.completed),
                total: progress.total + 1,
            });

        let score_gate_satisfied = match self.policy {
            GatePolicy::Simple | GatePolicy::Scored { threshold: None } => true,
            GatePolicy::Scored {
                threshold: Some(threshold),
            } => score.total >= threshold,
        };

        ReadinessResult {
            categories,
            overall,
            critical,
            score,
            critical_gate_satisfied: critical.is_complete(),
            score_gate_satisfied,
        }
    }

    /// Gate state implied by an already computed result.
    pub fn state_of(&self, result: &ReadinessResult) -> GateState {
        match self.policy {
            GatePolicy::Simple => {
                if result.critical_gate_satisfied {
                    GateState::PreProcedure(PreProcedureState::Ready)
                } else {
                    GateState::PreProcedure(PreProcedureState::Incomplete)
                }
            }
            GatePolicy::Scored { .. } => {
                if result.critical_gate_satisfied && result.score_gate_satisfied {
                    GateState::Discharge(DischargeState::DischargeEligible)
                } else if result.overall.completed == 0 && result.score.total == 0 {
                    GateState::Discharge(DischargeState::Incomplete)
                } else {
                    GateState::Discharge(DischargeState::Monitoring)
                }
            }
        }
    }

    /// Why the gate is closed, critical items first. Empty when it is open.
    pub fn blockers(&self, result: &ReadinessResult) -> Vec<GateBlocker> {
        let mut blockers = Vec::new();
        if !result.critical_gate_satisfied {
            blockers.push(GateBlocker::CriticalItemsIncomplete {
                remaining: result.critical.total - result.critical.completed,
            });
        }
        if let GatePolicy::Scored {
            threshold: Some(threshold),
        } = self.policy
        {
            if !result.score_gate_satisfied {
                blockers.push(GateBlocker::ScoreBelowThreshold {
                    score: result.score.total,
                    threshold,
                });
            }
        }
        blockers
    }

    /// Evaluate `checklist` and return its gate state.
    pub fn state(&self, checklist: &Checklist) -> GateState {
        self.state_of(&self.evaluate(checklist))
    }
}
