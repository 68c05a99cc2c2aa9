//! Score ledger and impact tiering.

use crate::domain::recommendation::{
    Contribution, ExpectedImpact, RewriteTarget, RuleKind, NO_OPTIMIZATION_NEEDED,
};

/// Display ceiling for priority scores. The raw sum is never clamped.
pub const DISPLAY_SCORE_CAP: u32 = 100;

/// Accumulates scored contributions and free-form notes per target. Every
/// point is attached to a reason that also appears in the reasoning text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    contributions: Vec<Contribution>,
    title_notes: Vec<String>,
    description_notes: Vec<String>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn award(
        &mut self,
        target: RewriteTarget,
        rule: RuleKind,
        points: u32,
        reason: impl Into<String>,
    ) {
        let reason = reason.into();
        self.notes_mut(target).push(format!("{reason} [+{points}]"));
        self.contributions.push(Contribution { target, rule, points, reason });
    }

    /// Records reasoning without points.
    pub fn note(&mut self, target: RewriteTarget, text: impl Into<String>) {
        self.notes_mut(target).push(text.into());
    }

    pub fn total(&self) -> u32 {
        self.contributions.iter().map(|contribution| contribution.points).sum()
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    pub fn into_contributions(self) -> Vec<Contribution> {
        self.contributions
    }

    pub fn title_reasoning(&self) -> String {
        join_notes(&self.title_notes)
    }

    pub fn description_reasoning(&self) -> String {
        join_notes(&self.description_notes)
    }

    fn notes_mut(&mut self, target: RewriteTarget) -> &mut Vec<String> {
        match target {
            RewriteTarget::Title => &mut self.title_notes,
            RewriteTarget::Description => &mut self.description_notes,
        }
    }
}

fn join_notes(notes: &[String]) -> String {
    if notes.is_empty() {
        NO_OPTIMIZATION_NEEDED.to_owned()
    } else {
        notes.join("; ")
    }
}

/// Turns a summed ledger into the final score and impact tier.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn finalize(&self, score_delta_sum: u32) -> (u32, ExpectedImpact) {
        (score_delta_sum, ExpectedImpact::from_score(score_delta_sum))
    }

    pub fn display_score(&self, priority_score: u32) -> u32 {
        priority_score.min(DISPLAY_SCORE_CAP)
    }
}
