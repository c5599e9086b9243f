//! Required-action derivation and prioritization

use crate::finding::{BlockerType, DealBlocker, DocumentRisk, Importance, MissingTerm, Severity};
use crate::ids::FindingId;
use serde::{Deserialize, Serialize};

/// Action priority, most pressing first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must happen before anything else
    Urgent,
    /// Should happen before signing
    High,
    /// Should happen during negotiation
    Medium,
    /// Follow-up
    Low,
}

impl Priority {
    /// Sort rank (urgent 0 ... low 3)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Get the priority label
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Progress on a required action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Not started
    #[default]
    Pending,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
}

/// A prioritized remediation item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredAction {
    /// Unique identifier
    pub id: FindingId,
    /// Priority
    pub priority: Priority,
    /// What to do
    pub action: String,
    /// Why it is needed
    pub reason: String,
    /// When it is due, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Current status
    #[serde(default)]
    pub status: ActionStatus,
}

impl RequiredAction {
    fn pending(priority: Priority, action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: FindingId::new(),
            priority,
            action: action.into(),
            reason: reason.into(),
            deadline: None,
            status: ActionStatus::Pending,
        }
    }
}

fn risk_action(risk: &DocumentRisk) -> Option<RequiredAction> {
    let priority = match risk.severity {
        Severity::Critical => Priority::Urgent,
        Severity::High => Priority::High,
        Severity::Medium | Severity::Low => return None,
    };
    Some(RequiredAction::pending(
        priority,
        format!("Address: {}", risk.title),
        if risk.recommendation.is_empty() {
            risk.description.clone()
        } else {
            risk.recommendation.clone()
        },
    ))
}

fn blocker_action(blocker: &DealBlocker) -> RequiredAction {
    let priority = match blocker.blocker_type {
        BlockerType::MissingSignature => Priority::Urgent,
        _ => Priority::High,
    };
    let mut action = RequiredAction::pending(priority, blocker.required_action.clone(), blocker.description.clone());
    action.deadline = blocker.due_date.clone();
    action
}

fn term_action(term: &MissingTerm) -> Option<RequiredAction> {
    (term.importance == Importance::Required).then(|| {
        RequiredAction::pending(
            Priority::Medium,
            format!("Add {} clause", term.term),
            term.impact.clone(),
        )
    })
}

/// Derive the ranked list of required actions
///
/// Actions are generated from risks, then blockers, then missing terms, and
/// then stably sorted by priority: equal-priority actions keep their
/// generation order.
pub fn prioritize(
    risks: &[DocumentRisk],
    missing_terms: &[MissingTerm],
    blockers: &[DealBlocker],
) -> Vec<RequiredAction> {
    let mut actions: Vec<RequiredAction> = risks
        .iter()
        .filter_map(risk_action)
        .chain(blockers.iter().map(blocker_action))
        .chain(missing_terms.iter().filter_map(term_action))
        .collect();

    // Vec::sort_by_key is stable
    actions.sort_by_key(|action| action.priority.rank());
    actions
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::finding::RiskCategory;
    use proptest::prelude::*;

    const SEVERITIES: [Severity; 4] = [Severity::Low, Severity::Medium, Severity::High, Severity::Critical];

    proptest! {
        /// Property: output is sorted by rank and equal ranks keep input order
        #[test]
        fn test_prioritize_sorted_and_stable(severities in prop::collection::vec(0..4usize, 0..20)) {
            let risks: Vec<_> = severities
                .iter()
                .enumerate()
                .map(|(i, s)| DocumentRisk::new(RiskCategory::PaymentRisk, SEVERITIES[*s], format!("{}", i), "", ""))
                .collect();
            let actions = prioritize(&risks, &[], &[]);

            for pair in actions.windows(2) {
                prop_assert!(pair[0].priority.rank() <= pair[1].priority.rank());
                if pair[0].priority == pair[1].priority {
                    let a: usize = pair[0].action.trim_start_matches("Address: ").parse().unwrap();
                    let b: usize = pair[1].action.trim_start_matches("Address: ").parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
