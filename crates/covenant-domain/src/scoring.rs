//! Risk scoring engine
//!
//! Turns findings into a 0–100 score, a four-bucket breakdown, and a letter
//! grade. Scoring is a pure reduction over a fixed category table, carried
//! out in exact quarter-point integer arithmetic so that the result does not
//! depend on the order of the inputs.
//!
//! The overall score and each breakdown bucket are capped independently
//! (100 and 25 respectively), so the buckets need not sum to the overall.

use crate::finding::{DealBlocker, DocumentRisk, Importance, MissingTerm, RiskCategory, Severity};
use serde::{Deserialize, Serialize};

/// Upper bound of the overall score
pub const MAX_OVERALL: u32 = 100;

/// Upper bound of each breakdown bucket
pub const MAX_BUCKET: u32 = 25;

/// Flat penalty added per blocker (overall only)
pub const BLOCKER_PENALTY: u32 = 5;

/// Letter grade, A best to F worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 0–20
    A,
    /// 21–40
    B,
    /// 41–60
    C,
    /// 61–80
    D,
    /// 81–100
    F,
}

impl Grade {
    /// Grade band for an overall score (inclusive upper bounds)
    pub fn from_overall(overall: u32) -> Self {
        match overall {
            0..=20 => Grade::A,
            21..=40 => Grade::B,
            41..=60 => Grade::C,
            61..=80 => Grade::D,
            _ => Grade::F,
        }
    }

    /// Get the grade letter
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// Direction of change between two scoring passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTrend {
    /// Score went down
    Improving,
    /// Score unchanged
    Stable,
    /// Score went up
    Worsening,
}

impl RiskTrend {
    /// Compare a previous overall score to the current one
    pub fn between(previous: u32, current: u32) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Less => RiskTrend::Improving,
            std::cmp::Ordering::Equal => RiskTrend::Stable,
            std::cmp::Ordering::Greater => RiskTrend::Worsening,
        }
    }
}

/// Per-bucket contributions, each capped at [`MAX_BUCKET`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Missing clauses and missing terms
    pub missing_clauses: u32,
    /// Unfavorable, termination, and payment terms
    pub unfavorable_terms: u32,
    /// Compliance issues and ambiguity
    pub compliance_issues: u32,
    /// Liability exposure
    pub liability_exposure: u32,
}

/// Result of a scoring pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Overall score in [0, 100]
    pub overall: u32,
    /// Capped breakdown buckets
    pub breakdown: ScoreBreakdown,
    /// Letter grade derived from `overall`
    pub grade: Grade,
    /// Change relative to an earlier pass, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<RiskTrend>,
}

impl RiskScore {
    /// Record the trend relative to a previous score
    pub fn with_trend_from(mut self, previous: &RiskScore) -> Self {
        self.trend = Some(RiskTrend::between(previous.overall, self.overall));
        self
    }
}

impl Default for RiskScore {
    fn default() -> Self {
        Self {
            overall: 0,
            breakdown: ScoreBreakdown::default(),
            grade: Grade::A,
            trend: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    MissingClauses,
    UnfavorableTerms,
    ComplianceIssues,
    LiabilityExposure,
}

impl Bucket {
    fn index(self) -> usize {
        match self {
            Bucket::MissingClauses => 0,
            Bucket::UnfavorableTerms => 1,
            Bucket::ComplianceIssues => 2,
            Bucket::LiabilityExposure => 3,
        }
    }
}

/// Weight and breakdown bucket for a category
fn category_profile(category: RiskCategory) -> (u32, Option<Bucket>) {
    match category {
        RiskCategory::MissingClause => (15, Some(Bucket::MissingClauses)),
        RiskCategory::UnfavorableTerms => (20, Some(Bucket::UnfavorableTerms)),
        RiskCategory::ComplianceIssue => (25, Some(Bucket::ComplianceIssues)),
        RiskCategory::LiabilityExposure => (30, Some(Bucket::LiabilityExposure)),
        RiskCategory::TerminationRisk => (15, Some(Bucket::UnfavorableTerms)),
        RiskCategory::PaymentRisk => (20, Some(Bucket::UnfavorableTerms)),
        RiskCategory::LegalAmbiguity => (10, Some(Bucket::ComplianceIssues)),
        RiskCategory::Other => (10, None),
    }
}

/// Severity multiplier expressed in quarters (low 0.25 ... critical 1.0)
fn severity_quarters(severity: Severity) -> u32 {
    match severity {
        Severity::Low => 1,
        Severity::Medium => 2,
        Severity::High => 3,
        Severity::Critical => 4,
    }
}

/// Flat penalty for a missing term, in points
pub fn missing_term_penalty(importance: Importance) -> u32 {
    match importance {
        Importance::Required => 10,
        Importance::Recommended => 5,
        Importance::Optional => 2,
    }
}

/// Contribution of a single risk in points (may be fractional)
pub fn risk_contribution(risk: &DocumentRisk) -> f64 {
    let (weight, _) = category_profile(risk.category);
    f64::from(weight * severity_quarters(risk.severity)) / 4.0
}

/// Running totals, in quarter points
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: u64,
    buckets: [u64; 4],
}

impl Tally {
    fn add(mut self, quarters: u64, bucket: Option<Bucket>) -> Self {
        self.total += quarters;
        if let Some(bucket) = bucket {
            self.buckets[bucket.index()] += quarters;
        }
        self
    }
}

/// Round a quarter-point total to whole points, halves rounding up
fn round_quarters(quarters: u64) -> u64 {
    (quarters + 2) / 4
}

fn capped(quarters: u64, cap: u32) -> u32 {
    round_quarters(quarters).min(u64::from(cap)) as u32
}

/// Score a set of findings
///
/// # Examples
///
/// ```
/// use covenant_domain::scoring::{score, Grade};
/// use covenant_domain::{DocumentRisk, RiskCategory, Severity};
///
/// let risk = DocumentRisk::new(
///     RiskCategory::LiabilityExposure,
///     Severity::Critical,
///     "Unlimited liability",
///     "",
///     "",
/// );
/// let result = score(&[risk], &[], &[]);
/// assert_eq!(result.overall, 30);
/// assert_eq!(result.breakdown.liability_exposure, 25);
/// assert_eq!(result.grade, Grade::B);
/// ```
pub fn score(risks: &[DocumentRisk], missing_terms: &[MissingTerm], blockers: &[DealBlocker]) -> RiskScore {
    let tally = risks.iter().fold(Tally::default(), |tally, risk| {
        let (weight, bucket) = category_profile(risk.category);
        tally.add(u64::from(weight * severity_quarters(risk.severity)), bucket)
    });

    let tally = missing_terms.iter().fold(tally, |tally, term| {
        tally.add(
            u64::from(missing_term_penalty(term.importance) * 4),
            Some(Bucket::MissingClauses),
        )
    });

    let tally = tally.add(blockers.len() as u64 * u64::from(BLOCKER_PENALTY * 4), None);

    let overall = capped(tally.total, MAX_OVERALL);
    let [missing, unfavorable, compliance, liability] = tally.buckets;

    RiskScore {
        overall,
        breakdown: ScoreBreakdown {
            missing_clauses: capped(missing, MAX_BUCKET),
            unfavorable_terms: capped(unfavorable, MAX_BUCKET),
            compliance_issues: capped(compliance, MAX_BUCKET),
            liability_exposure: capped(liability, MAX_BUCKET),
        },
        grade: Grade::from_overall(overall),
        trend: None,
    }
}
