//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use covenant_domain::{DocumentAnalysis, DocumentType, Grade, Priority, Severity};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an analysis.
    pub fn format_analysis(&self, analysis: &DocumentAnalysis) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(analysis)?),
            OutputFormat::Table => Ok(self.format_analysis_table(analysis)),
            OutputFormat::Quiet => Ok(format!(
                "{} {}",
                analysis.risk_score.overall,
                analysis.risk_score.grade.as_str()
            )),
        }
    }

    /// Format a classification result.
    pub fn format_classification(&self, filename: &str, document_type: DocumentType) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "filename": filename,
                "document_type": document_type,
            }))?),
            OutputFormat::Table => Ok(format!(
                "{}: {}",
                filename,
                self.colorize(document_type.display_name(), "cyan")
            )),
            OutputFormat::Quiet => Ok(document_type.as_str().to_string()),
        }
    }

    fn format_analysis_table(&self, analysis: &DocumentAnalysis) -> String {
        let score = &analysis.risk_score;
        let mut sections = vec![format!(
            "{} ({})  Risk score: {}/100  Grade: {}",
            analysis.filename,
            analysis.document_type.display_name(),
            score.overall,
            self.colorize(score.grade.as_str(), grade_color(score.grade)),
        )];

        let mut breakdown = Builder::default();
        breakdown.push_record(["Missing Clauses", "Unfavorable Terms", "Compliance", "Liability"]);
        breakdown.push_record([
            score.breakdown.missing_clauses.to_string(),
            score.breakdown.unfavorable_terms.to_string(),
            score.breakdown.compliance_issues.to_string(),
            score.breakdown.liability_exposure.to_string(),
        ]);
        sections.push(styled(breakdown));

        if analysis.risks.is_empty() {
            sections.push(self.colorize("No risks found.", "green"));
        } else {
            let mut risks = Builder::default();
            risks.push_record(["Severity", "Category", "Title"]);
            for risk in &analysis.risks {
                risks.push_record([
                    self.colorize(risk.severity.as_str(), severity_color(risk.severity)),
                    risk.category.as_str().to_string(),
                    risk.title.clone(),
                ]);
            }
            sections.push(styled(risks));
        }

        if !analysis.missing_terms.is_empty() {
            let mut terms = Builder::default();
            terms.push_record(["Missing Term", "Importance", "Impact"]);
            for term in &analysis.missing_terms {
                terms.push_record([
                    term.term.clone(),
                    term.importance.as_str().to_string(),
                    term.impact.clone(),
                ]);
            }
            sections.push(styled(terms));
        }

        if !analysis.blockers.is_empty() {
            let mut blockers = Builder::default();
            blockers.push_record(["Blocker", "Type", "Required Action"]);
            for blocker in &analysis.blockers {
                blockers.push_record([
                    blocker.title.clone(),
                    blocker.blocker_type.as_str().to_string(),
                    blocker.required_action.clone(),
                ]);
            }
            sections.push(styled(blockers));
        }

        if !analysis.required_actions.is_empty() {
            let mut actions = Builder::default();
            actions.push_record(["Priority", "Action", "Reason"]);
            for action in &analysis.required_actions {
                actions.push_record([
                    self.colorize(action.priority.as_str(), priority_color(action.priority)),
                    action.action.clone(),
                    action.reason.clone(),
                ]);
            }
            sections.push(styled(actions));
        }

        sections.push(analysis.summary.clone());
        sections.join("\n\n")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn grade_color(grade: Grade) -> &'static str {
    match grade {
        Grade::A | Grade::B => "green",
        Grade::C => "yellow",
        Grade::D | Grade::F => "red",
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "blue",
        Severity::Medium => "yellow",
        Severity::High | Severity::Critical => "red",
    }
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "red",
        Priority::High => "magenta",
        Priority::Medium => "yellow",
        Priority::Low => "blue",
    }
}
