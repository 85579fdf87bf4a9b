//! Render a research record as a markdown report or as JSON.

use crate::error::Result;
use crate::record::ResearchRecord;

/// Output format for a finished report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Markdown,
    Json,
}

/// Render `record` in the requested format.
pub fn render(record: &ResearchRecord, format: Format) -> Result<String> {
    match format {
        Format::Markdown => Ok(render_markdown(record)),
        Format::Json => render_json(record),
    }
}

/// Pretty-printed JSON, keys in record field order.
pub fn render_json(record: &ResearchRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// The human-readable dossier.
pub fn render_markdown(record: &ResearchRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# Candidate Research: {}", record.name));
    lines.push(String::new());

    lines.push("## TL;DR".to_string());
    lines.push(record.tldr.clone());
    lines.push(String::new());

    lines.push("## Career Timeline".to_string());
    if record.career_timeline.is_empty() {
        lines.push("*No career timeline information available*".to_string());
    } else {
        lines.push("| Years | Company | Role | Company Context |".to_string());
        lines.push("|-------|---------|------|-----------------|".to_string());
        for role in &record.career_timeline {
            lines.push(format!(
                "| {} | {} | {} | {} |",
                escape_table_cell(&role.years),
                escape_table_cell(&role.company),
                escape_table_cell(&role.role),
                escape_table_cell(&role.company_context),
            ));
        }
    }
    lines.push(String::new());

    lines.push("## Founder History".to_string());
    if record.founder_history.trim().is_empty() {
        lines.push("*No founder history found*".to_string());
    } else {
        lines.push(record.founder_history.clone());
    }
    lines.push(String::new());

    let presence = &record.public_presence;
    lines.push("## Public Presence".to_string());
    lines.push(format!("- **GitHub**: {}", presence.github));
    lines.push(format!("- **Twitter/X**: {}", presence.twitter));
    lines.push(format!("- **Writing**: {}", presence.writing));
    lines.push(format!("- **Talks**: {}", presence.talks));
    lines.push(String::new());

    lines.push("## Referral Paths".to_string());
    bullets(&mut lines, &record.referral_paths, "*No referral paths identified*");
    lines.push(String::new());

    // An empty list here is a finding, so it gets a bullet, not a placeholder.
    lines.push("## Red Flags".to_string());
    bullets(&mut lines, &record.red_flags, "- No red flags detected");
    lines.push(String::new());

    lines.push("## Suggested Interview Questions".to_string());
    if record.interview_questions.is_empty() {
        lines.push("*No specific interview questions generated*".to_string());
    } else {
        for (i, question) in record.interview_questions.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, question));
        }
    }
    lines.push(String::new());

    lines.join("\n")
}

fn bullets(lines: &mut Vec<String>, items: &[String], empty: &str) {
    if items.is_empty() {
        lines.push(empty.to_string());
    } else {
        lines.extend(items.iter().map(|item| format!("- {item}")));
    }
}

/// Make text safe inside a markdown table cell: pipes are escaped, newlines
/// become spaces, outer whitespace is trimmed.
pub fn escape_table_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars() {
        match c {
            '|' => out.push_str("\\|"),
            '\r' => {}
            '\n' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}
