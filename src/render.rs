use crate::{
    config::Format,
    orchestrator::RequestState,
    report::{Report, TokenUsage},
    sections::{self, Section},
};
use anyhow::Result;
use regex::Regex;
use serde::Serialize;

pub const IDLE_HINT: &str = "Select a company to view its latest comprehensive financial analysis";
pub const LOADING_HINT: &str = "Generating comprehensive financial report...";

/// What the screen shows for a successful report.
///
/// The first parsed section is the executive summary; its heading is chrome
/// and is never shown. Every later section keeps its title as a heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub title: String,
    pub company: String,
    pub summary: String,
    pub sections: Vec<Section>,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub label: &'static str,
    pub value: String,
}

impl ReportView {
    pub fn from_report(company: &str, report: &Report) -> Self {
        let mut parsed = sections::parse(&report.raw).into_iter();
        let summary = parsed.next().map(|s| s.content).unwrap_or_default();
        Self {
            title: format!("{company} - Financial Analysis Report"),
            company: company.to_string(),
            summary,
            sections: parsed.collect(),
            usage: report.token_usage,
        }
    }

    pub fn stat_lines(&self) -> Vec<StatLine> {
        vec![
            StatLine {
                label: "Total Tokens",
                value: group_thousands(self.usage.total_tokens),
            },
            StatLine {
                label: "Prompt Tokens",
                value: group_thousands(self.usage.prompt_tokens),
            },
            StatLine {
                label: "Completion Tokens",
                value: group_thousands(self.usage.completion_tokens),
            },
            StatLine {
                label: "API Requests",
                value: self.usage.successful_requests.to_string(),
            },
        ]
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn render(view: &ReportView, format: Format) -> Result<String> {
    match format {
        Format::Text => render_text(view),
        Format::Markdown => Ok(render_markdown(view)),
        Format::Json => Ok(serde_json::to_string_pretty(view)?),
    }
}

/// Renders whichever state is active. A failure renders only the error
/// banner; a success renders only the report.
pub fn render_state(company: &str, state: &RequestState, format: Format) -> Result<String> {
    match state {
        RequestState::Succeeded(report) => render(&ReportView::from_report(company, report), format),
        RequestState::Failed(msg) => match format {
            Format::Json => Ok(serde_json::to_string_pretty(
                &serde_json::json!({ "error": msg }),
            )?),
            Format::Markdown => Ok(format!("### Error\n\n{msg}\n")),
            Format::Text => Ok(format!("Error\n{msg}\n")),
        },
        RequestState::Loading => Ok(format!("{LOADING_HINT}\n")),
        RequestState::Idle => Ok(format!("{IDLE_HINT}\n")),
    }
}

pub fn render_markdown(view: &ReportView) -> String {
    let mut out = format!("# {}\n\n", view.title);
    if !view.summary.is_empty() {
        out.push_str(&view.summary);
        out.push('\n');
    }
    for s in &view.sections {
        out.push_str(&format!("## {}\n\n", s.title));
        if !s.content.is_empty() {
            out.push_str(&s.content);
            out.push('\n');
        }
    }

    let stats = view.stat_lines();
    let labels: Vec<&str> = stats.iter().map(|s| s.label).collect();
    let values: Vec<&str> = stats.iter().map(|s| s.value.as_str()).collect();
    out.push_str(&format!("| {} |\n", labels.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(stats.len())));
    out.push_str(&format!("| {} |\n", values.join(" | ")));
    out
}

pub fn render_text(view: &ReportView) -> Result<String> {
    let emphasis = Regex::new(r"\*\*|__")?;
    let heading = Regex::new(r"(?m)^#{1,6} ")?;
    let plain = |md: &str| -> String {
        let s = emphasis.replace_all(md, "");
        heading.replace_all(&s, "").trim_end().to_string()
    };

    let mut out = heading_block(&view.title, '=');
    if !view.summary.is_empty() {
        out.push_str(&format!("{}\n\n", plain(&view.summary)));
    }
    for s in &view.sections {
        out.push_str(&heading_block(&s.title, '-'));
        if !s.content.is_empty() {
            out.push_str(&format!("{}\n\n", plain(&s.content)));
        }
    }

    let stats = view.stat_lines();
    let width = stats.iter().map(|s| s.label.len()).max().unwrap_or(0);
    for s in &stats {
        out.push_str(&format!("{:<width$}  {:>12}\n", s.label, s.value));
    }
    Ok(out)
}

fn heading_block(title: &str, rule: char) -> String {
    let len = title.chars().count().max(1);
    format!("{title}\n{}\n\n", rule.to_string().repeat(len))
}
