//! Dark-themed HTML report

use std::fmt::Write as _;
use std::path::PathBuf;

use restcheck_application::ports::{ReportError, ReportWriter};
use restcheck_domain::{LogLevel, Report, ReportEntry, ScenarioStatus};
use tracing::debug;

use super::{report_stem, write_file};

/// Writes `<dir>/ApiReport_<timestamp>.html`.
#[derive(Debug, Clone)]
pub struct HtmlReportWriter {
    dir: PathBuf,
}

impl HtmlReportWriter {
    /// Creates a writer targeting `dir`; the directory is created on write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File name used for `report`.
    #[must_use]
    pub fn file_name(report: &Report) -> String {
        format!("{}.html", report_stem(report))
    }

    /// Renders the complete document.
    #[must_use]
    pub fn render(report: &Report) -> String {
        let summary = report.summary();
        let finished = report
            .finished_at
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());

        let mut system_info = String::new();
        for (key, value) in &report.system_info {
            let _ = writeln!(
                system_info,
                "<tr><th>{}</th><td>{}</td></tr>",
                html_escape(key),
                html_escape(value)
            );
        }

        let mut categories: Vec<&str> = Vec::new();
        for entry in &report.entries {
            if !categories.contains(&entry.category.as_str()) {
                categories.push(&entry.category);
            }
        }

        let mut sections = String::new();
        for category in categories {
            let _ = writeln!(
                sections,
                "<section class=\"category\"><h2>{}</h2>",
                html_escape(category)
            );
            for entry in report.entries.iter().filter(|e| e.category == category) {
                sections.push_str(&render_entry(entry));
            }
            sections.push_str("</section>\n");
        }

        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ margin: 0; padding: 24px; background: #1e1e2e; color: #cdd6f4; font-family: "Segoe UI", Roboto, sans-serif; }}
        h1, h2 {{ font-weight: 500; }}
        table.info {{ border-collapse: collapse; margin-bottom: 24px; }}
        table.info th, table.info td {{ padding: 4px 12px; text-align: left; border-bottom: 1px solid #313244; }}
        .tiles {{ display: flex; gap: 12px; margin-bottom: 24px; }}
        .tile {{ background: #313244; border-radius: 6px; padding: 12px 20px; min-width: 90px; }}
        .tile .count {{ font-size: 28px; display: block; }}
        details.entry {{ background: #181825; border-left: 4px solid #6c7086; border-radius: 4px; margin: 8px 0; padding: 8px 12px; }}
        details.entry.pass {{ border-color: #a6e3a1; }}
        details.entry.fail {{ border-color: #f38ba8; }}
        details.entry.skip {{ border-color: #f9e2af; }}
        summary {{ cursor: pointer; }}
        .badge {{ display: inline-block; min-width: 40px; text-align: center; border-radius: 3px; padding: 1px 6px; margin-right: 8px; font-size: 12px; color: #11111b; }}
        .badge.pass {{ background: #a6e3a1; }}
        .badge.fail {{ background: #f38ba8; }}
        .badge.skip {{ background: #f9e2af; }}
        .meta {{ color: #a6adc8; font-size: 13px; margin: 6px 0; }}
        .error {{ color: #f38ba8; white-space: pre-wrap; }}
        .skip-reason {{ color: #f9e2af; }}
        ul.logs {{ list-style: none; padding-left: 0; font-family: "Source Code Pro", monospace; font-size: 13px; }}
        ul.logs li.pass {{ color: #a6e3a1; }}
        ul.logs li.fail {{ color: #f38ba8; }}
        ul.logs li.skip, ul.logs li.warning {{ color: #f9e2af; }}
    </style>
</head>
<body>
    <h1>{name}</h1>
    <div class="tiles">
        <div class="tile"><span class="count">{total}</span>Total</div>
        <div class="tile"><span class="count">{passed}</span>Passed</div>
        <div class="tile"><span class="count">{failed}</span>Failed</div>
        <div class="tile"><span class="count">{skipped}</span>Skipped</div>
        <div class="tile"><span class="count">{pass_rate:.1}%</span>Pass rate</div>
    </div>
    <table class="info">
        <tr><th>Run</th><td>{run_id}</td></tr>
        <tr><th>Started</th><td>{started}</td></tr>
        <tr><th>Finished</th><td>{finished}</td></tr>
{system_info}    </table>
{sections}</body>
</html>
"##,
            title = html_escape(&report.title),
            name = html_escape(&report.name),
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            pass_rate = summary.pass_rate(),
            run_id = report.run_id,
            started = report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            finished = finished,
            system_info = system_info,
            sections = sections,
        )
    }
}

impl ReportWriter for HtmlReportWriter {
    fn write(&self, report: &Report) -> Result<PathBuf, ReportError> {
        let html = Self::render(report);
        debug!(dir = %self.dir.display(), bytes = html.len(), "writing HTML report");
        write_file(&self.dir, &Self::file_name(report), html.as_bytes())
    }
}

const fn status_class(status: ScenarioStatus) -> &'static str {
    match status {
        ScenarioStatus::Passed => "pass",
        ScenarioStatus::Failed => "fail",
        ScenarioStatus::Skipped => "skip",
    }
}

const fn level_class(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "info",
        LogLevel::Pass => "pass",
        LogLevel::Fail => "fail",
        LogLevel::Skip => "skip",
        LogLevel::Warning => "warning",
    }
}

fn render_entry(entry: &ReportEntry) -> String {
    let class = status_class(entry.status);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "<details class=\"entry {class}\"{open}><summary><span class=\"badge {class}\">{label}</span>{name}</summary>",
        open = if entry.status == ScenarioStatus::Failed { " open" } else { "" },
        label = entry.status.label(),
        name = html_escape(&entry.name),
    );
    if !entry.description.is_empty() {
        let _ = writeln!(out, "<p>{}</p>", html_escape(&entry.description));
    }
    let _ = writeln!(
        out,
        "<div class=\"meta\">{worker} &middot; attempts: {attempts} &middot; {duration} ms &middot; started {started}</div>",
        worker = entry.worker,
        attempts = entry.attempts,
        duration = entry.duration_ms,
        started = entry.started_at.format("%H:%M:%S"),
    );
    if let Some(error) = &entry.error {
        let css = if entry.status == ScenarioStatus::Skipped { "skip-reason" } else { "error" };
        let _ = writeln!(out, "<div class=\"{css}\">{}</div>", html_escape(error));
    }
    if !entry.logs.is_empty() {
        out.push_str("<ul class=\"logs\">\n");
        for line in &entry.logs {
            let _ = writeln!(
                out,
                "<li class=\"{}\">[{}] {}</li>",
                level_class(line.level),
                line.at.format("%H:%M:%S%.3f"),
                html_escape(&line.message)
            );
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</details>\n");
    out
}

/// Simple HTML escape for XSS prevention.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
