//! Line grammar of the analysis tool's textual report.
//!
//! Two shapes are recognized, tried in this order:
//!
//! - summary: `info: <path>:1: Code health score: <score>`
//! - finding: `<severity>: <path>:<line>:<function>:<issue-code> <message>`
//!
//! Everything else (banners, blank lines, findings pointing past the end of
//! the document) is skipped without error.

use crate::diagnostic::{Diagnostic, Severity};
use crate::document::DocumentView;
use crate::range;
use lsp_types::{Position, Range};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const SCORE_PREFIX: &str = "Code health score: ";

static SUMMARY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^info: .+:1: (?P<message>Code health score: .+)$")
        .expect("summary line pattern is valid")
});

// The path is matched lazily so the first `:<digits>:` is taken as the line
// number. The function token may itself contain colons (`Type::method`); the
// issue code is the part after its last colon. The message is everything after
// the whitespace that ends the issue code.
static FINDING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<severity>\w+): (?P<path>.+?):(?P<line>\d+):(?P<function>\S+):(?P<code>[^\s:]+)\s+(?P<message>.+)$",
    )
    .expect("finding line pattern is valid")
});

/// Parses one report line into a diagnostic.
pub fn parse_line<D: DocumentView + ?Sized>(line: &str, document: &D) -> Option<Diagnostic> {
    let line = line.trim_end();

    if let Some(caps) = SUMMARY_LINE.captures(line) {
        return Some(Diagnostic::summary(&caps["message"]));
    }

    let caps = FINDING_LINE.captures(line)?;

    let Some(line_index) = caps["line"]
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
    else {
        debug!(line, "skipping finding with invalid line number");
        return None;
    };

    let Some(line_text) = document.line_text(line_index) else {
        debug!(
            line,
            line_count = document.line_count(),
            "skipping finding outside of document"
        );
        return None;
    };

    let span = range::resolve(line_text, &caps["function"]);
    let line_number = u32::try_from(line_index).ok()?;

    Some(Diagnostic {
        range: Range::new(
            Position::new(line_number, span.start),
            Position::new(line_number, span.end),
        ),
        severity: Severity::from_token(&caps["severity"]),
        message: caps["message"].to_string(),
        issue_code: Some(caps["code"].to_string()),
    })
}

/// Parses a complete report, keeping output order.
pub fn parse_report<D: DocumentView + ?Sized>(output: &str, document: &D) -> Vec<Diagnostic> {
    output
        .lines()
        .filter_map(|line| parse_line(line, document))
        .collect()
}

/// Numeric code health score carried by the summary diagnostic, if any.
///
/// Accepts both `.` and `,` as decimal separator.
pub fn code_health_score(diagnostics: &[Diagnostic]) -> Option<f64> {
    diagnostics
        .iter()
        .filter(|d| d.is_summary())
        .find_map(|d| d.message.strip_prefix(SCORE_PREFIX))
        .and_then(|score| score.trim().replace(',', ".").parse().ok())
}
