use lsp_types::{DiagnosticSeverity, NumberOrString, Position, Range};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value reported as the `source` of converted LSP diagnostics.
pub const DIAGNOSTIC_SOURCE: &str = "CodeScene";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Maps a report token to a severity.
    ///
    /// Unknown tokens map to [`Severity::Error`] so an unrecognized level is
    /// never downgraded to something non-actionable.
    pub fn from_token(token: &str) -> Self {
        match token {
            "info" => Severity::Info,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for DiagnosticSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => DiagnosticSeverity::INFORMATION,
            Severity::Warning => DiagnosticSeverity::WARNING,
            Severity::Error => DiagnosticSeverity::ERROR,
        }
    }
}

/// One finding (or the score summary) recovered from an analysis report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub message: String,
    pub issue_code: Option<String>,
}

impl Diagnostic {
    /// Zero-width informational diagnostic anchored at the start of the document.
    pub fn summary(message: impl Into<String>) -> Self {
        Self {
            range: Range::new(Position::new(0, 0), Position::new(0, 0)),
            severity: Severity::Info,
            message: message.into(),
            issue_code: None,
        }
    }

    pub fn is_summary(&self) -> bool {
        self.issue_code.is_none()
            && self.range.start == Position::new(0, 0)
            && self.range.end == self.range.start
    }

    pub fn to_lsp(&self) -> lsp_types::Diagnostic {
        lsp_types::Diagnostic {
            range: self.range,
            severity: Some(self.severity.into()),
            code: self.issue_code.clone().map(NumberOrString::String),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: self.message.clone(),
            ..Default::default()
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.range.start.line + 1,
            self.range.start.character + 1,
            self.severity,
            self.message
        )?;
        if let Some(code) = &self.issue_code {
            write!(f, " [{code}]")?;
        }
        Ok(())
    }
}
