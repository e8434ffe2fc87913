//! Read-only projection of a diagnostic set onto inline annotations.

use crate::diagnostic::Diagnostic;
use lsp_types::Range;
use tokio::sync::watch;

/// One inline annotation derived from a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationEntry<'a> {
    pub range: Range,
    pub label: &'a str,
    pub diagnostic: &'a Diagnostic,
}

impl<'a> PresentationEntry<'a> {
    fn from_diagnostic(diagnostic: &'a Diagnostic) -> Self {
        Self {
            range: diagnostic.range,
            label: &diagnostic.message,
            diagnostic,
        }
    }

    /// Reference a presentation layer resolves to documentation for "show more detail".
    pub fn issue_code(&self) -> Option<&'a str> {
        self.diagnostic.issue_code.as_deref()
    }
}

/// Produces presentation entries and tells consumers when to re-fetch them.
#[derive(Debug)]
pub struct DiagnosticsProjection {
    changed: watch::Sender<u64>,
}

impl Default for DiagnosticsProjection {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsProjection {
    pub fn new() -> Self {
        let (changed, _) = watch::channel(0);
        Self { changed }
    }

    /// One entry per diagnostic, in the order given. `None` yields no entries.
    pub fn entries<'a>(&self, diagnostics: Option<&'a [Diagnostic]>) -> Vec<PresentationEntry<'a>> {
        diagnostics
            .unwrap_or_default()
            .iter()
            .map(PresentationEntry::from_diagnostic)
            .collect()
    }

    /// Receiver whose value is bumped on every [`notify_changed`](Self::notify_changed).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    pub fn notify_changed(&self) {
        self.changed.send_modify(|generation| *generation += 1);
    }

    pub fn generation(&self) -> u64 {
        *self.changed.borrow()
    }
}
