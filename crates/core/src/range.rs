//! Locating a reported function name on a single source line.
//!
//! Columns are UTF-16 code units, matching `lsp_types::Position::character`.

use tracing::trace;

/// Half-open column span `[start, end)` on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnSpan {
    pub start: u32,
    pub end: u32,
}

impl ColumnSpan {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Span covering the whole of `line_text`.
    pub fn whole_line(line_text: &str) -> Self {
        Self::new(0, utf16_len(line_text))
    }
}

/// Resolves the span of `function_name` on `line_text`.
///
/// The first literal occurrence wins. Qualified names (`Type::method`,
/// `Type.method`) that do not appear verbatim are retried with their last
/// segment. When nothing matches, the whole line is returned so the finding
/// stays anchored to the reported line.
pub fn resolve(line_text: &str, function_name: &str) -> ColumnSpan {
    let name = function_name.trim();

    find_span(line_text, name)
        .or_else(|| unqualified(name).and_then(|tail| find_span(line_text, tail)))
        .unwrap_or_else(|| {
            trace!(function = name, "function name not found on line, anchoring to whole line");
            ColumnSpan::whole_line(line_text)
        })
}

fn find_span(line_text: &str, needle: &str) -> Option<ColumnSpan> {
    if needle.is_empty() {
        return None;
    }
    let byte_start = line_text.find(needle)?;
    let start = utf16_len(&line_text[..byte_start]);
    Some(ColumnSpan::new(start, start.saturating_add(utf16_len(needle))))
}

fn unqualified(name: &str) -> Option<&str> {
    let tail_start = name
        .rfind("::")
        .map(|idx| idx + 2)
        .or_else(|| name.rfind('.').map(|idx| idx + 1))?;
    let tail = &name[tail_start..];
    (!tail.is_empty()).then_some(tail)
}

pub(crate) fn utf16_len(text: &str) -> u32 {
    u32::try_from(text.encode_utf16().count()).unwrap_or(u32::MAX)
}
