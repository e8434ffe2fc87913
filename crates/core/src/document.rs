use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read access to individual lines of a document.
pub trait DocumentView {
    /// Text of the 0-based `line`, without its line terminator.
    fn line_text(&self, line: usize) -> Option<&str>;

    fn line_count(&self) -> usize;
}

/// A document as seen by the analysis pipeline: its lines plus identity,
/// version and full content.
pub trait AnalyzedDocument: DocumentView {
    /// Stable identity of the document, also its location on disk.
    fn path(&self) -> &Path;

    /// Monotonically increasing edit counter.
    fn version(&self) -> i32;

    fn full_text(&self) -> &str;
}

/// Extension of `path` without the leading dot, or an empty string.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Lightweight in-memory document with a precomputed line index.
#[derive(Debug, Clone)]
pub struct TextDocument {
    path: PathBuf,
    version: i32,
    content: Arc<str>,
    line_starts: Arc<[usize]>,
}

impl TextDocument {
    pub fn new(path: impl Into<PathBuf>, version: i32, content: impl Into<String>) -> Self {
        let content: Arc<str> = Arc::from(content.into());
        let line_starts = index_lines(&content);
        Self {
            path: path.into(),
            version,
            content,
            line_starts,
        }
    }

    /// Copies the current state of any document.
    pub fn snapshot<D: AnalyzedDocument + ?Sized>(document: &D) -> Self {
        Self::new(
            document.path().to_path_buf(),
            document.version(),
            document.full_text(),
        )
    }

    /// Replaces the content and bumps the version.
    pub fn set_content(&mut self, content: impl Into<String>) {
        let version = self.version.saturating_add(1);
        *self = Self::new(std::mem::take(&mut self.path), version, content);
    }
}

fn index_lines(content: &str) -> Arc<[usize]> {
    std::iter::once(0)
        .chain(content.match_indices('\n').map(|(idx, _)| idx + 1))
        .collect()
}

impl DocumentView for TextDocument {
    fn line_text(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.content.len());
        let text = &self.content[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

impl AnalyzedDocument for TextDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn full_text(&self) -> &str {
        &self.content
    }
}
