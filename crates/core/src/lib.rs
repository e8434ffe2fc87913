//! Code health analysis pipeline for interactive editors.
//!
//! Runs an external code health tool against in-memory document text, parses
//! its report into [`Diagnostic`]s and caches one run per document version so
//! concurrent requests never start duplicate processes.

pub mod cache;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod invoker;
pub mod logging;
pub mod parser;
pub mod projection;
pub mod range;
pub mod runner;
pub mod session;

pub use cache::{AnalysisOutcome, CacheEntry, Computation, DiagnosticCache, DiagnosticSet};
pub use config::Settings;
pub use diagnostic::{Diagnostic, Severity};
pub use document::{AnalyzedDocument, DocumentView, TextDocument};
pub use error::{AnalysisError, ConfigError, Result};
pub use invoker::Analyzer;
pub use projection::{DiagnosticsProjection, PresentationEntry};
pub use runner::{CommandRunner, ProcessRunner, ToolInvocation};
pub use session::Session;
