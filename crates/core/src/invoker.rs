use crate::cache::{Computation, DiagnosticCache, DiagnosticSet, Lookup};
use crate::document::{AnalyzedDocument, TextDocument};
use crate::error::{AnalysisError, Result};
use crate::parser::parse_report;
use crate::runner::{CommandRunner, ProcessRunner, ToolInvocation};
use futures::FutureExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs the analysis tool against documents and caches the runs per version.
pub struct Analyzer {
    runner: Arc<dyn CommandRunner>,
    cache: DiagnosticCache,
    leading_args: Vec<String>,
}

impl Analyzer {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            cache: DiagnosticCache::new(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_process_runner() -> Self {
        Self::new(Arc::new(ProcessRunner))
    }

    /// Arguments placed before the `check` subcommand on every invocation.
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    pub fn cache(&self) -> &DiagnosticCache {
        &self.cache
    }

    /// Diagnostics for the current state of `document`.
    ///
    /// A run already started for the document's current version is returned
    /// as-is, pending or settled. Otherwise a new run starts immediately and
    /// replaces the cached one. `skip_cache` always starts a new run.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn check<D>(&self, tool_path: &Path, document: &D, skip_cache: bool) -> Computation
    where
        D: AnalyzedDocument + ?Sized,
    {
        self.dispatch(tool_path, document, skip_cache).0
    }

    pub(crate) fn dispatch<D>(
        &self,
        tool_path: &Path,
        document: &D,
        skip_cache: bool,
    ) -> (Computation, Lookup)
    where
        D: AnalyzedDocument + ?Sized,
    {
        let key = document.path();
        let version = document.version();

        if skip_cache {
            let computation = self.start(tool_path, document);
            self.cache
                .insert(key.to_path_buf(), version, computation.clone());
            return (computation, Lookup::Miss);
        }

        let (computation, lookup) =
            self.cache
                .get_or_start(key, version, || self.start(tool_path, document));
        if lookup == Lookup::Hit {
            debug!(path = %key.display(), version, "reusing cached analysis");
        }
        (computation, lookup)
    }

    fn start<D>(&self, tool_path: &Path, document: &D) -> Computation
    where
        D: AnalyzedDocument + ?Sized,
    {
        let snapshot = TextDocument::snapshot(document);
        let invocation = ToolInvocation::check(
            tool_path,
            &self.leading_args,
            snapshot.path(),
            Arc::from(snapshot.full_text()),
        );

        let handle = tokio::spawn(analyze(self.runner.clone(), invocation, snapshot));

        async move {
            match handle.await {
                Ok(result) => result.map_err(Arc::new),
                Err(err) => Err(Arc::new(AnalysisError::Task(err.to_string()))),
            }
        }
        .boxed()
        .shared()
    }
}

async fn analyze(
    runner: Arc<dyn CommandRunner>,
    invocation: ToolInvocation,
    snapshot: TextDocument,
) -> Result<DiagnosticSet> {
    let started = Instant::now();
    info!(
        path = %snapshot.path().display(),
        version = snapshot.version(),
        program = %invocation.program.display(),
        "running code health analysis"
    );

    let output = runner.run(invocation).await.inspect_err(|err| {
        warn!(path = %snapshot.path().display(), "analysis failed: {}", err);
    })?;

    let diagnostics = parse_report(&output, &snapshot);
    debug!(
        path = %snapshot.path().display(),
        version = snapshot.version(),
        count = diagnostics.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis complete"
    );

    Ok(diagnostics.into())
}
