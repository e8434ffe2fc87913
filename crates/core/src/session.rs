use crate::cache::{AnalysisOutcome, Computation, DiagnosticCache, Lookup};
use crate::config::Settings;
use crate::document::AnalyzedDocument;
use crate::invoker::Analyzer;
use crate::projection::DiagnosticsProjection;
use crate::runner::{CommandRunner, ProcessRunner};
use futures::FutureExt;
use std::sync::Arc;
use tracing::debug;

/// Editing-session scoped analysis service.
///
/// Owns the diagnostic cache and the projection; dropping the session drops
/// every cached run.
pub struct Session {
    settings: Settings,
    analyzer: Analyzer,
    projection: Arc<DiagnosticsProjection>,
}

impl Session {
    pub fn new(settings: Settings, runner: Arc<dyn CommandRunner>) -> Self {
        let analyzer = Analyzer::new(runner).with_leading_args(settings.tool_args.clone());
        Self {
            settings,
            analyzer,
            projection: Arc::new(DiagnosticsProjection::new()),
        }
    }

    pub fn with_process_runner(settings: Settings) -> Self {
        Self::new(settings, Arc::new(ProcessRunner))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &DiagnosticCache {
        self.analyzer.cache()
    }

    pub fn projection(&self) -> &Arc<DiagnosticsProjection> {
        &self.projection
    }

    /// Analyzes `document` with the configured tool.
    ///
    /// Unsupported file types resolve to an empty set without running the tool.
    /// When a newly started run succeeds, the projection is notified.
    pub fn check<D>(&self, document: &D, skip_cache: bool) -> Computation
    where
        D: AnalyzedDocument + ?Sized,
    {
        if !self.settings.supports(document.path()) {
            debug!(path = %document.path().display(), "skipping unsupported document");
            return futures::future::ready(AnalysisOutcome::Ok(Arc::from([])))
                .boxed()
                .shared();
        }

        let (computation, lookup) =
            self.analyzer
                .dispatch(&self.settings.tool_path, document, skip_cache);

        if lookup == Lookup::Miss {
            let projection = self.projection.clone();
            let settled = computation.clone();
            tokio::spawn(async move {
                if settled.await.is_ok() {
                    projection.notify_changed();
                }
            });
        }

        computation
    }
}
