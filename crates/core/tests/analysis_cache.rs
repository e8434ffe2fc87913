mod common;

use codehealth_core::{AnalysisError, AnalyzedDocument, Analyzer, Severity, TextDocument};
use common::{FakeRunner, REPORT, SOURCE};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const TOOL: &str = "cs";

fn analyzer(runner: &Arc<FakeRunner>) -> Analyzer {
    Analyzer::new(runner.clone())
}

fn document() -> TextDocument {
    TextDocument::new("/work/src/extension.ts", 1, SOURCE)
}

#[tokio::test]
async fn concurrent_checks_share_one_run() {
    let runner = Arc::new(FakeRunner::reporting(REPORT).gated());
    let analyzer = analyzer(&runner);
    let doc = document();

    let first = analyzer.check(Path::new(TOOL), &doc, false);
    let second = analyzer.check(Path::new(TOOL), &doc, false);
    assert!(first.ptr_eq(&second));

    let entry = analyzer
        .cache()
        .get(doc.path(), 1)
        .expect("entry for current version");
    assert!(entry.peek().is_none(), "run should still be pending");

    runner.release(1);
    let (a, b) = tokio::join!(first, second);
    let (a, b) = (a.expect("first result"), b.expect("second result"));

    assert_eq!(runner.calls(), 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.len(), 2);
    assert_eq!(a[1].severity, Severity::Warning);
    assert_eq!(a[1].issue_code.as_deref(), Some("complex-fn"));
}

#[tokio::test]
async fn settled_result_is_reused_for_same_version() {
    let runner = Arc::new(FakeRunner::reporting(REPORT));
    let analyzer = analyzer(&runner);
    let doc = document();

    let first = analyzer.check(Path::new(TOOL), &doc, false).await.unwrap();
    let second = analyzer.check(Path::new(TOOL), &doc, false).await.unwrap();

    assert_eq!(runner.calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn edit_invalidates_cached_run() {
    let runner = Arc::new(FakeRunner::reporting(REPORT));
    let analyzer = analyzer(&runner);
    let mut doc = document();

    let before = analyzer.check(Path::new(TOOL), &doc, false).await.unwrap();
    doc.set_content(format!("{SOURCE}// edited\n"));
    let after = analyzer.check(Path::new(TOOL), &doc, false).await.unwrap();

    assert_eq!(runner.calls(), 2);
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(analyzer.cache().version_of(doc.path()), Some(2));
    assert_eq!(analyzer.cache().len(), 1);
}

#[tokio::test]
async fn skip_cache_always_runs() {
    let runner = Arc::new(FakeRunner::reporting(REPORT));
    let analyzer = analyzer(&runner);
    let doc = document();

    analyzer.check(Path::new(TOOL), &doc, false).await.unwrap();
    analyzer.check(Path::new(TOOL), &doc, true).await.unwrap();
    let rerun = analyzer.check(Path::new(TOOL), &doc, true);
    let cached = analyzer.check(Path::new(TOOL), &doc, false);

    assert!(rerun.ptr_eq(&cached), "skip_cache run replaces the cache entry");
    rerun.await.unwrap();
    assert_eq!(runner.calls(), 3);
}

#[tokio::test]
async fn failed_run_is_cached_for_its_version() {
    let runner = Arc::new(FakeRunner::failing(2));
    let analyzer = analyzer(&runner);
    let doc = document();

    let first = analyzer.check(Path::new(TOOL), &doc, false).await;
    let second = analyzer.check(Path::new(TOOL), &doc, false).await;

    let (first, second) = (first.unwrap_err(), second.unwrap_err());
    assert!(Arc::ptr_eq(&first, &second));
    assert!(matches!(
        first.as_ref(),
        AnalysisError::Execution { code: Some(2), .. }
    ));
    assert_eq!(runner.calls(), 1);

    // an explicit re-run is the only retry
    let retried = analyzer.check(Path::new(TOOL), &doc, true).await;
    assert!(retried.is_err());
    assert_eq!(runner.calls(), 2);
}

#[tokio::test]
async fn superseded_run_still_settles() {
    let runner = Arc::new(FakeRunner::reporting(REPORT).gated());
    let analyzer = analyzer(&runner);
    let mut doc = document();

    let stale = analyzer.check(Path::new(TOOL), &doc, false);
    doc.set_content(SOURCE);
    let fresh = analyzer.check(Path::new(TOOL), &doc, false);
    assert!(!stale.ptr_eq(&fresh));
    assert!(analyzer.cache().get(doc.path(), 1).is_none());

    runner.release(2);
    let (stale, fresh) = tokio::join!(stale, fresh);
    assert_eq!(stale.unwrap().len(), 2);
    assert_eq!(fresh.unwrap().len(), 2);
    assert_eq!(runner.calls(), 2);
}

#[tokio::test]
async fn documents_are_cached_independently() {
    let runner = Arc::new(FakeRunner::reporting(REPORT));
    let analyzer = analyzer(&runner);
    let a = TextDocument::new("/work/src/a.ts", 1, SOURCE);
    let b = TextDocument::new("/work/src/b.ts", 1, SOURCE);

    analyzer.check(Path::new(TOOL), &a, false).await.unwrap();
    analyzer.check(Path::new(TOOL), &b, false).await.unwrap();
    analyzer.check(Path::new(TOOL), &a, false).await.unwrap();

    assert_eq!(runner.calls(), 2);
    assert_eq!(analyzer.cache().len(), 2);
}

#[tokio::test]
async fn invocation_carries_text_extension_and_directory() {
    let runner = Arc::new(FakeRunner::reporting(""));
    let analyzer = Analyzer::new(runner.clone()).with_leading_args(vec!["--quiet".to_string()]);
    let doc = document();

    let diagnostics = analyzer
        .check(Path::new("/opt/cs"), &doc, false)
        .await
        .unwrap();
    assert!(diagnostics.is_empty());

    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 1);
    let invocation = &invocations[0];
    assert_eq!(invocation.program, PathBuf::from("/opt/cs"));
    assert_eq!(invocation.args, vec!["--quiet", "check", "-f", "ts"]);
    assert_eq!(invocation.working_dir, Some(PathBuf::from("/work/src")));
    assert_eq!(&*invocation.stdin, SOURCE);
}

#[tokio::test]
async fn stale_line_numbers_skip_only_that_finding() {
    let report = "\
info: x:1: Code health score: 7.0
warning: x:2:bad-fn:complex-fn Complex function
warning: x:400:gone:large-method Large Method
error: x:3:missing:deep-nesting Deep, Nested Complexity
";
    let runner = Arc::new(FakeRunner::reporting(report));
    let analyzer = analyzer(&runner);

    let diagnostics = analyzer
        .check(Path::new(TOOL), &document(), false)
        .await
        .unwrap();

    let codes: Vec<_> = diagnostics
        .iter()
        .map(|d| d.issue_code.as_deref())
        .collect();
    assert_eq!(codes, vec![None, Some("complex-fn"), Some("deep-nesting")]);
    // "missing" is not on line 3 ("}"), so the whole line is covered
    assert_eq!(diagnostics[2].range.start.character, 0);
    assert_eq!(diagnostics[2].range.end.character, 1);
}
