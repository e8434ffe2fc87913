use crate::OutputFormat;
use codehealth_core::parser::code_health_score;
use codehealth_core::{DiagnosticSet, Session, Settings, TextDocument};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

pub async fn run(settings: Settings, path: PathBuf, format: OutputFormat) -> CliResult<()> {
    let session = Session::with_process_runner(settings);
    let (path, diagnostics) = analyze(&session, &path).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&*diagnostics)?);
        }
        OutputFormat::Text => {
            for entry in session.projection().entries(Some(&diagnostics[..])) {
                let start = entry.range.start;
                let severity = entry.diagnostic.severity;
                match entry.issue_code() {
                    Some(code) => println!(
                        "{}:{}:{}: {severity}: {} [{code}]",
                        path.display(),
                        start.line + 1,
                        start.character + 1,
                        entry.label
                    ),
                    None => println!("{}: {}", path.display(), entry.label),
                }
            }
        }
    }

    Ok(())
}

pub async fn score(settings: Settings, path: PathBuf) -> CliResult<()> {
    let session = Session::with_process_runner(settings);
    let (path, diagnostics) = analyze(&session, &path).await?;

    match code_health_score(&diagnostics) {
        Some(score) => println!("{score}"),
        None => {
            warn!("no code health score reported for {}", path.display());
            return Err(format!("no code health score reported for {}", path.display()).into());
        }
    }
    Ok(())
}

async fn analyze(session: &Session, path: &Path) -> CliResult<(PathBuf, DiagnosticSet)> {
    let path = path.canonicalize()?;
    let content = std::fs::read_to_string(&path)?;
    let document = TextDocument::new(path.clone(), 1, content);

    if !session.settings().supports(&path) {
        warn!("{} is not a supported file type", path.display());
    }

    info!("Analyzing {}...", path.display());
    let diagnostics = session.check(&document, false).await?;
    info!("{} diagnostics for {}", diagnostics.len(), path.display());

    Ok((path, diagnostics))
}
