mod check;

use clap::{Parser, Subcommand, ValueEnum};
use codehealth_core::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codehealth",
    version,
    about = "Run a code health analysis tool against source files",
    long_about = "Feeds a source file to the code health analysis tool, parses its report into \
                  diagnostics and prints them as inline annotations or JSON."
)]
pub struct Cli {
    /// JSON settings file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Analysis tool executable (overrides settings and CODEHEALTH_TOOL)
    #[arg(long, global = true, value_name = "PATH")]
    pub tool: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file and print its diagnostics
    Check {
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Analyze a file and print only its code health score
    Score {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .with_env_overrides();
    if let Some(tool) = cli.tool {
        settings.tool_path = tool;
    }

    let _guard = codehealth_core::logging::init_logging("cli", settings.log_filter(), cli.verbose);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Check { path, format } => rt.block_on(check::run(settings, path, format)),
        Commands::Score { path } => rt.block_on(check::score(settings, path)),
    }
}
