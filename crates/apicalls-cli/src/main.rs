//! apicalls CLI entrypoint
//! Parses command-line arguments and runs the report pipeline.

// Internal imports (std, crate)
use std::io::{self, BufWriter, Read};
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use apicalls_core::Config;
use clap::Parser;
use tokio::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apicalls")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Report the API calls in an excon log, grouped by catalog service
    Report {
        /// Log file to read (default: standard input)
        #[arg(long)]
        input: Option<PathBuf>,
        /// File to write the report to (default: standard output)
        #[arg(long)]
        output: Option<PathBuf>,
        /// YAML file overriding the scrubbed keys and fake resource ids
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();
    match &cli.command {
        Commands::Report {
            input,
            output,
            config,
        } => {
            let config = match config {
                Some(path) => Config::from_file(path)
                    .await
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => Config::default(),
            };

            let log = match input {
                Some(path) => fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read log {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read log from standard input")?;
                    buf
                }
            };
            tracing::debug!("Read {} bytes of log", log.len());

            let report = apicalls_core::run(log.lines(), &config)
                .context("Failed to build API call report")?;

            match output {
                Some(path) => {
                    let file = std::fs::File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    report.write_to(BufWriter::new(file))?;
                }
                None => report.write_to(BufWriter::new(io::stdout().lock()))?,
            }
        }
    }
    Ok(())
}
