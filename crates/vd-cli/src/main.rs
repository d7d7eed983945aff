//! Part drawing batch tool
//!
//! # Commands
//!
//! - `vd run <batch.ron>` - Draw the selected parts of a batch file
//! - `vd init-config <path>` - Write a default configuration file

mod batch_file;
mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use vd_host::{BatchDriver, DirectoryExporter, DraftConfig, MemoryHost, RunMode};

use batch_file::BatchFile;
use report::ReportSummary;

/// Standard multi-view drawings for parts
#[derive(Parser)]
#[command(name = "vd")]
#[command(about = "Generate standard part drawings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the selected parts of a batch file
    Run {
        /// Batch file (RON) with templates, parts and selection
        batch: PathBuf,

        /// Configuration file (RON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured run mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Override the configured output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Override the configured sheet template name
        #[arg(long)]
        template: Option<String>,

        /// Draw every part in the batch file, ignoring its selection
        #[arg(long)]
        all: bool,

        /// Write a JSON summary here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write the file
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    DryRun,
    Export,
    Persist,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::DryRun => RunMode::DryRun,
            ModeArg::Export => RunMode::Export,
            ModeArg::Persist => RunMode::Persist,
        }
    }
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vd=info,vd_host=info,vd_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            batch,
            config,
            mode,
            output,
            template,
            all,
            report,
        } => {
            let mut config = match config {
                Some(path) => DraftConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => DraftConfig::default(),
            };
            if let Some(mode) = mode {
                config.mode = mode.into();
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(template) = template {
                config.template_name = template;
            }
            config.validate()?;

            run(&config, &batch, all, report)
        }
        Commands::InitConfig { path } => {
            DraftConfig::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn run(
    config: &DraftConfig,
    batch_path: &Path,
    all: bool,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let batch = BatchFile::load(batch_path)?;
    let selection = batch.selection(all);
    let mut host = MemoryHost::new(batch.into_document());
    let mut exporter = DirectoryExporter::new(config.raster);

    tracing::info!(
        "Running {} with template '{}' into {}",
        config.mode,
        config.template_name,
        config.output_dir.display()
    );

    let report = match BatchDriver::new(config).run(&mut host, &mut exporter, &selection) {
        Ok(report) => report,
        Err(e) if e.is_cancellation() => {
            println!("Cancelled: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e).context("Batch aborted"),
    };

    print!("{}", report);
    if let Some(path) = report_path {
        ReportSummary::from(&report).write(&path)?;
        tracing::info!("Wrote report to {}", path.display());
    }
    Ok(())
}
