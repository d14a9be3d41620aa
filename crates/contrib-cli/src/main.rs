//! CLI application for contribution ledger OCR processing.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, extract_images, parse_dir, parse_image};

/// Contribution ledger OCR - turn scanned ledger pages into records
#[derive(Parser)]
#[command(name = "contrib")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the embedded page images of a PDF
    ExtractContributionImages(extract_images::ExtractImagesArgs),

    /// OCR a single page image and print its records as JSON
    ParseImage(parse_image::ParseImageArgs),

    /// OCR every page image of a directory into a CSV file
    ParseImagesDir(parse_dir::ParseDirArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr; stdout carries command output.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::ExtractContributionImages(args) => {
            extract_images::run(args, cli.config.as_deref()).await
        }
        Commands::ParseImage(args) => parse_image::run(args, cli.config.as_deref()).await,
        Commands::ParseImagesDir(args) => parse_dir::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
