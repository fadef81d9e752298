//! codecard CLI: render source files into code card images.
//!
//! Usage:
//!   codecard generate <FILES>...   Render one card per file
//!   codecard languages             List languages the resolver can pick
//!   codecard fonts                 List font files the locator can find

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use codecard_common::config::CardConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "codecard",
    about = "Render source files into syntax-highlighted card images",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/codecard/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one card per input file
    Generate {
        /// Source files; an argument may hold several paths separated by ';'
        #[arg(required = true)]
        files: Vec<String>,

        /// Theme: light|dark
        #[arg(long)]
        theme: Option<String>,

        /// Font name, font file path, or "builtin"
        #[arg(long)]
        font: Option<String>,

        /// Font size in pixels (falls back to 24 if not a positive integer)
        #[arg(long)]
        font_size: Option<String>,

        /// Hide the line-number gutter
        #[arg(long)]
        no_line_numbers: bool,

        /// Output file name; "{basename}" is replaced with the source name
        #[arg(short, long)]
        output: Option<String>,

        /// Directory output names are resolved against
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Add a title band with this text
        #[arg(long)]
        title: Option<String>,

        /// Extra directory to search for fonts (repeatable)
        #[arg(long = "font-dir")]
        font_dirs: Vec<PathBuf>,
    },

    /// List languages the resolver can pick
    Languages,

    /// List font files the locator can find
    Fonts {
        /// Extra directory to search for fonts (repeatable)
        #[arg(long = "font-dir")]
        font_dirs: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CardConfig::load_from(path),
        None => CardConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    codecard_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Generate {
            files,
            theme,
            font,
            font_size,
            no_line_numbers,
            output,
            output_dir,
            title,
            font_dirs,
        } => commands::generate::run(
            commands::generate::GenerateArgs {
                files,
                theme,
                font,
                font_size,
                no_line_numbers,
                output,
                output_dir,
                title,
                font_dirs,
            },
            &config,
        ),
        Commands::Languages => commands::languages::run(),
        Commands::Fonts { font_dirs } => commands::fonts::run(font_dirs, &config),
    }
}
