// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use vreq_core::batch::{load_prompts, process_batch};
use vreq_core::{CatalogKind, ExtractorConfig, Pipeline, RequestBody};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the extractor config (JSON)
    #[arg(short, long, env = "VREQ_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the fuzzy match threshold (1-100)
    #[arg(short, long, global = true)]
    threshold: Option<u8>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn one prompt into a request body
    Parse {
        prompt: String,
        /// Resolve relative dates against this day instead of today (YYYY-MM-DD)
        #[arg(short, long)]
        reference_date: Option<NaiveDate>,
        /// Emit one request body per model type code
        #[arg(long)]
        split: bool,
        /// Print the unvalidated extraction to stderr
        #[arg(long)]
        explain: bool,
    },
    /// Process every prompt in a CSV column
    Batch {
        csv: PathBuf,
        #[arg(long, default_value = "prompt")]
        column: String,
        #[arg(short, long)]
        reference_date: Option<NaiveDate>,
    },
    /// Ask for prompts until one is accepted
    Interactive {
        #[arg(short, long)]
        reference_date: Option<NaiveDate>,
    },
    /// List the model type and option catalogs
    Catalog,
    /// Write the default config to the config path
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(ExtractorConfig::default_path);

    match cli.command {
        Commands::Parse {
            prompt,
            reference_date,
            split,
            explain,
        } => {
            let pipeline = load_pipeline(&config_path, cli.threshold)?;
            let reference = reference_date.unwrap_or_else(today);
            if explain {
                let extraction = pipeline.extract_at(&prompt, reference);
                eprintln!("{}", serde_json::to_string_pretty(&extraction)?);
            }
            match pipeline.process_at(&prompt, reference) {
                Ok(body) => print_body(&body, split)?,
                Err(rejection) => {
                    println!("{}", serde_json::to_string_pretty(&rejection)?);
                    std::process::exit(2);
                }
            }
        }
        Commands::Batch {
            csv,
            column,
            reference_date,
        } => {
            let pipeline = load_pipeline(&config_path, cli.threshold)?;
            let prompts = load_prompts(&csv, &column)
                .with_context(|| format!("Failed to read prompts from {:?}", csv))?;
            let rows = process_batch(&pipeline, &prompts, reference_date.unwrap_or_else(today));
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Interactive { reference_date } => {
            let pipeline = load_pipeline(&config_path, cli.threshold)?;
            interactive(&pipeline, reference_date.unwrap_or_else(today))?;
        }
        Commands::Catalog => {
            let pipeline = load_pipeline(&config_path, cli.threshold)?;
            print_catalog(&pipeline);
        }
        Commands::InitConfig { force } => init_config(&config_path, force)?,
    }

    Ok(())
}

fn load_pipeline(path: &Path, threshold: Option<u8>) -> Result<Pipeline> {
    log::info!("[Config] Using {:?}", path);
    let mut config = ExtractorConfig::load(path)
        .with_context(|| format!("Failed to load config from {:?}", path))?;
    if let Some(threshold) = threshold {
        config = config.with_threshold(threshold);
    }
    Pipeline::new(config).context("Invalid extractor configuration")
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Logger already initialized: {}", e);
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_body(body: &RequestBody, split: bool) -> Result<()> {
    if split {
        println!("{}", serde_json::to_string_pretty(&body.per_model_type())?);
    } else {
        println!("{}", serde_json::to_string_pretty(body)?);
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }
    ExtractorConfig::default().save(path)?;
    println!("Wrote default config to {:?}", path);
    Ok(())
}

fn print_catalog(pipeline: &Pipeline) {
    let catalog = &pipeline.config().catalog;
    for (title, kind) in [
        ("Model types", CatalogKind::ModelType),
        ("Options", CatalogKind::Option),
    ] {
        println!("{}:", title);
        for entry in catalog.entries(kind) {
            match &entry.description {
                Some(description) => println!("  {:<8} {}", entry.code, description),
                None => println!("  {}", entry.code),
            }
        }
    }
}

fn interactive(pipeline: &Pipeline, reference: NaiveDate) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter the prompt: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let prompt = line.context("Failed to read from stdin")?;

        match pipeline.process_at(&prompt, reference) {
            Ok(body) => {
                println!("Request Body:\n{}", serde_json::to_string_pretty(&body)?);
                return Ok(());
            }
            Err(rejection) => {
                println!("{}", serde_json::to_string_pretty(&rejection)?);
                println!("Try again!\n");
            }
        }
    }
}
