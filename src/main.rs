//! YAFB command line.
//!
//! Runs one build, then prints the collected operation log to stdout. The log
//! is printed on failure too, before exiting with a non-zero status.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use yafb::{BuildConfig, Builder};

#[derive(Parser)]
#[command(name = "yafb")]
#[command(about = "Inline HTML components and scope embedded CSS", long_about = None)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frontend source directory (default: ./frontend)
    #[arg(short, long)]
    frontend: Option<PathBuf>,

    /// Build output directory (default: ./dist)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Directory searched for component fragments (default: the frontend directory)
    #[arg(long)]
    components_dir: Option<PathBuf>,

    /// File name suffix marking a component fragment (default: .components.html)
    #[arg(short, long)]
    suffix: Option<String>,

    /// Do not collect or print the operation log
    #[arg(long)]
    no_log: bool,

    /// Write a JSON build report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> yafb::Result<BuildConfig> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::load(path)?,
            None => BuildConfig::default(),
        };

        if let Some(frontend) = &self.frontend {
            config.frontend = frontend.clone();
        }
        if let Some(out) = &self.out {
            config.build_dir = out.clone();
        }
        if let Some(dir) = &self.components_dir {
            config.components_dir = Some(dir.clone());
        }
        if let Some(suffix) = &self.suffix {
            config.components_suffix = suffix.clone();
        }
        if self.no_log {
            config.log = false;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    println!(
        "YAFB(Yet Another Frontend Builder) V{}\n",
        env!("CARGO_PKG_VERSION")
    );

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let builder = Builder::new(config);
    let result = builder.build();

    for line in builder.logs() {
        println!("{}", line);
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &cli.report {
        let written = serde_json::to_string_pretty(&report)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("error: failed to write report '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
