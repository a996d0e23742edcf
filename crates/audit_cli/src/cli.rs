use std::path::PathBuf;

use audit_logging::LogDestination;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Run a website audit and follow its progress")]
pub struct Args {
    /// Site to audit
    pub url: String,

    /// Second site to compare against (switches to comparative mode)
    #[arg(short, long)]
    pub competitor: Option<String>,

    /// Report language code
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Backend base URL, overrides the settings file
    #[arg(long, env = "SITE_AUDIT_URL")]
    pub base_url: Option<String>,

    /// Bearer token; falls back to SITE_AUDIT_TOKEN
    #[arg(long)]
    pub token: Option<String>,

    /// Settings file (RON)
    #[arg(long, default_value = "audit.ron")]
    pub config: PathBuf,

    /// Print the raw result document as JSON
    #[arg(long)]
    pub json: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log file used by `--log file` and `--log both`
    #[arg(long, default_value = audit_logging::DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// More log output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl Args {
    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
