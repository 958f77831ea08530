use crate::configuration::constants::cargo_env::CARGO_PKG_NAME;
use clap::arg_enum;
use log::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

arg_enum! {
    #[derive(Debug)]
    pub enum LogLevel {
        Off, Error, Warn, Info, Debug, Trace,
    }
}

/// Pushes the results of a Newman run to TestRail.
///
/// TestRail settings are read from TESTRAIL_* environment variables and,
/// optionally, a settings file; the environment wins.
#[derive(StructOpt, Debug)]
#[structopt(name = CARGO_PKG_NAME)]
pub struct Opt {
    /// Newman JSON summary (`--reporters json --reporter-json-export <file>`)
    #[structopt(parse(from_os_str))]
    pub file: PathBuf,

    /// Settings file with TestRail options. Supported: YAML, JSON, TOML, HJSON
    #[structopt(long, short = "c", parse(from_os_str), env = "TESTRAIL_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Sets a logging level
    #[structopt(case_insensitive = true, long, short = "L", possible_values = &LogLevel::variants(), env = "LOG_LEVEL")]
    pub logging: Option<LogLevel>,

    /// File to which application will write logs
    #[structopt(long, short = "O", env = "LOG_OUTPUT_FILE")]
    pub log_output_file: Option<PathBuf>,

    /// Print the case results that would be sent and exit without calling TestRail
    #[structopt(long)]
    pub dry_run: bool,

    /// Write the run id, url and sent results to this file after a sync
    #[structopt(long, short = "o", parse(from_os_str))]
    pub output: Option<PathBuf>,
}

impl Opt {
    /// Level from `--logging`, `info` when unset.
    pub fn log_level(&self) -> LevelFilter {
        self.logging.as_ref().map_or(LevelFilter::Info, LevelFilter::from)
    }
}

impl From<&LogLevel> for LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
