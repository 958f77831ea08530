// #![forbid(unsafe_code)]
// #![deny(non_upper_case_globals)]
// #![deny(non_camel_case_types)]
// #![deny(non_snake_case)]
// #![deny(unused_mut)]
// #![deny(unused_variables)]
// #![deny(dead_code)]
// #![deny(unused_imports)]
//#![deny(missing_docs)]
//#![deny(warnings)]

extern crate chrono;
extern crate derivative;
extern crate lazy_static;
extern crate reqwest;
extern crate serde_derive;

#[macro_use]
extern crate log;

#[macro_use]
extern crate derive_builder;

mod configuration;
mod connection;
mod error;
mod newman;
mod reporter;
mod testrail;
mod time;

use log::LevelFilter;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;
use structopt::StructOpt;

use self::{
    configuration::command_line::Opt,
    configuration::Configuration,
    connection::http::build_client,
    error::{Error, Result},
    newman::Summary,
    reporter::{DryRun, Reporter, SyncReport},
    testrail::TestRailApi,
};

fn main() {
    let options = Opt::from_args();

    if let Err(e) = init_logging(options.log_level(), &options.log_output_file) {
        eprintln!("Failed to initialize logging {}", e);
        exit(1);
    }

    let config = match Configuration::from_env(options.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };
    debug!("Initiated configuration {:#?}", config);

    if let Err(e) = run(&options, &config) {
        error!("{}", e);
        exit(1);
    }
}

fn run(options: &Opt, config: &Configuration) -> Result<()> {
    let summary = Summary::from_file(&options.file)?;
    let client = Arc::new(build_client(config.timeout)?);
    let reporter = Reporter::new(config, TestRailApi::new(client, config));

    if options.dry_run {
        let results = reporter.aggregate(&summary)?;
        let json = serde_json::to_string_pretty(&DryRun { results: &results })
            .map_err(Error::Export)?;
        println!("{}", json);
        return Ok(());
    }

    if let Some((run, results)) = reporter.on_complete(&summary)? {
        info!("Results synced to run {}", run.run_id);
        if let Some(path) = &options.output {
            write_report(path, &SyncReport {
                run_id: &run.run_id,
                url: &run.url,
                results: &results,
            })?;
        }
    }
    Ok(())
}

fn write_report(path: &Path, report: &SyncReport) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report).map_err(Error::Export)?;
    debug!("Sync report written to {}", path.display());
    Ok(())
}

fn init_logging(level: LevelFilter, output: &Option<PathBuf>) -> Result<()> {
    let mut dispatcher = fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(log_file) = output {
        dispatcher = dispatcher.chain(fern::log_file(log_file)?)
    }
    dispatcher
        .apply()
        .map_err(|e| Error::Configuration(e.to_string()))?;
    info!("Logging level {} enabled", level);
    Ok(())
}
