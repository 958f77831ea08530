pub mod log;
pub mod model;
pub mod modifier;
pub mod processor;
pub mod sender;
pub mod serialize;
pub mod title;

use crate::configuration::Configuration;
use crate::connection::Transport;
use crate::error::Result;
use crate::newman::{Execution, Summary};
use crate::testrail::TestRailApi;
use serde_derive::Serialize;

use self::model::{CaseResult, RunInfo};
use self::processor::ResultProcessor;
use self::sender::ResultSender;

/// Record of a finished sync, written with `--output`.
#[derive(Debug, Serialize)]
pub struct SyncReport<'a> {
    pub run_id: &'a str,
    pub url: &'a str,
    pub results: &'a [CaseResult],
}

/// Results produced without talking to TestRail, printed by `--dry-run`.
#[derive(Debug, Serialize)]
pub struct DryRun<'a> {
    pub results: &'a [CaseResult],
}

/// Reports one newman run to TestRail.
pub struct Reporter<'a, T> {
    config: &'a Configuration,
    api: TestRailApi<T>,
}

impl<'a, T> Reporter<'a, T>
where
    T: Transport,
{
    pub fn new(config: &'a Configuration, api: TestRailApi<T>) -> Self {
        Self { config, api }
    }

    /// Case results of every execution that ran at least one assertion.
    /// With title matching on, the case catalog is fetched first.
    pub fn aggregate(&self, summary: &Summary) -> Result<Vec<CaseResult>> {
        let mut executions: Vec<Execution> = summary
            .run
            .executions
            .iter()
            .filter(|execution| !execution.assertions.is_empty())
            .cloned()
            .collect();
        info!("Processing {} executions with assertions", executions.len());

        if self.config.title_matching {
            let catalog = self.api.get_cases()?;
            executions = modifier::resolve_titles(&catalog, &executions);
        }
        Ok(ResultProcessor::new(self.config).process(&executions))
    }

    /// Aggregates `summary` and sends the results. `None` when there was
    /// nothing to send.
    pub fn on_complete(&self, summary: &Summary) -> Result<Option<(RunInfo, Vec<CaseResult>)>> {
        let results = self.aggregate(summary)?;
        let run = ResultSender::new(&self.api, self.config).send_results(&results)?;
        Ok(run.map(|run| (run, results)))
    }
}
