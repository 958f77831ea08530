use crate::configuration::{Configuration, RunSelector};
use crate::connection::Transport;
use crate::error::{Error, Result};
use crate::reporter::model::{CaseResult, RunInfo};
use crate::testrail::TestRailApi;

/// Picks or creates the target run and pushes aggregated results into it.
pub struct ResultSender<'a, T> {
    api: &'a TestRailApi<T>,
    config: &'a Configuration,
}

impl<'a, T> ResultSender<'a, T>
where
    T: Transport,
{
    pub fn new(api: &'a TestRailApi<T>, config: &'a Configuration) -> Self {
        Self { api, config }
    }

    /// Nothing is sent when `results` is empty. Otherwise the run is resolved,
    /// the results posted and the run closed unless `close_run` is `false`.
    pub fn send_results(&self, results: &[CaseResult]) -> Result<Option<RunInfo>> {
        if results.is_empty() {
            error!("No test cases were found.");
            return Ok(None);
        }

        let run = self.determine_run(results)?;
        info!("Sending {} results to run {}", results.len(), run.run_id);
        self.api.add_results(&run.run_id, results)?;
        println!("\n{}", run.url);

        if self.config.should_close_run() {
            println!("Closing run.");
            self.api.close_run(&run.run_id)?;
        }
        Ok(Some(run))
    }

    fn determine_run(&self, results: &[CaseResult]) -> Result<RunInfo> {
        if let Some(selector) = &self.config.run_id {
            let run_id = match selector {
                RunSelector::Latest => self
                    .api
                    .get_runs()?
                    .into_vec()
                    .into_iter()
                    .next()
                    .map(|run| run.id)
                    .ok_or(Error::MissingField {
                        operation: "get_runs",
                        field: "runs[0]",
                    })?,
                RunSelector::Id(id) => id.clone(),
            };
            debug!("Reusing run {} ({})", run_id, selector);
            let detail = self.api.get_run(&run_id)?;
            return Ok(RunInfo {
                run_id,
                url: detail.url,
            });
        }

        let title = self.run_title()?;
        if let Some(plan_id) = &self.config.plan_id {
            let run = self
                .api
                .add_plan_entry(plan_id, &title, results)?
                .runs
                .into_iter()
                .next()
                .ok_or(Error::MissingField {
                    operation: "add_plan_entry",
                    field: "runs[0]",
                })?;
            debug!("Created run {} in plan", run.id);
            Ok(RunInfo {
                run_id: run.id,
                url: run.url,
            })
        } else {
            let run = self.api.add_run(&title, results)?;
            debug!("Created run {}", run.id);
            Ok(RunInfo {
                run_id: run.id,
                url: run.url,
            })
        }
    }

    /// Configured title, or one named after the project (or suite) and the
    /// current local time.
    fn run_title(&self) -> Result<String> {
        if let Some(title) = &self.config.title {
            return Ok(title.clone());
        }
        let project = self.api.get_project_info()?;
        Ok(format!(
            "{}: Automated Test Run {}",
            project.name,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ))
    }
}
