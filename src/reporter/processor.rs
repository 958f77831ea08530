use crate::configuration::{Configuration, LoggingMode, StatusCodes};
use crate::newman::{Assertion, Execution};
use crate::reporter::log::RequestLog;
use crate::reporter::model::{CaseResult, StepResult, StepResults};
use crate::reporter::title::leading_case_ids;
use crate::time::Elapsed;
use std::collections::HashSet;

/// Turns assertions into TestRail case results.
pub struct ResultProcessor<'a> {
    config: &'a Configuration,
}

/// Results collected while walking the executions of one run.
#[derive(Debug, Default)]
struct Aggregation {
    results: Vec<CaseResult>,
    duplicates: Vec<String>,
}

impl<'a> ResultProcessor<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// One result per case token of every assertion, in encounter order.
    ///
    /// Without steps, a case id that comes back while one of its
    /// occurrences failed gets one more bare failing result at the end, so
    /// the failure stays visible whatever TestRail keeps as latest. With
    /// steps, occurrences of a case id fold into one result whose status is
    /// failed when any step failed.
    pub fn process(&self, executions: &[Execution]) -> Vec<CaseResult> {
        let mut aggregation = Aggregation::default();
        for execution in executions {
            self.process_execution(execution, &mut aggregation);
        }
        let results = if self.config.steps {
            aggregation.into_step_results(&self.config.status)
        } else {
            aggregation.into_flat_results(&self.config.status)
        };
        debug!("Aggregated {} case results", results.len());
        results
    }

    fn process_execution(&self, execution: &Execution, aggregation: &mut Aggregation) {
        let log = match self.config.logging {
            LoggingMode::None => None,
            mode => Some(RequestLog::of(execution, mode).block()),
        };
        let elapsed = Elapsed::from_millis(execution.response_time()).to_string();
        let mut logged: HashSet<&str> = HashSet::new();

        for assertion in &execution.assertions {
            for case_id in leading_case_ids(&assertion.assertion) {
                let mut comment = assertion.assertion.clone();
                if let Some(block) = &log {
                    if self.config.steps || !logged.contains(case_id) {
                        comment.push_str(block);
                    }
                    logged.insert(case_id);
                }
                trace!("{} -> case {}", execution.name(), case_id);
                if let Some(failure) = assertion.failure_message() {
                    debug!("Case {} failed: {}", case_id, failure);
                }
                let result = CaseResult {
                    case_id: case_id.to_owned(),
                    status_id: self.status_of(assertion),
                    comment: Some(comment),
                    elapsed: Some(elapsed.clone()),
                    version: self.config.version.clone(),
                    custom_fields: self.config.custom_fields.clone(),
                    steps: None,
                };
                if self.config.steps {
                    aggregation.push_step(result, &self.config.step_result_key);
                } else {
                    aggregation.push(result, self.config.status.failed);
                }
            }
        }
    }

    fn status_of(&self, assertion: &Assertion) -> u32 {
        if assertion.skipped {
            self.config.status.skipped
        } else if assertion.is_failed() {
            self.config.status.failed
        } else {
            self.config.status.passed
        }
    }
}

impl Aggregation {
    fn push(&mut self, result: CaseResult, failed: u32) {
        let mut earlier = self
            .results
            .iter()
            .filter(|r| r.case_id == result.case_id)
            .peekable();
        let seen = earlier.peek().is_some();
        let failure_seen = result.status_id == failed || earlier.any(|r| r.status_id == failed);
        if seen && failure_seen && !self.duplicates.contains(&result.case_id) {
            debug!("Case {} reported more than once with a failure", result.case_id);
            self.duplicates.push(result.case_id.clone());
        }
        self.results.push(result);
    }

    fn push_step(&mut self, mut result: CaseResult, key: &str) {
        let step = StepResult {
            status_id: result.status_id,
            content: result.comment.take().unwrap_or_default(),
        };
        match self
            .results
            .iter_mut()
            .find(|r| r.case_id == result.case_id)
        {
            Some(parent) => match &mut parent.steps {
                Some(steps) => steps.entries.push(step),
                None => {
                    parent.steps = Some(StepResults {
                        key: key.to_owned(),
                        entries: vec![step],
                    })
                }
            },
            None => {
                result.steps = Some(StepResults {
                    key: key.to_owned(),
                    entries: vec![step],
                });
                self.results.push(result);
            }
        }
    }

    fn into_flat_results(self, status: &StatusCodes) -> Vec<CaseResult> {
        let Aggregation {
            mut results,
            duplicates,
        } = self;
        results.extend(
            duplicates
                .iter()
                .map(|case_id| CaseResult::duplicate_failure(case_id, status.failed)),
        );
        results
    }

    fn into_step_results(self, status: &StatusCodes) -> Vec<CaseResult> {
        self.results
            .into_iter()
            .map(|mut result| {
                let failed = result
                    .step_entries()
                    .iter()
                    .any(|step| step.status_id == status.failed);
                result.status_id = if failed { status.failed } else { status.passed };
                result
            })
            .collect()
    }
}
