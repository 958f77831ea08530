use serde_derive::Serialize;
use std::collections::BTreeMap;

/// One outcome submitted to `add_results_for_cases`.
///
/// Serialized by hand (see `reporter::serialize`) since custom fields sit
/// next to the standard keys and the step list key is configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    /// Digits of the case token, `C12` becomes `"12"`.
    pub case_id: String,
    pub status_id: u32,
    pub comment: Option<String>,
    pub elapsed: Option<String>,
    pub version: Option<String>,
    pub custom_fields: BTreeMap<String, String>,
    pub steps: Option<StepResults>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepResults {
    pub key: String,
    pub entries: Vec<StepResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub status_id: u32,
    pub content: String,
}

/// The run results were pushed to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunInfo {
    pub run_id: String,
    pub url: String,
}

impl CaseResult {
    /// Bare failing entry appended for case ids reported more than once.
    pub fn duplicate_failure(case_id: &str, status_id: u32) -> Self {
        Self {
            case_id: case_id.to_owned(),
            status_id,
            comment: None,
            elapsed: None,
            version: None,
            custom_fields: BTreeMap::new(),
            steps: None,
        }
    }

    pub fn step_entries(&self) -> &[StepResult] {
        match &self.steps {
            Some(steps) => &steps.entries,
            None => &[],
        }
    }
}

/// Numeric case ids referenced by `results`, first occurrence order.
pub fn case_ids(results: &[CaseResult]) -> Vec<u64> {
    let mut ids: Vec<u64> = Vec::new();
    for id in results.iter().filter_map(|r| r.case_id.parse::<u64>().ok()) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_ids_are_unique_and_ordered() {
        let results = vec![
            CaseResult::duplicate_failure("02", 5),
            CaseResult::duplicate_failure("1", 5),
            CaseResult::duplicate_failure("2", 1),
        ];
        assert_eq!(case_ids(&results), vec![2, 1]);
    }
}
