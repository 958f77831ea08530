use crate::newman::Execution;
use crate::reporter::title::{leading_case_ids, prefix_case_id};
use crate::testrail::response::Case;

/// Prefixes assertions that carry no case token with the id of a case they
/// can be matched to.
///
/// An assertion matches a case when its text, or the name of its request,
/// equals the case title, or when the request name itself starts with that
/// case's token. The first matching case in catalog order wins.
pub fn resolve_titles(catalog: &[Case], executions: &[Execution]) -> Vec<Execution> {
    executions
        .iter()
        .map(|execution| {
            let mut execution = execution.clone();
            let name = execution.name().to_owned();
            for assertion in execution.assertions.iter_mut() {
                if !leading_case_ids(&assertion.assertion).is_empty() {
                    continue;
                }
                if let Some(case) = find_case(catalog, &name, &assertion.assertion) {
                    trace!("'{}' matched case C{}", assertion.assertion, case.id);
                    assertion.assertion = format!("C{} {}", case.id, assertion.assertion);
                }
            }
            execution
        })
        .collect()
}

fn find_case<'a>(catalog: &'a [Case], name: &str, assertion: &str) -> Option<&'a Case> {
    let prefix = prefix_case_id(name);
    catalog.iter().find(|case| {
        case.title == assertion || case.title == name || prefix == Some(case.id.as_str())
    })
}
