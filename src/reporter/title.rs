use lazy_static::*;
use regex::Regex;

lazy_static! {
    static ref CASE_TOKEN: Regex = Regex::new(r"\bC(\d+)\b").expect("Regex compilation error");
    static ref CASE_PREFIX: Regex = Regex::new(r"^C(\d+)\b").expect("Regex compilation error");
}

/// Case ids leading an assertion title, in order.
///
/// Words are split on single spaces and scanned from the start; the scan
/// stops at the first word without a `C<digits>` token, so
/// `"C12 C13 status is 200"` yields `["12", "13"]` while
/// `"status is 200 C12"` yields nothing.
pub fn leading_case_ids(title: &str) -> Vec<&str> {
    let mut ids = Vec::new();
    for word in title.split(' ') {
        match CASE_TOKEN.captures(word).and_then(|caps| caps.get(1)) {
            Some(id) => ids.push(id.as_str()),
            None => break,
        }
    }
    ids
}

/// Id of the case token the text starts with, if any.
pub fn prefix_case_id(text: &str) -> Option<&str> {
    CASE_PREFIX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str())
}
