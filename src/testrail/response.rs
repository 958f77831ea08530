//! Shapes of the TestRail responses the reporter reads.
//!
//! TestRail 6.7 started paginating bulk endpoints; older instances still
//! answer with bare arrays, so list responses accept both.

use serde_derive::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunRef {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Runs {
    Page { runs: Vec<RunRef> },
    Bare(Vec<RunRef>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunDetail {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanEntry {
    #[serde(default)]
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Case {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CasePage {
    Page {
        cases: Vec<Case>,
        #[serde(default, rename = "_links")]
        links: Links,
    },
    Bare(Vec<Case>),
}

impl Runs {
    pub fn into_vec(self) -> Vec<RunRef> {
        match self {
            Runs::Page { runs } => runs,
            Runs::Bare(runs) => runs,
        }
    }
}

impl CasePage {
    pub fn into_parts(self) -> (Vec<Case>, Option<String>) {
        match self {
            CasePage::Page { cases, links } => (cases, links.next),
            CasePage::Bare(cases) => (cases, None),
        }
    }
}

/// TestRail ids are numbers, but fixtures and proxies sometimes quote them.
mod id {
    use serde::Deserializer;
    use serde_derive::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match <Id as serde::Deserialize>::deserialize(deserializer)? {
            Id::Number(id) => id.to_string(),
            Id::Text(id) => id,
        })
    }
}
