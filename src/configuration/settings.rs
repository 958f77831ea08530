use crate::configuration::constants::{defaults, env};
use crate::error::{Error, Result};
use config::{Config, File};
use derivative::*;
use serde_derive::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// How much of the request and response ends up in a case comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    None,
    Headers,
    Full,
}

/// Which existing run receives the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSelector {
    /// The most recently created run of the project.
    Latest,
    Id(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCodes {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
}

/// Everything the reporter needs to know, resolved once per invocation.
#[derive(Derivative, Builder, Clone)]
#[derivative(Debug)]
#[builder(setter(into))]
pub struct Configuration {
    pub domain: String,
    pub username: String,
    #[derivative(Debug = "ignore")]
    pub apikey: String,
    pub project_id: String,
    #[builder(default)]
    pub suite_id: Option<String>,
    #[builder(default)]
    pub run_id: Option<RunSelector>,
    #[builder(default)]
    pub plan_id: Option<String>,
    #[builder(default)]
    pub title: Option<String>,
    #[builder(default = "defaults::CLOSE_RUN.to_owned()")]
    pub close_run: String,
    #[builder(default = "LoggingMode::None")]
    pub logging: LoggingMode,
    #[builder(default = "false")]
    pub steps: bool,
    #[builder(default = "defaults::STEP_RESULT_KEY.to_owned()")]
    pub step_result_key: String,
    #[builder(default = "false")]
    pub title_matching: bool,
    #[builder(default)]
    pub version: Option<String>,
    #[builder(default)]
    pub custom_fields: BTreeMap<String, String>,
    #[builder(default)]
    pub status: StatusCodes,
    #[builder(default = "false")]
    pub beta_api: bool,
    #[builder(default = "Duration::from_secs(defaults::TIMEOUT_SECS)")]
    pub timeout: Duration,
}

/// Settings exactly as found in the file and environment, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    domain: Option<String>,
    username: Option<String>,
    apikey: Option<String>,
    #[serde(alias = "project_id")]
    projectid: Option<String>,
    #[serde(alias = "suite_id")]
    suiteid: Option<String>,
    #[serde(alias = "run_id", with = "crate::configuration::deserialize::from_str")]
    runid: Option<RunSelector>,
    #[serde(alias = "plan_id")]
    planid: Option<String>,
    title: Option<String>,
    close_run: Option<String>,
    #[serde(with = "crate::configuration::deserialize::from_str")]
    logging: Option<LoggingMode>,
    steps: Option<bool>,
    step_result_key: Option<String>,
    title_matching: Option<bool>,
    version: Option<String>,
    beta_api: Option<bool>,
    pass_id: Option<u32>,
    fail_id: Option<u32>,
    skipped_id: Option<u32>,
    #[serde(with = "crate::configuration::deserialize::duration")]
    timeout: Option<Duration>,
    custom: BTreeMap<String, String>,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Reads the optional settings file, then the process environment.
    pub fn from_env(file: Option<&Path>) -> Result<Self> {
        Self::load(file, std::env::vars())
    }

    /// Merges the settings file with `TESTRAIL_*` variables from `vars`; a
    /// variable overrides the same key from the file. Each missing required
    /// option is reported on its own before the error is returned.
    pub fn load<I>(file: Option<&Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = Config::new();
        if let Some(path) = file {
            debug!("Loading settings from {}", path.display());
            config.merge(File::from(path))?;
        }
        let mut custom_fields = BTreeMap::new();
        for (key, value) in vars {
            let name = match key.strip_prefix(env::PREFIX) {
                Some(name) if !name.is_empty() && !name.contains('.') => name,
                _ => continue,
            };
            if value.trim().is_empty() {
                trace!("Ignoring blank {}", key);
                continue;
            }
            match name.strip_prefix(env::CUSTOM_PREFIX) {
                Some(field) if !field.is_empty() => {
                    custom_fields.insert(field.to_owned(), value);
                }
                _ => {
                    config.set(&name.to_lowercase(), value)?;
                }
            }
        }
        let mut raw: RawSettings = config.try_into()?;
        raw.custom.extend(custom_fields);
        raw.validate()
    }

    pub fn should_close_run(&self) -> bool {
        !self.close_run.eq_ignore_ascii_case("false")
    }
}

impl RawSettings {
    fn validate(self) -> Result<Configuration> {
        let required = [
            ("domain", &self.domain),
            ("username", &self.username),
            ("apikey", &self.apikey),
            ("projectId", &self.projectid),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            for name in &missing {
                error!("A required environment variable {} was not found.", name);
            }
            return Err(Error::MissingOptions(missing));
        }

        let mut builder = Configuration::builder();
        builder
            .domain(self.domain.unwrap_or_default())
            .username(self.username.unwrap_or_default())
            .apikey(self.apikey.unwrap_or_default())
            .project_id(self.projectid.unwrap_or_default())
            .suite_id(non_blank(self.suiteid))
            .run_id(self.runid)
            .plan_id(non_blank(self.planid))
            .title(non_blank(self.title))
            .version(non_blank(self.version))
            .custom_fields(self.custom)
            .status(StatusCodes {
                passed: self.pass_id.unwrap_or(defaults::PASSED_STATUS_ID),
                failed: self.fail_id.unwrap_or(defaults::FAILED_STATUS_ID),
                skipped: self.skipped_id.unwrap_or(defaults::SKIPPED_STATUS_ID),
            });
        if let Some(close_run) = self.close_run {
            builder.close_run(close_run);
        }
        if let Some(logging) = self.logging {
            builder.logging(logging);
        }
        if let Some(steps) = self.steps {
            builder.steps(steps);
        }
        if let Some(key) = non_blank(self.step_result_key) {
            builder.step_result_key(key);
        }
        if let Some(title_matching) = self.title_matching {
            builder.title_matching(title_matching);
        }
        if let Some(beta_api) = self.beta_api {
            builder.beta_api(beta_api);
        }
        if let Some(timeout) = self.timeout {
            builder.timeout(timeout);
        }
        builder.build().map_err(Error::Configuration)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Default for StatusCodes {
    fn default() -> Self {
        Self {
            passed: defaults::PASSED_STATUS_ID,
            failed: defaults::FAILED_STATUS_ID,
            skipped: defaults::SKIPPED_STATUS_ID,
        }
    }
}

impl FromStr for LoggingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(LoggingMode::None),
            "headers" => Ok(LoggingMode::Headers),
            "full" => Ok(LoggingMode::Full),
            other => Err(format!(
                "logging mode '{}' not supported, expected none, headers or full",
                other
            )),
        }
    }
}

impl FromStr for RunSelector {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            Err("run id must not be empty".to_owned())
        } else if s.eq_ignore_ascii_case("latest") {
            Ok(RunSelector::Latest)
        } else {
            Ok(RunSelector::Id(s.to_owned()))
        }
    }
}

impl fmt::Display for RunSelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunSelector::Latest => f.write_str("latest"),
            RunSelector::Id(id) => f.write_str(id),
        }
    }
}
