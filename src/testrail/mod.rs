pub mod response;

use crate::configuration::Configuration;
use crate::connection::Transport;
use crate::error::{Error, Result};
use crate::reporter::model::{case_ids, CaseResult};
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request};
use serde::de::DeserializeOwned;
use serde_derive::Serialize;
use std::sync::Arc;

use self::response::{Case, CasePage, PlanEntry, ProjectInfo, Run, RunDetail, Runs};

const API_PATH: &str = "/index.php?/api/v2/";
const BETA_HEADER: &str = "X-API-IDENT";

#[derive(Serialize)]
struct NewRun<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    suite_id: Option<&'a str>,
    include_all: bool,
    case_ids: Vec<u64>,
}

#[derive(Serialize)]
struct NewResults<'a> {
    results: &'a [CaseResult],
}

#[derive(Serialize)]
struct Empty {}

/// Blocking client for the handful of TestRail API v2 endpoints the
/// reporter talks to.
pub struct TestRailApi<T> {
    client: Arc<T>,
    host: String,
    authorization: String,
    beta: bool,
    project_id: String,
    suite_id: Option<String>,
}

impl<T> TestRailApi<T>
where
    T: Transport,
{
    pub fn new(client: Arc<T>, config: &Configuration) -> Self {
        let domain = config.domain.trim_end_matches('/');
        let host = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_owned()
        } else {
            format!("https://{}", domain)
        };
        let credentials = format!("{}:{}", config.username, config.apikey);
        Self {
            client,
            host,
            authorization: format!("Basic {}", base64::encode(credentials)),
            beta: config.beta_api,
            project_id: config.project_id.clone(),
            suite_id: config.suite_id.clone(),
        }
    }

    /// Name of the configured suite, or of the project when no suite is set.
    pub fn get_project_info(&self) -> Result<ProjectInfo> {
        let (operation, path) = match &self.suite_id {
            Some(suite_id) => ("get_suite", format!("get_suite/{}", suite_id)),
            None => ("get_project", format!("get_project/{}", self.project_id)),
        };
        self.get(operation, &path)
    }

    pub fn get_runs(&self) -> Result<Runs> {
        self.get("get_runs", &format!("get_runs/{}", self.project_id))
    }

    pub fn get_run(&self, run_id: &str) -> Result<RunDetail> {
        self.get("get_run", &format!("get_run/{}", run_id))
    }

    /// Whole case catalog of the project (and suite), page after page until
    /// TestRail stops handing out a `next` link.
    pub fn get_cases(&self) -> Result<Vec<Case>> {
        let mut path = format!("get_cases/{}", self.project_id);
        if let Some(suite_id) = &self.suite_id {
            path.push_str(&format!("&suite_id={}", suite_id));
        }
        let mut url = self.api_url(&path);
        let mut catalog = Vec::new();
        loop {
            let body = self.call("get_cases", Method::GET, &url, None::<&Empty>)?;
            let page: CasePage = decode("get_cases", &body)?;
            let (cases, next) = page.into_parts();
            catalog.extend(cases);
            match next {
                Some(next) if !next.is_empty() => url = self.link_url(&next),
                _ => break,
            }
        }
        debug!("Fetched {} cases", catalog.len());
        Ok(catalog)
    }

    pub fn add_run(&self, title: &str, results: &[CaseResult]) -> Result<Run> {
        let body = self.new_run(title, results);
        self.post("add_run", &format!("add_run/{}", self.project_id), &body)
    }

    pub fn add_plan_entry(
        &self,
        plan_id: &str,
        title: &str,
        results: &[CaseResult],
    ) -> Result<PlanEntry> {
        let body = self.new_run(title, results);
        self.post("add_plan_entry", &format!("add_plan_entry/{}", plan_id), &body)
    }

    pub fn add_results(&self, run_id: &str, results: &[CaseResult]) -> Result<()> {
        let url = self.api_url(&format!("add_results_for_cases/{}", run_id));
        let body = NewResults { results };
        self.call("add_results_for_cases", Method::POST, &url, Some(&body))?;
        Ok(())
    }

    pub fn close_run(&self, run_id: &str) -> Result<()> {
        let url = self.api_url(&format!("close_run/{}", run_id));
        self.call("close_run", Method::POST, &url, Some(&Empty {}))?;
        Ok(())
    }

    fn new_run<'a>(&'a self, title: &'a str, results: &[CaseResult]) -> NewRun<'a> {
        NewRun {
            name: title,
            suite_id: self.suite_id.as_deref(),
            include_all: false,
            case_ids: case_ids(results),
        }
    }

    fn get<R: DeserializeOwned>(&self, operation: &'static str, path: &str) -> Result<R> {
        let body = self.call(operation, Method::GET, &self.api_url(path), None::<&Empty>)?;
        decode(operation, &body)
    }

    fn post<B, R>(&self, operation: &'static str, path: &str, data: &B) -> Result<R>
    where
        B: serde::Serialize,
        R: DeserializeOwned,
    {
        let body = self.call(operation, Method::POST, &self.api_url(path), Some(data))?;
        decode(operation, &body)
    }

    fn call<B: serde::Serialize>(
        &self,
        operation: &'static str,
        method: Method,
        url: &str,
        data: Option<&B>,
    ) -> Result<Bytes> {
        let payload = match data {
            Some(data) => serde_json::to_vec(data).map_err(|source| Error::Decode {
                operation,
                source,
            })?,
            None => Vec::new(),
        };
        let mut request = Request::builder()
            .method(method)
            .uri(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.authorization.as_str());
        if self.beta {
            request = request.header(BETA_HEADER, "BETA");
        }
        let request = request.body(payload)?;
        debug!("{} {}", request.method(), url);
        let response = self.client.send(request)?;
        if !response.status().is_success() {
            return Err(Error::Api {
                operation,
                status: response.status().as_u16(),
                body: String::from_utf8_lossy(response.body()).into_owned(),
            });
        }
        Ok(response.into_body())
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.host, API_PATH, path)
    }

    /// `_links.next` holds `/api/v2/...`, relative to the `index.php?` entry point.
    fn link_url(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_owned()
        } else {
            format!("{}/index.php?{}", self.host, link)
        }
    }
}

fn decode<R: DeserializeOwned>(operation: &'static str, body: &[u8]) -> Result<R> {
    serde_json::from_slice(body).map_err(|source| Error::Decode { operation, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::settings::fixtures::configuration;
    use crate::configuration::settings::ConfigurationBuilder;
    use crate::connection::fake::RecordingTransport;
    use crate::reporter::model::CaseResult;
    use serde_json::json;

    fn api(
        transport: &Arc<RecordingTransport>,
        build: impl FnOnce(&mut ConfigurationBuilder),
    ) -> TestRailApi<RecordingTransport> {
        let mut builder = configuration();
        build(&mut builder);
        TestRailApi::new(transport.clone(), &builder.build().unwrap())
    }

    #[test]
    fn test_requests_carry_auth_and_json_headers() {
        let transport = Arc::new(RecordingTransport::new().route("get_run", json!({ "url": "u" })));
        let sut = api(&transport, |_| {});

        sut.get_run("456").unwrap();

        let call = &transport.calls()[0];
        assert_eq!(call.method, Method::GET);
        assert_eq!(call.uri, "https://example.com/index.php?/api/v2/get_run/456");
        assert_eq!(call.header("content-type"), Some("application/json".to_owned()));
        assert_eq!(
            call.header("authorization"),
            Some(format!("Basic {}", base64::encode("dummyUser:hogeApiKey")))
        );
        assert_eq!(call.header("x-api-ident"), None);
    }

    #[test]
    fn test_beta_api_adds_ident_header() {
        let transport = Arc::new(RecordingTransport::new());
        let sut = api(&transport, |b| {
            b.beta_api(true);
        });

        sut.close_run("456").unwrap();

        assert_eq!(transport.calls()[0].header("x-api-ident"), Some("BETA".to_owned()));
    }

    #[test]
    fn test_domain_with_scheme_is_kept() {
        let transport = Arc::new(RecordingTransport::new().route("get_project", json!({ "name": "p" })));
        let sut = api(&transport, |b| {
            b.domain("http://testrail.local/");
        });

        sut.get_project_info().unwrap();

        assert_eq!(
            transport.calls()[0].uri,
            "http://testrail.local/index.php?/api/v2/get_project/testProjectId"
        );
    }

    #[test]
    fn test_project_info_uses_suite_when_configured() {
        let transport = Arc::new(RecordingTransport::new().route("get_suite", json!({ "name": "Suite A" })));
        let sut = api(&transport, |b| {
            b.suite_id(Some("456".to_owned()));
        });

        let info = sut.get_project_info().unwrap();

        assert_eq!(info.name, "Suite A");
        assert_eq!(
            transport.calls()[0].uri,
            "https://example.com/index.php?/api/v2/get_suite/456"
        );
    }

    #[test]
    fn test_suite_lookup_errors_name_the_suite_endpoint() {
        let transport = Arc::new(RecordingTransport::new().failing("get_suite", 404, json!({ "error": "no suite" })));
        let sut = api(&transport, |b| {
            b.suite_id(Some("456".to_owned()));
        });

        assert!(matches!(
            sut.get_project_info(),
            Err(Error::Api { operation: "get_suite", status: 404, .. })
        ));
    }

    #[test]
    fn test_get_runs_targets_project() {
        let transport = Arc::new(RecordingTransport::new().route("get_runs", json!({ "runs": [] })));
        let sut = api(&transport, |b| {
            b.project_id("123");
        });

        sut.get_runs().unwrap();

        assert_eq!(
            transport.calls()[0].uri,
            "https://example.com/index.php?/api/v2/get_runs/123"
        );
    }

    #[test]
    fn test_get_cases_follows_next_links() {
        let transport = Arc::new(
            RecordingTransport::new()
                .route(
                    "get_cases",
                    json!({
                        "_links": { "next": "/api/v2/get_cases/123&suite_id=456&limit=1&offset=1" },
                        "cases": [{ "id": 1, "title": "case1" }]
                    }),
                )
                .route(
                    "get_cases",
                    json!({ "_links": { "next": null }, "cases": [{ "id": 2, "title": "case2" }] }),
                ),
        );
        let sut = api(&transport, |b| {
            b.project_id("123").suite_id(Some("456".to_owned()));
        });

        let cases = sut.get_cases().unwrap();

        let titles: Vec<&str> = cases.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["case1", "case2"]);
        let uris: Vec<String> = transport.calls().into_iter().map(|c| c.uri).collect();
        assert_eq!(
            uris,
            vec![
                "https://example.com/index.php?/api/v2/get_cases/123&suite_id=456",
                "https://example.com/index.php?/api/v2/get_cases/123&suite_id=456&limit=1&offset=1",
            ]
        );
    }

    #[test]
    fn test_add_run_sends_title_and_case_ids() {
        let transport = Arc::new(
            RecordingTransport::new().route("add_run", json!({ "id": 9, "url": "https://example.com/runs/9" })),
        );
        let sut = api(&transport, |_| {});
        let results = vec![
            CaseResult::duplicate_failure("1", 1),
            CaseResult::duplicate_failure("02", 5),
            CaseResult::duplicate_failure("1", 5),
        ];

        let run = sut.add_run("Nightly", &results).unwrap();

        assert_eq!(run.id, "9");
        let call = &transport.calls()[0];
        assert_eq!(call.uri, "https://example.com/index.php?/api/v2/add_run/testProjectId");
        assert_eq!(
            call.body,
            Some(json!({ "name": "Nightly", "include_all": false, "case_ids": [1, 2] }))
        );
    }

    #[test]
    fn test_add_plan_entry_targets_plan() {
        let transport = Arc::new(RecordingTransport::new().route(
            "add_plan_entry",
            json!({ "runs": [{ "id": 4, "url": "https://example.com/runs/4" }] }),
        ));
        let sut = api(&transport, |b| {
            b.suite_id(Some("2".to_owned()));
        });

        let entry = sut.add_plan_entry("456", "Nightly", &[]).unwrap();

        assert_eq!(entry.runs[0].id, "4");
        let call = &transport.calls()[0];
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.uri, "https://example.com/index.php?/api/v2/add_plan_entry/456");
        assert_eq!(call.body.as_ref().unwrap()["suite_id"], json!("2"));
    }

    #[test]
    fn test_add_results_wraps_results() {
        let transport = Arc::new(RecordingTransport::new());
        let sut = api(&transport, |_| {});

        sut.add_results("123", &[CaseResult::duplicate_failure("1", 5)]).unwrap();

        let call = &transport.calls()[0];
        assert_eq!(
            call.uri,
            "https://example.com/index.php?/api/v2/add_results_for_cases/123"
        );
        assert_eq!(
            call.body,
            Some(json!({ "results": [{ "case_id": "1", "status_id": 5 }] }))
        );
    }

    #[test]
    fn test_non_success_status_is_an_error() {
        let transport = Arc::new(RecordingTransport::new().failing("close_run", 403, json!({ "error": "forbidden" })));
        let sut = api(&transport, |_| {});

        match sut.close_run("1") {
            Err(Error::Api { operation, status, body }) => {
                assert_eq!(operation, "close_run");
                assert_eq!(status, 403);
                assert!(body.contains("forbidden"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_response_is_a_decode_error() {
        let transport = Arc::new(RecordingTransport::new().route("get_run", json!({ "id": 1 })));
        let sut = api(&transport, |_| {});

        assert!(matches!(
            sut.get_run("1"),
            Err(Error::Decode { operation: "get_run", .. })
        ));
    }
}
