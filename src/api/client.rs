use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::api_model::{
    ApiErrorPayload, Assignment, CaseInfo, ContentBody, CreateCaseRequest, CreatedCase,
    DataPageResult, PerformResult, ViewResponse,
};
use crate::api::error::CaseError;
use crate::options::resolver::DataPageSource;
use crate::view::view_model::ViewTree;

// ============================================================================
// CaseApi trait: the case engine as seen by the container
// ============================================================================

pub trait CaseApi: DataPageSource {
    fn fetch_assignment(&self, assignment_id: &str) -> Result<Assignment, CaseError>;

    fn fetch_case(&self, case_id: &str) -> Result<CaseInfo, CaseError>;

    fn fetch_view_for_action(
        &self,
        assignment_id: &str,
        action_id: &str,
    ) -> Result<ViewResponse, CaseError>;

    /// Post the current content and get the re-evaluated view back.
    fn refresh_assignment(
        &self,
        assignment_id: &str,
        action_id: &str,
        content: &Value,
        refresh_for: Option<&str>,
    ) -> Result<ViewResponse, CaseError>;

    /// Terminal submit of an assignment action.
    fn perform_action(
        &self,
        assignment_id: &str,
        action_id: &str,
        content: &Value,
    ) -> Result<PerformResult, CaseError>;

    fn fetch_page(&self, case_id: &str, page_id: &str) -> Result<ViewTree, CaseError>;

    fn update_case(&self, case_id: &str, content: &Value, etag: Option<&str>) -> Result<(), CaseError>;

    fn create_case(&self, request: &CreateCaseRequest) -> Result<CreatedCase, CaseError>;
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// Blocking client for the case engine's REST API.
pub struct HttpCaseApi {
    base_url: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpCaseApi {
    /// `base_url` is the API root, e.g. `https://host/prweb/api/v1/`.
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        HttpCaseApi {
            base_url,
            token: token.map(str::to_string),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}{}", self.base_url, path)
    }

    /// Send one request. Returns the parsed body (None for empty/204) and
    /// the `etag` header.
    fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        etag: Option<&str>,
    ) -> Result<(Option<Value>, Option<String>), CaseError> {
        let mut request = self.client.request(method, endpoint);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(etag) = etag {
            request = request.header("if-match", etag);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| CaseError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        let status = response.status();
        let etag = response
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().map_err(|e| CaseError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok((None, etag));
            }
            let value = serde_json::from_str(&text).map_err(|e| CaseError::JsonParse {
                context: endpoint.to_string(),
                source: e,
            })?;
            return Ok((Some(value), etag));
        }

        match serde_json::from_str::<ApiErrorPayload>(&text) {
            Ok(payload) if !payload.errors.is_empty() => Err(CaseError::Server(payload)),
            _ => Err(CaseError::Http {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            }),
        }
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, CaseError> {
        let (value, _) = self.send(method, endpoint, body, None)?;
        let value = value.ok_or_else(|| CaseError::InvalidResponse(format!("{} returned no body", endpoint)))?;
        serde_json::from_value(value).map_err(|e| CaseError::JsonParse {
            context: endpoint.to_string(),
            source: e,
        })
    }
}

fn content_body(content: &Value) -> Result<Value, CaseError> {
    serde_json::to_value(ContentBody {
        content: content.clone(),
    })
    .map_err(|e| CaseError::JsonSerialize {
        context: "ContentBody".into(),
        source: e,
    })
}

fn query_string<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let query = pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() { query } else { format!("?{}", query) }
}

impl DataPageSource for HttpCaseApi {
    fn fetch_data_page(
        &self,
        data_page_id: &str,
        params: &IndexMap<String, String>,
    ) -> Result<DataPageResult, CaseError> {
        let endpoint = format!(
            "{}{}",
            self.endpoint(&["data", data_page_id]),
            query_string(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        );
        self.send_json(Method::GET, &endpoint, None)
    }
}

impl CaseApi for HttpCaseApi {
    fn fetch_assignment(&self, assignment_id: &str) -> Result<Assignment, CaseError> {
        self.send_json(Method::GET, &self.endpoint(&["assignments", assignment_id]), None)
    }

    fn fetch_case(&self, case_id: &str) -> Result<CaseInfo, CaseError> {
        let endpoint = self.endpoint(&["cases", case_id]);
        let (value, etag) = self.send(Method::GET, &endpoint, None, None)?;
        let value = value.ok_or_else(|| CaseError::InvalidResponse(format!("{} returned no body", endpoint)))?;
        let mut case: CaseInfo = serde_json::from_value(value).map_err(|e| CaseError::JsonParse {
            context: endpoint.clone(),
            source: e,
        })?;
        if etag.is_some() {
            case.etag = etag;
        }
        Ok(case)
    }

    fn fetch_view_for_action(
        &self,
        assignment_id: &str,
        action_id: &str,
    ) -> Result<ViewResponse, CaseError> {
        let endpoint = self.endpoint(&["assignments", assignment_id, "actions", action_id]);
        self.send_json(Method::GET, &endpoint, None)
    }

    fn refresh_assignment(
        &self,
        assignment_id: &str,
        action_id: &str,
        content: &Value,
        refresh_for: Option<&str>,
    ) -> Result<ViewResponse, CaseError> {
        let endpoint = format!(
            "{}{}",
            self.endpoint(&["assignments", assignment_id, "actions", action_id, "refresh"]),
            query_string(refresh_for.map(|r| ("refreshFor", r)))
        );
        self.send_json(Method::PUT, &endpoint, Some(&content_body(content)?))
    }

    fn perform_action(
        &self,
        assignment_id: &str,
        action_id: &str,
        content: &Value,
    ) -> Result<PerformResult, CaseError> {
        let endpoint = format!(
            "{}{}",
            self.endpoint(&["assignments", assignment_id]),
            query_string([("actionID", action_id)])
        );
        self.send_json(Method::POST, &endpoint, Some(&content_body(content)?))
    }

    fn fetch_page(&self, case_id: &str, page_id: &str) -> Result<ViewTree, CaseError> {
        self.send_json(Method::GET, &self.endpoint(&["cases", case_id, "pages", page_id]), None)
    }

    fn update_case(&self, case_id: &str, content: &Value, etag: Option<&str>) -> Result<(), CaseError> {
        let endpoint = self.endpoint(&["cases", case_id]);
        self.send(Method::PUT, &endpoint, Some(&content_body(content)?), etag)?;
        Ok(())
    }

    fn create_case(&self, request: &CreateCaseRequest) -> Result<CreatedCase, CaseError> {
        let body = serde_json::to_value(request).map_err(|e| CaseError::JsonSerialize {
            context: "CreateCaseRequest".into(),
            source: e,
        })?;
        self.send_json(Method::POST, &self.endpoint(&["cases"]), Some(&body))
    }
}

// ============================================================================
// Mock implementation (for testing and offline runs)
// ============================================================================

/// Every call made against a `MockCaseApi`, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchAssignment(String),
    FetchCase(String),
    FetchView { assignment_id: String, action_id: String },
    Refresh {
        assignment_id: String,
        action_id: String,
        content: Value,
        refresh_for: Option<String>,
    },
    Perform { assignment_id: String, action_id: String, content: Value },
    FetchPage { case_id: String, page_id: String },
    UpdateCase { case_id: String, content: Value, etag: Option<String> },
    CreateCase(CreateCaseRequest),
    FetchDataPage { data_page_id: String, params: IndexMap<String, String> },
}

pub type MockReply<T> = Result<T, ApiErrorPayload>;

struct CannedDataPage {
    filter: Vec<(String, String)>,
    result: DataPageResult,
}

/// In-memory case engine with canned answers that records every call.
#[derive(Default)]
pub struct MockCaseApi {
    assignments: HashMap<String, Assignment>,
    cases: HashMap<String, CaseInfo>,
    views: HashMap<(String, String), ViewResponse>,
    pages: HashMap<(String, String), ViewTree>,
    data_pages: HashMap<String, Vec<CannedDataPage>>,
    failing_data_pages: HashSet<String>,
    created: Option<MockReply<CreatedCase>>,
    refresh_replies: RefCell<VecDeque<MockReply<ViewResponse>>>,
    perform_replies: RefCell<VecDeque<MockReply<PerformResult>>>,
    update_replies: RefCell<VecDeque<MockReply<()>>>,
    calls: RefCell<Vec<ApiCall>>,
}

impl MockCaseApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignments.insert(assignment.id.clone(), assignment);
        self
    }

    pub fn with_case(mut self, case: CaseInfo) -> Self {
        self.cases.insert(case.id.clone(), case);
        self
    }

    pub fn with_view(mut self, assignment_id: &str, action_id: &str, view: ViewTree) -> Self {
        self.views.insert(
            (assignment_id.to_string(), action_id.to_string()),
            ViewResponse { view },
        );
        self
    }

    pub fn with_page(mut self, case_id: &str, page_id: &str, page: ViewTree) -> Self {
        self.pages
            .insert((case_id.to_string(), page_id.to_string()), page);
        self
    }

    /// Answer every lookup of `data_page_id` with `result`.
    pub fn with_data_page(self, data_page_id: &str, result: DataPageResult) -> Self {
        self.with_data_page_for(data_page_id, &[], result)
    }

    /// Answer lookups of `data_page_id` whose parameters include all of
    /// `filter`. Filtered answers win over unfiltered ones.
    pub fn with_data_page_for(
        mut self,
        data_page_id: &str,
        filter: &[(&str, &str)],
        result: DataPageResult,
    ) -> Self {
        self.data_pages
            .entry(data_page_id.to_string())
            .or_default()
            .push(CannedDataPage {
                filter: filter
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                result,
            });
        self
    }

    pub fn with_failing_data_page(mut self, data_page_id: &str) -> Self {
        self.failing_data_pages.insert(data_page_id.to_string());
        self
    }

    pub fn with_created_case(mut self, reply: MockReply<CreatedCase>) -> Self {
        self.created = Some(reply);
        self
    }

    pub fn with_refresh_reply(self, reply: MockReply<ViewResponse>) -> Self {
        self.refresh_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn with_perform_reply(self, reply: MockReply<PerformResult>) -> Self {
        self.perform_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn with_update_reply(self, reply: MockReply<()>) -> Self {
        self.update_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    pub fn data_page_calls(&self) -> Vec<(String, IndexMap<String, String>)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                ApiCall::FetchDataPage { data_page_id, params } => {
                    Some((data_page_id.clone(), params.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.borrow_mut().push(call);
    }

    fn missing(what: &str, key: &str) -> CaseError {
        CaseError::InvalidResponse(format!("no canned {} for {}", what, key))
    }
}

impl DataPageSource for MockCaseApi {
    fn fetch_data_page(
        &self,
        data_page_id: &str,
        params: &IndexMap<String, String>,
    ) -> Result<DataPageResult, CaseError> {
        self.record(ApiCall::FetchDataPage {
            data_page_id: data_page_id.to_string(),
            params: params.clone(),
        });

        if self.failing_data_pages.contains(data_page_id) {
            return Err(CaseError::Http {
                endpoint: format!("data/{}", data_page_id),
                status: 500,
                body: "data page failed".into(),
            });
        }

        let canned = self
            .data_pages
            .get(data_page_id)
            .ok_or_else(|| Self::missing("data page", data_page_id))?;
        let matches = |entry: &&CannedDataPage| {
            entry
                .filter
                .iter()
                .all(|(k, v)| params.get(k).is_some_and(|p| p == v))
        };

        canned
            .iter()
            .filter(|entry| !entry.filter.is_empty())
            .find(matches)
            .or_else(|| canned.iter().filter(|entry| entry.filter.is_empty()).find(matches))
            .map(|entry| entry.result.clone())
            .ok_or_else(|| Self::missing("data page", data_page_id))
    }
}

impl CaseApi for MockCaseApi {
    fn fetch_assignment(&self, assignment_id: &str) -> Result<Assignment, CaseError> {
        self.record(ApiCall::FetchAssignment(assignment_id.to_string()));
        self.assignments
            .get(assignment_id)
            .cloned()
            .ok_or_else(|| Self::missing("assignment", assignment_id))
    }

    fn fetch_case(&self, case_id: &str) -> Result<CaseInfo, CaseError> {
        self.record(ApiCall::FetchCase(case_id.to_string()));
        self.cases
            .get(case_id)
            .cloned()
            .ok_or_else(|| Self::missing("case", case_id))
    }

    fn fetch_view_for_action(
        &self,
        assignment_id: &str,
        action_id: &str,
    ) -> Result<ViewResponse, CaseError> {
        self.record(ApiCall::FetchView {
            assignment_id: assignment_id.to_string(),
            action_id: action_id.to_string(),
        });
        self.views
            .get(&(assignment_id.to_string(), action_id.to_string()))
            .cloned()
            .ok_or_else(|| Self::missing("view", action_id))
    }

    fn refresh_assignment(
        &self,
        assignment_id: &str,
        action_id: &str,
        content: &Value,
        refresh_for: Option<&str>,
    ) -> Result<ViewResponse, CaseError> {
        self.record(ApiCall::Refresh {
            assignment_id: assignment_id.to_string(),
            action_id: action_id.to_string(),
            content: content.clone(),
            refresh_for: refresh_for.map(str::to_string),
        });
        match self.refresh_replies.borrow_mut().pop_front() {
            Some(reply) => reply.map_err(CaseError::Server),
            None => self
                .views
                .get(&(assignment_id.to_string(), action_id.to_string()))
                .cloned()
                .ok_or_else(|| Self::missing("refresh", action_id)),
        }
    }

    fn perform_action(
        &self,
        assignment_id: &str,
        action_id: &str,
        content: &Value,
    ) -> Result<PerformResult, CaseError> {
        self.record(ApiCall::Perform {
            assignment_id: assignment_id.to_string(),
            action_id: action_id.to_string(),
            content: content.clone(),
        });
        self.perform_replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Self::missing("perform", action_id))?
            .map_err(CaseError::Server)
    }

    fn fetch_page(&self, case_id: &str, page_id: &str) -> Result<ViewTree, CaseError> {
        self.record(ApiCall::FetchPage {
            case_id: case_id.to_string(),
            page_id: page_id.to_string(),
        });
        self.pages
            .get(&(case_id.to_string(), page_id.to_string()))
            .cloned()
            .ok_or_else(|| Self::missing("page", page_id))
    }

    fn update_case(&self, case_id: &str, content: &Value, etag: Option<&str>) -> Result<(), CaseError> {
        self.record(ApiCall::UpdateCase {
            case_id: case_id.to_string(),
            content: content.clone(),
            etag: etag.map(str::to_string),
        });
        self.update_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(()))
            .map_err(CaseError::Server)
    }

    fn create_case(&self, request: &CreateCaseRequest) -> Result<CreatedCase, CaseError> {
        self.record(ApiCall::CreateCase(request.clone()));
        match &self.created {
            Some(reply) => reply.clone().map_err(CaseError::Server),
            None => Err(Self::missing("created case", &request.case_type_id)),
        }
    }
}
