use case_forms::api::client::{ApiCall, MockCaseApi};
use case_forms::container::case_container::CaseContainer;
use case_forms::container::events::{ContainerEvent, Toast};
use case_forms::container::host::HeadlessHost;
use case_forms::container::view_session::ViewSession;
use case_forms::options::resolver::OptionItem;
use case_forms::registry::component_registry::ComponentRegistry;
use case_forms::view::view_model::ViewTree;
use serde_json::{Value, json};

use super::fixtures::{assignment, case_info};

pub const ASSIGNMENT_ID: &str = "ASSIGN-WORKLIST ORG-APP-WORK W-7!REVIEW_FLOW";
pub const CASE_ID: &str = "ORG-APP-WORK W-7";
pub const FLOW_ACTION: &str = "Review";

/// Build a session the way the container does, with headless widgets.
pub fn session(view: ViewTree, api: &MockCaseApi) -> ViewSession {
    let mut host = HeadlessHost::new();
    ViewSession::build(view, 1, &mut host, api, None)
}

pub fn widget_value(registry: &ComponentRegistry, index: usize) -> Value {
    registry
        .widget(index)
        .map(|w| w.value())
        .unwrap_or(Value::Null)
}

pub fn widget_options(registry: &ComponentRegistry, index: usize) -> Vec<OptionItem> {
    registry
        .widget(index)
        .map(|w| w.options().to_vec())
        .unwrap_or_default()
}

/// A case engine that serves one assignment with `view` under its flow
/// action and an alternate `Update` action.
pub fn case_api(view: ViewTree) -> MockCaseApi {
    MockCaseApi::new()
        .with_assignment(assignment(
            ASSIGNMENT_ID,
            "Review claim",
            &[(FLOW_ACTION, "Review"), ("Update", "Update contact")],
        ))
        .with_case(case_info(
            CASE_ID,
            &[("PRIM0", "Create"), ("PRIM1", "Review")],
            json!({ "Name": "Ada" }),
        ))
        .with_view(ASSIGNMENT_ID, FLOW_ACTION, view)
}

pub fn opened(api: MockCaseApi) -> CaseContainer<MockCaseApi, HeadlessHost> {
    opened_with(api, HeadlessHost::new())
}

pub fn opened_with(api: MockCaseApi, host: HeadlessHost) -> CaseContainer<MockCaseApi, HeadlessHost> {
    let mut container = CaseContainer::new(api, host);
    container
        .open(ASSIGNMENT_ID, CASE_ID)
        .expect("assignment opens");
    container
}

/// Content posted by every refresh call, oldest first.
pub fn refreshed_contents(api: &MockCaseApi) -> Vec<Value> {
    api.calls()
        .into_iter()
        .filter_map(|call| match call {
            ApiCall::Refresh { content, .. } => Some(content),
            _ => None,
        })
        .collect()
}

pub fn toasts(container: &CaseContainer<MockCaseApi, HeadlessHost>) -> Vec<Toast> {
    container
        .events()
        .iter()
        .filter_map(|event| match event {
            ContainerEvent::Toast(toast) => Some(toast.clone()),
            _ => None,
        })
        .collect()
}
