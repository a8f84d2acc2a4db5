use case_forms::{
    api::{
        api_model::{ApiErrorPayload, CreatedCase, PerformResult, ValidationMessage, ViewResponse},
        client::{ApiCall, MockCaseApi},
        error::CaseError,
    },
    container::{
        case_container::{CaseContainer, GENERIC_ERROR, SubmitOutcome, short_case_id},
        events::{ContainerEvent, ListActionKind, ToastVariant},
        host::HeadlessHost,
        lifecycle::ContainerState,
    },
    registry::widget::HeadlessWidget,
    view::view_model::RepeatKind,
};
use serde_json::json;

use crate::common::{
    fixtures::{
        checkbox, dropdown, field, nested_view, required, rows, text_input, view_of, with_actions,
    },
    utils::{
        ASSIGNMENT_ID, CASE_ID, FLOW_ACTION, case_api, opened, opened_with, refreshed_contents,
        toasts, widget_value,
    },
};

mod common;

fn validation_payload(path: Option<&str>, message: &str) -> ApiErrorPayload {
    ApiErrorPayload::validation(
        "E1",
        "m",
        vec![ValidationMessage {
            path: path.map(str::to_string),
            message: message.to_string(),
        }],
    )
}

// =========================================================================
// Loading
// =========================================================================

#[test]
fn open_loads_view_stages_and_actions() {
    let view = view_of(vec![text_input(0, ".Name", "Ada")]);
    let container = opened(case_api(view));

    assert_eq!(container.state(), ContainerState::Loaded);
    assert_eq!(container.current_action(), Some(FLOW_ACTION));
    assert_eq!(container.session().store.get("Name"), Some(&json!("Ada")));

    let stages: Vec<&str> = container.stages().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(stages, vec!["Create", "Review"]);

    let actions: Vec<(&str, &str)> = container
        .actions()
        .iter()
        .map(|a| (a.label.as_str(), a.value.as_str()))
        .collect();
    assert_eq!(
        actions,
        vec![("Refresh", "Refresh"), ("Update contact", "Update"), ("Review", FLOW_ACTION)],
        "Refresh first, flow action last"
    );

    assert_eq!(
        container.api().calls(),
        vec![
            ApiCall::FetchAssignment(ASSIGNMENT_ID.into()),
            ApiCall::FetchCase(CASE_ID.into()),
            ApiCall::FetchView {
                assignment_id: ASSIGNMENT_ID.into(),
                action_id: FLOW_ACTION.into()
            },
        ]
    );
}

#[test]
fn open_raises_selection_and_title_events() {
    let container = opened(case_api(view_of(vec![])));
    let events = container.events();

    assert!(matches!(events[0], ContainerEvent::WorkItemSelected { .. }));
    let ContainerEvent::ChangeTitle(title) = &events[1] else {
        panic!("Expected ChangeTitle, got {:?}", events[1]);
    };
    assert_eq!(title.case_name, "Review claim");
    assert_eq!(title.case_id, "W-7");
    assert_eq!(title.case_key, CASE_ID);
    assert_eq!(title.action, "Review");
}

#[test]
fn failed_load_empties_the_container_and_shows_a_toast() {
    let mut container = CaseContainer::new(MockCaseApi::new(), HeadlessHost::new());
    let generation = container.generation();

    let result = container.open("ASSIGN-WORKLIST MISSING", CASE_ID);
    assert!(matches!(result, Err(CaseError::InvalidResponse(_))));
    assert_eq!(container.state(), ContainerState::Empty);
    assert!(container.generation() > generation);
    assert!(container.session().registry.is_empty());
    assert_eq!(toasts(&container).len(), 1);
}

#[test]
fn select_case_action_reloads_or_refreshes() {
    let update_view = view_of(vec![text_input(0, ".Phone", "")]);
    let api = case_api(view_of(vec![text_input(0, ".Name", "Ada")])).with_view(ASSIGNMENT_ID, "Update", update_view);
    let mut container = opened(api);

    container.select_case_action("Update").unwrap();
    assert_eq!(container.current_action(), Some("Update"));
    assert!(container.session().store.contains("Phone"));

    container.select_case_action("Refresh").unwrap();
    assert_eq!(refreshed_contents(container.api()).len(), 1);
}

// =========================================================================
// Field edits
// =========================================================================

#[test]
fn editing_a_mirrored_reference_updates_every_widget() {
    let view = view_of(vec![
        text_input(0, ".Status", "Open"),
        text_input(1, ".Status", "Open"),
    ]);
    let mut container = opened(case_api(view));
    let status = container.field_for_reference("Status").unwrap();

    let run = container.field_changed(&status, json!("Closed")).unwrap();

    assert_eq!(run.steps, vec!["propagate"]);
    assert_eq!(container.state(), ContainerState::Editing);
    assert_eq!(container.session().store.get("Status"), Some(&json!("Closed")));
    assert_eq!(widget_value(&container.session().registry, 0), json!("Closed"));
    assert_eq!(widget_value(&container.session().registry, 1), json!("Closed"));
    assert!(refreshed_contents(container.api()).is_empty(), "No server round trip");
    assert!(container.events().contains(&ContainerEvent::FieldChanged {
        reference: "Status".into(),
        value: json!("Closed"),
    }));
}

#[test]
fn editing_drives_dependent_lookups() {
    let view = view_of(vec![
        text_input(0, ".Country", ""),
        dropdown(1, ".City", "D_Cities", &[("country", ".Country")]),
    ]);
    let api = case_api(view).with_data_page_for("D_Cities", &[("country", "X")], rows(&[("Y1", "v1")]));
    let mut container = opened(api);
    let country = container.field_for_reference(".Country").unwrap();

    let run = container.field_changed(&country, json!("X")).unwrap();

    let report = run.propagation.unwrap();
    assert_eq!(report.refreshed, vec![1]);
    assert_eq!(container.session().store.get("City"), Some(&json!("v1")));
}

#[test]
fn checkbox_text_is_stored_as_boolean() {
    let mut container = opened(case_api(view_of(vec![checkbox(0, ".Consent", false)])));
    let consent = container.field_for_reference("Consent").unwrap();

    container.field_changed(&consent, json!("true")).unwrap();
    assert_eq!(container.session().store.get("Consent"), Some(&json!(true)));
}

#[test]
fn blur_writes_the_store_only() {
    let view = view_of(vec![with_actions(text_input(0, ".Name", ""), json!([{ "action": "refresh" }]))]);
    let mut container = opened(case_api(view));

    container.field_blurred("Name", json!("Ada"));
    assert_eq!(container.session().store.get("Name"), Some(&json!("Ada")));
    assert_eq!(container.state(), ContainerState::Loaded);
    assert!(refreshed_contents(container.api()).is_empty());
}

#[test]
fn edits_are_rejected_once_closed() {
    let mut container = opened(case_api(view_of(vec![text_input(0, ".Name", "")])));
    let name = container.field_for_reference("Name").unwrap();
    container.cancel();

    let result = container.field_changed(&name, json!("x"));
    assert!(matches!(result, Err(CaseError::InvalidState { .. })));
}

// =========================================================================
// Action pipeline effects
// =========================================================================

#[test]
fn set_value_action_writes_target_widgets_before_propagating() {
    let amount = with_actions(
        text_input(0, ".Amount", ""),
        json!([{ "action": "setValue", "actionProcess": {
            "setValuePairs": [{ "name": ".Currency", "value": "\"EUR\"" }]
        } }]),
    );
    let view = view_of(vec![amount, text_input(1, ".Currency", "")]);
    let mut container = opened(case_api(view));
    let amount = container.field_for_reference("Amount").unwrap();

    let run = container.field_changed(&amount, json!("12")).unwrap();
    assert_eq!(run.steps, vec!["set_value", "propagate"]);
    assert_eq!(container.session().store.get("Currency"), Some(&json!("EUR")));
    assert_eq!(widget_value(&container.session().registry, 1), json!("EUR"));
}

#[test]
fn refresh_action_posts_content_and_skips_stale_propagation() {
    let amount = with_actions(
        text_input(0, ".Amount", ""),
        json!([{ "action": "refresh", "refreshFor": "Amount" }]),
    );
    let mut container = opened(case_api(view_of(vec![amount])));
    let generation = container.generation();
    let amount = container.field_for_reference("Amount").unwrap();

    let run = container.field_changed(&amount, json!("12")).unwrap();

    assert_eq!(run.steps, vec!["refresh", "propagate"]);
    assert!(run.stale, "View was replaced by the refresh");
    assert!(run.propagation.is_none());
    assert_eq!(container.generation(), generation + 1);
    assert_eq!(container.state(), ContainerState::Loaded);

    let refresh = container
        .api()
        .calls()
        .into_iter()
        .find(|c| matches!(c, ApiCall::Refresh { .. }))
        .unwrap();
    assert_eq!(
        refresh,
        ApiCall::Refresh {
            assignment_id: ASSIGNMENT_ID.into(),
            action_id: FLOW_ACTION.into(),
            content: json!({ "Amount": "12" }),
            refresh_for: Some("Amount".into()),
        }
    );
}

#[test]
fn open_url_and_run_script_go_through_the_host() {
    let link = with_actions(
        text_input(0, ".CustomerID", "C-1"),
        json!([
            { "action": "openUrlInWindow", "actionProcess": {
                "alternateDomain": { "url": "crm.example.com" },
                "queryParams": [{ "name": "id", "valueReference": { "reference": ".CustomerID" } }],
                "windowName": "crm"
            } },
            { "action": "runScript", "actionProcess": {
                "functionName": "highlight",
                "functionParameters": [{ "name": "color", "value": "red" }]
            } }
        ]),
    );
    let mut container = opened(case_api(view_of(vec![link])));
    let link = container.field_for_reference("CustomerID").unwrap();

    container.field_clicked(&link).unwrap();

    let host = container.host();
    assert_eq!(host.opened[0].url, "http://crm.example.com?id=C-1");
    assert_eq!(host.opened[0].window_name.as_deref(), Some("crm"));
    assert_eq!(
        host.scripts,
        vec![("highlight".to_string(), vec![("color".to_string(), "red".to_string())])]
    );
}

#[test]
fn take_action_reloads_under_the_named_action() {
    let escalate = with_actions(
        text_input(0, ".Escalate", ""),
        json!([{ "action": "takeAction", "actionProcess": { "actionName": "Update" } }]),
    );
    let api = case_api(view_of(vec![escalate])).with_view(ASSIGNMENT_ID, "Update", view_of(vec![]));
    let mut container = opened(api);
    let escalate = container.field_for_reference("Escalate").unwrap();

    let run = container.field_changed(&escalate, json!("yes")).unwrap();
    assert!(run.stale);
    assert_eq!(container.current_action(), Some("Update"));
}

// =========================================================================
// Error routing
// =========================================================================

#[test]
fn validation_errors_are_reported_on_their_fields_without_a_toast() {
    let amount = with_actions(text_input(0, ".Amount", ""), json!([{ "action": "postValue" }]));
    let view = view_of(vec![amount, text_input(1, ".Name", "")]);
    let api = case_api(view).with_refresh_reply(Err(validation_payload(Some(".Name"), "Required")));
    let mut container = opened(api);
    let amount = container.field_for_reference("Amount").unwrap();

    let result = container.field_changed(&amount, json!("12"));

    assert!(matches!(&result, Err(e) if e.is_validation()));
    assert_eq!(container.validation_errors().len(), 1);
    let name = container.session().registry.widget(1).unwrap();
    assert_eq!(name.validity_message(), Some("Required"));
    assert!(toasts(&container).is_empty());
    assert_eq!(container.state(), ContainerState::Editing, "Failed refresh returns to editing");
}

#[test]
fn lone_message_without_path_becomes_a_toast() {
    let amount = with_actions(text_input(0, ".Amount", ""), json!([{ "action": "postValue" }]));
    let api = case_api(view_of(vec![amount])).with_refresh_reply(Err(validation_payload(None, "Try again later")));
    let mut container = opened(api);
    let amount = container.field_for_reference("Amount").unwrap();

    let _ = container.field_changed(&amount, json!("12"));

    let toasts = toasts(&container);
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Try again later");
    assert!(container.validation_errors().is_empty());
}

#[test]
fn server_errors_become_titled_toasts() {
    let mut container = opened(case_api(view_of(vec![])));
    let payload: ApiErrorPayload = serde_json::from_value(json!({
        "errors": [{ "ID": "Pega_API_055", "message": "Lock held by another operator" }]
    }))
    .unwrap();

    container.handle_error(&CaseError::Server(payload));
    container.handle_error(&CaseError::Http {
        endpoint: "cases".into(),
        status: 502,
        body: String::new(),
    });

    let toasts = toasts(&container);
    assert_eq!(toasts[0].title, "Error, ID: Pega_API_055");
    assert_eq!(toasts[0].message, "Lock held by another operator");
    assert_eq!(toasts[1].message, GENERIC_ERROR);
    assert_eq!(toasts[1].variant, ToastVariant::Error);
}

// =========================================================================
// Submit
// =========================================================================

#[test]
fn submit_with_invalid_required_field_is_blocked() {
    let view = view_of(vec![required(text_input(0, ".Name", ""))]);
    let mut container = opened(case_api(view));

    let outcome = container.submit().unwrap();

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(container.state(), ContainerState::Loaded);
    assert_eq!(
        container.validation_errors(),
        &[ValidationMessage {
            path: Some("Validation errors".into()),
            message: "invalid form data".into(),
        }]
    );
    assert!(!container.api().calls().iter().any(|c| matches!(c, ApiCall::Perform { .. })));
    assert!(
        container.session().registry.widget(0).unwrap().validity_message().is_some(),
        "Field reports its own message"
    );
}

#[test]
fn submit_moves_to_the_next_assignment() {
    let view = view_of(vec![required(text_input(0, ".Name", "Ada"))]);
    let api = case_api(view).with_perform_reply(Ok(PerformResult {
        next_assignment_id: Some(ASSIGNMENT_ID.into()),
        next_page_id: None,
    }));
    let mut container = opened(api);

    let outcome = container.submit().unwrap();

    assert_eq!(outcome, SubmitOutcome::NextAssignment(ASSIGNMENT_ID.into()));
    assert_eq!(container.state(), ContainerState::Loaded);
    assert!(container.api().calls().contains(&ApiCall::Perform {
        assignment_id: ASSIGNMENT_ID.into(),
        action_id: FLOW_ACTION.into(),
        content: json!({ "Name": "Ada" }),
    }));
}

#[test]
fn submit_ending_on_a_page_shows_the_confirmation() {
    let mut page = view_of(vec![text_input(0, ".Summary", "Done")]);
    page.visible = false;
    let api = case_api(view_of(vec![]))
        .with_perform_reply(Ok(PerformResult {
            next_assignment_id: None,
            next_page_id: Some("Confirm".into()),
        }))
        .with_page(CASE_ID, "Confirm", page);
    let mut container = opened(api);

    let outcome = container.submit().unwrap();

    assert_eq!(outcome, SubmitOutcome::Confirmation("Confirm".into()));
    assert_eq!(container.state(), ContainerState::Confirming);
    assert_eq!(container.current_action(), Some("Confirm"));
    assert!(container.session().view.visible);
    assert_eq!(container.assignment_id(), None);

    container.confirm();
    let events = container.take_events();
    assert!(events.contains(&ContainerEvent::RefreshAssignments));
    assert_eq!(container.state(), ContainerState::Closed);
}

#[test]
fn submit_answer_without_next_step_is_an_error() {
    let api = case_api(view_of(vec![])).with_perform_reply(Ok(PerformResult::default()));
    let mut container = opened(api);

    let result = container.perform_action();
    assert!(matches!(result, Err(CaseError::InvalidResponse(_))));
    assert_eq!(container.state(), ContainerState::Loaded);
    assert_eq!(
        toasts(&container)[0].message,
        "Invalid server response, please contact your administrator"
    );
}

#[test]
fn submit_validation_failure_from_server_is_routed() {
    let view = view_of(vec![text_input(0, ".Name", "Ada")]);
    let api = case_api(view).with_perform_reply(Err(validation_payload(Some("Name"), "Name is taken")));
    let mut container = opened(api);

    assert!(container.submit().is_err());
    assert_eq!(container.validation_errors()[0].message, "Name is taken");
    assert_eq!(
        container.session().registry.widget(0).unwrap().validity_message(),
        Some("Name is taken")
    );
}

// =========================================================================
// Save, create, close
// =========================================================================

#[test]
fn save_posts_content_with_etag_and_confirms() {
    let mut container = opened(case_api(view_of(vec![text_input(0, ".Name", "Ada")])));

    container.save().unwrap();

    assert!(container.api().calls().contains(&ApiCall::UpdateCase {
        case_id: CASE_ID.into(),
        content: json!({ "Name": "Ada" }),
        etag: Some("\"20261018T101500.000 GMT\"".into()),
    }));
    let toast = &toasts(&container)[0];
    assert_eq!(toast.variant, ToastVariant::Success);
    assert_eq!(toast.message, "Work object W-7 successfully saved");
}

#[test]
fn save_validation_errors_are_routed() {
    let api = case_api(view_of(vec![text_input(0, ".Name", "")]))
        .with_update_reply(Err(validation_payload(Some(".Name"), "Required")));
    let mut container = opened(api);

    assert!(container.save().is_err());
    assert_eq!(container.validation_errors().len(), 1);
    assert!(toasts(&container).is_empty());
}

#[test]
fn create_case_opens_the_first_assignment() {
    let api = case_api(view_of(vec![text_input(0, ".Name", "Ada")])).with_created_case(Ok(CreatedCase {
        id: Some(CASE_ID.into()),
        next_assignment_id: Some(ASSIGNMENT_ID.into()),
    }));
    let mut container = CaseContainer::new(api, HeadlessHost::new());
    container.start_new(view_of(vec![text_input(0, ".Name", "Ada")])).unwrap();

    let created = container.create_case("ORG-APP-WORK", "pyStartCase").unwrap();

    assert_eq!(created.as_deref(), Some(CASE_ID));
    assert_eq!(container.state(), ContainerState::Loaded);
    assert!(container.events().contains(&ContainerEvent::WorkObjectCreated {
        case_id: CASE_ID.into()
    }));
    let ApiCall::CreateCase(request) = &container.api().calls()[0] else {
        panic!("Expected CreateCase first");
    };
    assert_eq!(request.content, json!({ "Name": "Ada" }));
}

#[test]
fn create_case_without_id_closes_with_a_toast() {
    let api = MockCaseApi::new().with_created_case(Ok(CreatedCase::default()));
    let mut container = CaseContainer::new(api, HeadlessHost::new());
    container.start_new(view_of(vec![])).unwrap();

    assert_eq!(container.create_case("ORG-APP-WORK", "pyStartCase").unwrap(), None);
    assert_eq!(toasts(&container)[0].message, "Could not create a new case");
    assert_eq!(container.state(), ContainerState::Closed);
}

#[test]
fn cancel_raises_work_object_closed() {
    let mut container = opened(case_api(view_of(vec![])));
    container.take_events();

    container.cancel();

    assert_eq!(
        container.take_events(),
        vec![ContainerEvent::WorkObjectClosed {
            assignment_id: Some(ASSIGNMENT_ID.into()),
            case_id: Some(CASE_ID.into()),
        }]
    );
    assert_eq!(container.state(), ContainerState::Closed);
}

// =========================================================================
// List and group rows
// =========================================================================

#[test]
fn list_add_appends_a_blank_row_and_refreshes() {
    let view = nested_view(
        text_input(0, ".Customer", "Ada"),
        vec![text_input(1, ".Items(1).Desc", "Widget")],
    );
    let mut container = opened(case_api(view));

    assert!(container.handle_list_action(RepeatKind::List, ".Items", ListActionKind::Add).unwrap());

    assert_eq!(
        refreshed_contents(container.api())[0]["Items"],
        json!([{ "Desc": "Widget" }, { "Desc": "" }])
    );
    assert!(matches!(
        container.events().last(),
        Some(ContainerEvent::ListAction {
            reference_type: RepeatKind::List,
            action: ListActionKind::Add,
            ..
        })
    ));
}

#[test]
fn list_delete_keeps_the_last_row() {
    let view = nested_view(
        text_input(0, ".Customer", "Ada"),
        vec![text_input(1, ".Items(1).Desc", "Widget")],
    );
    let mut container = opened(case_api(view));

    container.handle_list_action(RepeatKind::List, "Items", ListActionKind::Delete).unwrap();
    assert_eq!(
        refreshed_contents(container.api())[0]["Items"],
        json!([{ "Desc": "Widget" }])
    );
}

#[test]
fn group_add_uses_the_prompted_name() {
    let view = view_of(vec![text_input(0, ".Addresses(Work).City", "Lyon")]);
    let mut container = opened_with(case_api(view), HeadlessHost::new().with_answer(Some("Home")));

    assert!(container.handle_list_action(RepeatKind::Group, ".Addresses", ListActionKind::Add).unwrap());

    assert_eq!(
        refreshed_contents(container.api())[0]["Addresses"],
        json!({ "Work": { "City": "Lyon" }, "Home": {} })
    );
    assert_eq!(container.host().prompts_asked, vec!["Enter a name for the group."]);
}

#[test]
fn cancelled_group_prompt_does_nothing() {
    let view = view_of(vec![text_input(0, ".Addresses(Work).City", "Lyon")]);
    let mut container = opened_with(case_api(view), HeadlessHost::new().with_answer(None));

    assert!(!container.handle_list_action(RepeatKind::Group, "Addresses", ListActionKind::Delete).unwrap());
    assert!(refreshed_contents(container.api()).is_empty());
}

// =========================================================================
// Events and helpers
// =========================================================================

#[test]
fn events_serialize_with_lowercase_names() {
    let event = ContainerEvent::ListAction {
        reference_type: RepeatKind::List,
        reference: ".Items".into(),
        action: ListActionKind::Add,
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({ "event": "listactionevent", "referenceType": "List", "reference": ".Items", "action": "add" })
    );

    let changed = ContainerEvent::FieldChanged {
        reference: "Name".into(),
        value: json!("Ada"),
    };
    assert_eq!(
        serde_json::to_value(&changed).unwrap(),
        json!({ "event": "fieldchanged", "reference": "Name", "value": "Ada" })
    );
    assert_eq!(ListActionKind::from_name("delete"), Some(ListActionKind::Delete));
}

#[test]
fn refresh_reply_replaces_the_view() {
    let api = case_api(view_of(vec![text_input(0, ".Name", "Ada")])).with_refresh_reply(Ok(ViewResponse {
        view: view_of(vec![text_input(0, ".Name", "Ada"), text_input(1, ".Email", "ada@example.com")]),
    }));
    let mut container = opened(api);

    container.refresh(None).unwrap();
    assert_eq!(container.session().registry.len(), 2);
    assert_eq!(container.session().store.get("Email"), Some(&json!("ada@example.com")));
}

#[test]
fn re_rendered_widget_replaces_its_registration() {
    let mut container = opened(case_api(view_of(vec![
        text_input(0, ".Name", "Ada"),
        text_input(1, ".Email", ""),
    ])));

    let rerendered = field(text_input(0, ".Name", "Grace"));
    container
        .register_widget(rerendered.clone(), Box::new(HeadlessWidget::for_field(&rerendered)))
        .unwrap();

    let registry = &container.session().registry;
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.indices_for("Name").collect::<Vec<_>>(), vec![0]);
    assert_eq!(widget_value(registry, 0), json!("Grace"));
}

#[test]
fn fields_without_an_index_are_not_registered() {
    let mut container = opened(case_api(view_of(vec![text_input(0, ".Name", "Ada")])));

    let mut unindexed = field(text_input(0, ".Nickname", "Ace"));
    unindexed.index = None;
    let result = container.register_widget(unindexed.clone(), Box::new(HeadlessWidget::for_field(&unindexed)));

    assert!(matches!(result, Err(CaseError::UnindexedField { ref reference }) if reference == ".Nickname"));
    let registry = &container.session().registry;
    assert_eq!(registry.len(), 1);
    assert_eq!(widget_value(registry, 0), json!("Ada"), "Node 0 keeps its widget");
}

#[test]
fn reset_discards_the_view() {
    let mut container = opened(case_api(view_of(vec![text_input(0, ".Name", "Ada")])));
    let generation = container.generation();

    container.reset_assignment();
    assert_eq!(container.state(), ContainerState::Empty);
    assert!(container.generation() > generation);
    assert!(container.session().registry.is_empty());
    assert!(container.current_action().is_none());
}

#[test]
fn short_case_id_drops_the_class_prefix() {
    assert_eq!(short_case_id("ORG-APP-WORK W-12"), "W-12");
    assert_eq!(short_case_id("W-12"), "W-12");
}
