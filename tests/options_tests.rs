use case_forms::{
    api::{api_model::DataPageResult, client::MockCaseApi},
    options::resolver::{FetchStatus, OptionItem, OptionResolver, RefreshRequest, rows_to_options},
    store::reference_store::ReferenceStore,
    view::view_model::DataPageParam,
};
use serde_json::json;

use crate::common::{
    fixtures::{dropdown, field, local_dropdown, rows, text_input, view_of},
    utils::{session, widget_options},
};

mod common;

fn option(label: &str, value: &str) -> OptionItem {
    OptionItem {
        label: label.into(),
        value: value.into(),
    }
}

#[test]
fn local_list_maps_key_to_value_and_value_to_label() {
    let api = MockCaseApi::new();
    let store = ReferenceStore::new();
    let priority = field(local_dropdown(0, ".Priority", &[("H", "High"), ("L", "Low")]));

    let lookup = OptionResolver::new(&api, &store, None).resolve(&priority, None);
    assert_eq!(lookup.status, FetchStatus::Local);
    assert_eq!(lookup.options, vec![option("High", "H"), option("Low", "L")]);
}

#[test]
fn page_list_reads_rows_from_case_content() {
    let api = MockCaseApi::new();
    let store = ReferenceStore::new();
    let mut owner = local_dropdown(0, ".Owner", &[]);
    owner["control"]["modes"][0] = json!({
        "listSource": "pageList",
        "clipboardPageID": "Operators",
        "clipboardPagePrompt": "Name",
        "clipboardPageValue": "ID"
    });
    let owner = field(owner);
    let content = json!({ "Operators": [{ "ID": "op1", "Name": "Ada" }, { "ID": "op2", "Name": "Grace" }] });

    let lookup = OptionResolver::new(&api, &store, Some(&content)).resolve(&owner, None);
    assert_eq!(lookup.options, vec![option("Ada", "op1"), option("Grace", "op2")]);
    assert!(api.calls().is_empty());
}

#[test]
fn unsatisfied_parameters_fall_back_to_local_options() {
    let api = MockCaseApi::new().with_data_page("D_Cities", rows(&[("Lyon", "LYS")]));
    let store = ReferenceStore::new();
    let mut city = dropdown(0, ".City", "D_Cities", &[("country", ".Country")]);
    city["control"]["modes"][0]["options"] = json!([{ "key": "NONE", "value": "Pick a country first" }]);
    let city = field(city);

    let lookup = OptionResolver::new(&api, &store, None).resolve(&city, None);
    assert_eq!(lookup.status, FetchStatus::Local);
    assert_eq!(lookup.options, vec![option("Pick a country first", "NONE")]);
    assert!(api.data_page_calls().is_empty());
}

#[test]
fn saved_values_satisfy_parameters() {
    let api = MockCaseApi::new().with_data_page("D_Cities", rows(&[("Lyon", "LYS")]));
    let store = ReferenceStore::new();
    let mut city = dropdown(0, ".City", "D_Cities", &[]);
    city["control"]["modes"][0]["dataPageParams"] = json!([
        { "name": "country", "valueReference": { "reference": ".Country", "lastSavedValue": "FR" } },
        { "name": "kind", "value": "\"urban\"" }
    ]);
    let city = field(city);

    let lookup = OptionResolver::new(&api, &store, None).resolve(&city, None);
    assert_eq!(
        lookup.status,
        FetchStatus::Fetched {
            data_page_id: "D_Cities".into()
        }
    );
    let (_, params) = &api.data_page_calls()[0];
    assert_eq!(params.get("country").map(String::as_str), Some("FR"));
    assert_eq!(params.get("kind").map(String::as_str), Some("urban"), "Quotes are stripped");
}

#[test]
fn refresh_request_overrides_its_parameter() {
    let api = MockCaseApi::new().with_data_page_for("D_Cities", &[("country", "DE")], rows(&[("Berlin", "BER")]));
    let mut store = ReferenceStore::new();
    store.set("Country", json!("FR"));
    let city = field(dropdown(0, ".City", "D_Cities", &[("country", ".Country")]));

    let request = RefreshRequest {
        refresh: true,
        param_key: Some("country".into()),
        param_value: json!("DE"),
        params: city.first_mode().unwrap().data_page_params.clone(),
    };
    let lookup = OptionResolver::new(&api, &store, None).resolve(&city, Some(&request));
    assert_eq!(lookup.options, vec![option("Berlin", "BER")]);
}

#[test]
fn lookup_without_params_is_fetched_at_load() {
    let view = view_of(vec![dropdown(0, ".Country", "D_Countries", &[])]);
    let api = MockCaseApi::new().with_data_page("D_Countries", rows(&[("France", "FR"), ("Germany", "DE")]));
    let session = session(view, &api);

    assert_eq!(api.data_page_calls().len(), 1);
    assert_eq!(
        widget_options(&session.registry, 0),
        vec![option("France", "FR"), option("Germany", "DE")]
    );
}

#[test]
fn failed_lookup_resolves_to_empty_list() {
    let api = MockCaseApi::new().with_failing_data_page("D_Countries");
    let store = ReferenceStore::new();
    let country = field(dropdown(0, ".Country", "D_Countries", &[]));

    let lookup = OptionResolver::new(&api, &store, None).resolve(&country, None);
    assert!(lookup.options.is_empty());
    assert!(matches!(lookup.status, FetchStatus::Failed { .. }));
}

#[test]
fn fields_without_modes_have_no_source() {
    let api = MockCaseApi::new();
    let store = ReferenceStore::new();
    let mut name = text_input(0, ".Name", "");
    name["control"]["modes"] = json!([]);

    let lookup = OptionResolver::new(&api, &store, None).resolve(&field(name), None);
    assert_eq!(lookup.status, FetchStatus::NoSource);
}

#[test]
fn rows_without_a_value_are_skipped() {
    let result: DataPageResult = serde_json::from_value(json!({
        "pxResults": [
            { "pyValue": "A", "pyLabel": "Alpha" },
            { "pyLabel": "No value" },
            { "pyValue": "", "pyLabel": "Blank" },
            { "pyValue": 7 }
        ]
    }))
    .unwrap();
    let mode = field(dropdown(0, ".X", "D_X", &[])).control.modes[0].clone();

    assert_eq!(
        rows_to_options(&result, &mode),
        vec![option("Alpha", "A"), option("", "7")]
    );
}

#[test]
fn parameter_source_reference_ignores_blank_references() {
    let param: DataPageParam = serde_json::from_value(json!({
        "name": "p",
        "valueReference": { "reference": "" }
    }))
    .unwrap();
    assert_eq!(param.source_reference(), None);
}
