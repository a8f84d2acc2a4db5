use serde_json::Value;

use crate::api::client::{HttpCaseApi, MockCaseApi};
use crate::container::case_container::CaseContainer;
use crate::container::events::ContainerEvent;
use crate::container::host::HeadlessHost;
use crate::container::view_session::ViewSession;
use crate::store::reference_store::value_to_text;
use crate::trace::logger::TraceLogger;
use crate::{load_option_table, load_view_file};

// ============================================================================
// graph subcommand
// ============================================================================

pub fn cmd_graph(view_path: &str, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let view = load_view_file(view_path)?;
    let api = MockCaseApi::new();
    let mut host = HeadlessHost::new();
    let session = ViewSession::build(view, 1, &mut host, &api, None);

    if verbose > 0 {
        eprintln!("Loaded {} (fingerprint {})", view_path, session.fingerprint.as_deref().unwrap_or("-"));
    }

    println!(
        "{} nodes, {} edges, {} registered fields",
        session.graph.node_count(),
        session.graph.edge_count(),
        session.registry.len()
    );

    println!("References:");
    for (reference, indices) in session.graph.references() {
        let indices: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
        println!("  {} -> [{}]", reference, indices.join(", "));
    }

    println!("Edges:");
    for (from, to) in session.graph.edges() {
        let name = |index| {
            session
                .registry
                .field(index)
                .map(|f| f.reference.clone())
                .unwrap_or_else(|| "?".to_string())
        };
        println!("  {} ({}) -> {} ({})", from, name(from), to, name(to));
    }

    Ok(())
}

// ============================================================================
// propagate subcommand
// ============================================================================

pub fn cmd_propagate(
    view_path: &str,
    reference: &str,
    value: &str,
    options_path: Option<&str>,
    tracer: &TraceLogger,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = load_view_file(view_path)?;

    let mut api = MockCaseApi::new();
    if let Some(path) = options_path {
        for (data_page_id, result) in load_option_table(path)? {
            api = api.with_data_page(&data_page_id, result);
        }
    }

    let mut host = HeadlessHost::new();
    let mut session = ViewSession::build(view, 1, &mut host, &api, None);

    let field = session
        .registry
        .registrations_for(reference)
        .next()
        .map(|r| r.field.clone())
        .ok_or_else(|| format!("No field is bound to reference '{}'", reference))?;

    if verbose > 0 {
        eprintln!("Propagating {} = {:?} from field {}", reference, value, field.node());
    }

    let report = session.propagate(&field, Value::String(value.to_string()), &api, None, tracer);

    println!("Visited: {:?}", report.visited);
    if !report.mirrored.is_empty() {
        println!("Mirrored: {:?}", report.mirrored);
    }
    if !report.refreshed.is_empty() {
        println!("Refreshed: {:?}", report.refreshed);
    }
    if !report.cleared.is_empty() {
        println!("Cleared: {:?}", report.cleared);
    }
    if verbose > 1 {
        for (index, status) in &report.fetches {
            eprintln!("  fetch for {}: {:?}", index, status);
        }
    }

    println!("Store:");
    for (reference, value) in session.store.iter() {
        println!("  {} = {}", reference, value_to_text(value));
    }

    Ok(())
}

// ============================================================================
// open subcommand
// ============================================================================

pub fn cmd_open(
    base_url: &str,
    token: Option<&str>,
    assignment_id: &str,
    case_id: &str,
    action: Option<&str>,
    validate_on_submit: bool,
    tracer: TraceLogger,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpCaseApi::new(base_url, token);
    let mut container = CaseContainer::new(api, HeadlessHost::new())
        .with_tracer(tracer)
        .with_validate_on_submit(validate_on_submit);

    if verbose > 0 {
        eprintln!("Opening {} of {} at {}", assignment_id, case_id, base_url);
    }

    let opened = container.open(assignment_id, case_id).and_then(|_| match action {
        Some(action) => container.select_case_action(action),
        None => Ok(()),
    });

    for event in container.take_events() {
        match event {
            ContainerEvent::ChangeTitle(title) => {
                println!("{} ({}) - {}", title.case_name, title.case_id, title.action)
            }
            ContainerEvent::Toast(toast) => eprintln!("[{}] {}", toast.title, toast.message),
            other if verbose > 1 => eprintln!("  event: {:?}", other),
            _ => {}
        }
    }
    opened?;

    println!("State: {}", container.state());
    println!(
        "Action: {}",
        container.current_action().unwrap_or("-")
    );

    if !container.stages().is_empty() {
        let stages: Vec<&str> = container.stages().iter().map(|s| s.label.as_str()).collect();
        println!("Stages: {}", stages.join(" > "));
    }
    let actions: Vec<&str> = container.actions().iter().map(|a| a.label.as_str()).collect();
    println!("Actions: {}", actions.join(", "));

    println!("Fields:");
    for registration in container.session().registry.iter() {
        let field = &registration.field;
        println!(
            "  [{}] {} = {}{}",
            field.node(),
            field.reference,
            value_to_text(&registration.widget.value()),
            if field.required { " (required)" } else { "" }
        );
    }

    Ok(())
}
