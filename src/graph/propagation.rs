use std::collections::{HashSet, VecDeque};

use serde_json::Value;

use crate::graph::dependency_graph::DependencyGraph;
use crate::options::resolver::{DataPageSource, FetchStatus, OptionResolver, RefreshRequest};
use crate::registry::component_registry::ComponentRegistry;
use crate::store::path::expand_relative_path;
use crate::store::reference_store::ReferenceStore;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceKind;
use crate::view::view_model::{FieldDescriptor, FieldIndex};

/// What one propagation pass touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationReport {
    /// Every node acted on, the changed field first.
    pub visited: Vec<FieldIndex>,
    /// Nodes that received a mirrored write.
    pub mirrored: Vec<FieldIndex>,
    /// Dependents whose options were re-resolved and got a first option.
    pub refreshed: Vec<FieldIndex>,
    /// Dependents left without options and cleared.
    pub cleared: Vec<FieldIndex>,
    pub fetches: Vec<(FieldIndex, FetchStatus)>,
}

impl PropagationReport {
    pub fn touched(&self, index: FieldIndex) -> bool {
        self.visited.contains(&index)
    }
}

/// Walks the dependency graph from a changed field and applies the effects
/// to the registry and the store.
pub struct PropagationEngine<'a> {
    graph: &'a DependencyGraph,
    registry: &'a mut ComponentRegistry,
    store: &'a mut ReferenceStore,
    source: &'a dyn DataPageSource,
    case_content: Option<&'a Value>,
    tracer: Option<&'a TraceLogger>,
    fingerprint: Option<&'a str>,
}

impl<'a> PropagationEngine<'a> {
    pub fn new(
        graph: &'a DependencyGraph,
        registry: &'a mut ComponentRegistry,
        store: &'a mut ReferenceStore,
        source: &'a dyn DataPageSource,
    ) -> Self {
        PropagationEngine {
            graph,
            registry,
            store,
            source,
            case_content: None,
            tracer: None,
            fingerprint: None,
        }
    }

    /// Case content used by page-list option sources.
    pub fn with_case_content(mut self, content: Option<&'a Value>) -> Self {
        self.case_content = content;
        self
    }

    pub fn traced(mut self, tracer: &'a TraceLogger, fingerprint: Option<&'a str>) -> Self {
        self.tracer = Some(tracer);
        self.fingerprint = fingerprint;
        self
    }

    /// Push `value` from `changed` through the graph.
    ///
    /// Each node is acted on at most once per call, so cycles terminate.
    /// Mirrored writes are leaves. A dependent that gets options takes the
    /// first one and becomes a new source; one that gets none is cleared.
    pub fn propagate(&mut self, changed: &FieldDescriptor, value: Value) -> PropagationReport {
        let mut report = PropagationReport::default();
        let mut visited: HashSet<FieldIndex> = HashSet::new();

        let origin = changed.node();
        visited.insert(origin);
        report.visited.push(origin);
        if !changed.reference.is_empty() {
            self.store.set(&changed.reference, value.clone());
        }
        self.registry.set_widget_value(origin, &value);
        self.trace(TraceKind::Propagate, changed, &value);

        let mut worklist: VecDeque<(FieldDescriptor, Value)> = VecDeque::new();
        worklist.push_back((changed.clone(), value));

        while let Some((source_field, source_value)) = worklist.pop_front() {
            let source_reference = expand_relative_path(&source_field.reference);
            let neighbors: Vec<FieldIndex> = self.graph.neighbors(source_field.node()).collect();

            for neighbor in neighbors {
                if visited.contains(&neighbor) {
                    continue;
                }
                // Nodes without a live registration belong to no rendered widget.
                let Some(field) = self.registry.field(neighbor).cloned() else {
                    continue;
                };

                if expand_relative_path(&field.reference) == source_reference {
                    visited.insert(neighbor);
                    report.visited.push(neighbor);
                    self.registry.set_widget_value(neighbor, &source_value);
                    self.store.set(&field.reference, source_value.clone());
                    report.mirrored.push(neighbor);
                    self.trace(TraceKind::MirrorWrite, &field, &source_value);
                    continue;
                }

                let Some(mode) = field.first_mode().filter(|m| m.data_page_id.is_some()) else {
                    continue;
                };

                visited.insert(neighbor);
                report.visited.push(neighbor);

                let request = RefreshRequest {
                    refresh: true,
                    param_key: mode
                        .data_page_params
                        .iter()
                        .find(|p| {
                            p.source_reference()
                                .is_some_and(|r| expand_relative_path(r) == source_reference)
                        })
                        .map(|p| p.name.clone()),
                    param_value: source_value.clone(),
                    params: mode.data_page_params.clone(),
                };

                let lookup = OptionResolver::new(self.source, &*self.store, self.case_content)
                    .resolve(&field, Some(&request));
                self.trace_fetch(&field, &lookup.status, lookup.options.len());
                report.fetches.push((neighbor, lookup.status.clone()));

                let selected = lookup
                    .options
                    .first()
                    .map(|option| Value::String(option.value.clone()));
                if let Some(registration) = self.registry.get_mut(neighbor) {
                    registration.widget.set_options(lookup.options);
                }

                match selected {
                    Some(first) => {
                        self.registry.set_widget_value(neighbor, &first);
                        self.store.set(&field.reference, first.clone());
                        report.refreshed.push(neighbor);
                        worklist.push_back((field, first));
                    }
                    None => {
                        let empty = Value::String(String::new());
                        self.registry.set_widget_value(neighbor, &empty);
                        self.store.set(&field.reference, empty);
                        report.cleared.push(neighbor);
                    }
                }
            }
        }

        report
    }

    fn trace(&self, kind: TraceKind, field: &FieldDescriptor, value: &Value) {
        if let Some(tracer) = self.tracer {
            let event = tracer
                .event("Editing", kind)
                .with_reference(&field.reference)
                .with_index(field.node())
                .with_detail(value)
                .with_fingerprint(self.fingerprint);
            tracer.log(&event);
        }
    }

    fn trace_fetch(&self, field: &FieldDescriptor, status: &FetchStatus, count: usize) {
        if let Some(tracer) = self.tracer {
            let event = tracer
                .event("Editing", TraceKind::OptionFetch)
                .with_reference(&field.reference)
                .with_index(field.node())
                .with_detail(format!("{:?}, {} options", status, count))
                .with_fingerprint(self.fingerprint);
            tracer.log(&event);
        }
    }
}
