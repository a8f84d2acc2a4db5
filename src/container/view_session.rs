use serde_json::Value;

use crate::api::error::CaseError;
use crate::container::host::UiHost;
use crate::graph::dependency_graph::DependencyGraph;
use crate::graph::propagation::{PropagationEngine, PropagationReport};
use crate::options::resolver::{DataPageSource, OptionResolver};
use crate::registry::component_registry::{ComponentRegistry, Registration};
use crate::registry::widget::FieldWidget;
use crate::store::reference_store::ReferenceStore;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::view_fingerprint;
use crate::view::view_model::{FieldDescriptor, ViewTree};
use crate::view::walker::{assign_indices, collect_fields};

/// Everything derived from one loaded view: the graph, the registry and the
/// store. Rebuilt from scratch on every load or refresh and never reused.
#[derive(Debug, Default)]
pub struct ViewSession {
    pub view: ViewTree,
    pub graph: DependencyGraph,
    pub registry: ComponentRegistry,
    pub store: ReferenceStore,
    pub fingerprint: Option<String>,
}

impl ViewSession {
    pub fn empty(generation: u64) -> Self {
        ViewSession {
            view: ViewTree::empty(),
            registry: ComponentRegistry::new(generation),
            ..Default::default()
        }
    }

    /// Seed the store and graph from `view`, then bind a widget to every
    /// referenced field and give option fields their initial choices.
    pub fn build(
        mut view: ViewTree,
        generation: u64,
        host: &mut dyn UiHost,
        source: &dyn DataPageSource,
        case_content: Option<&Value>,
    ) -> Self {
        assign_indices(&mut view);
        let fingerprint = view_fingerprint(&view);

        let mut store = ReferenceStore::new();
        let graph = DependencyGraph::from_view(&view, &mut store);
        let mut registry = ComponentRegistry::new(generation);

        for field in collect_fields(&view) {
            if field.reference.is_empty() {
                continue;
            }
            let mut widget = host.bind_widget(field);
            if field.kind().has_options() {
                let lookup = OptionResolver::new(source, &store, case_content).resolve(field, None);
                widget.set_options(lookup.options);
            }
            registry.register(field.clone(), widget);
        }

        ViewSession {
            view,
            graph,
            registry,
            store,
            fingerprint: Some(fingerprint),
        }
    }

    pub fn generation(&self) -> u64 {
        self.registry.generation()
    }

    /// Re-register a field whose widget re-rendered. The graph picks up any
    /// edge the new registration implies.
    ///
    /// The field must carry its node index, as fields taken from `view` do.
    pub fn register(
        &mut self,
        field: FieldDescriptor,
        widget: Box<dyn FieldWidget>,
    ) -> Result<Vec<Registration>, CaseError> {
        if field.index.is_none() {
            return Err(CaseError::UnindexedField {
                reference: field.reference,
            });
        }
        self.graph.link_field(&field);
        Ok(self.registry.register(field, widget))
    }

    /// Nested content to post back to the server.
    pub fn post_content(&self) -> Value {
        self.store.to_post_content(&self.registry)
    }

    pub fn propagate(
        &mut self,
        field: &FieldDescriptor,
        value: Value,
        source: &dyn DataPageSource,
        case_content: Option<&Value>,
        tracer: &TraceLogger,
    ) -> PropagationReport {
        PropagationEngine::new(&self.graph, &mut self.registry, &mut self.store, source)
            .with_case_content(case_content)
            .traced(tracer, self.fingerprint.as_deref())
            .propagate(field, value)
    }
}
