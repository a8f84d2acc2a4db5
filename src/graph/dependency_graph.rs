use indexmap::{IndexMap, IndexSet};

use crate::store::path::expand_relative_path;
use crate::store::reference_store::{ReferenceStore, decode_html};
use crate::view::view_model::{FieldDescriptor, FieldIndex, ViewTree};
use crate::view::walker::collect_fields;
use serde_json::Value;

/// Directed graph over field indices.
///
/// An edge `a -> b` means a change to field `a` can affect field `b`: either
/// `b`'s option lookup takes `a`'s value as a parameter, or both fields show
/// the same reference. Edges form a set; adding one twice is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    adjacency: IndexMap<FieldIndex, IndexSet<FieldIndex>>,
    references: IndexMap<String, IndexSet<FieldIndex>>,
    moded: IndexSet<FieldIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store and build the graph for a whole view.
    ///
    /// Every referenced field becomes a node first, so parameter edges do
    /// not depend on the order fields appear in.
    pub fn from_view(view: &ViewTree, store: &mut ReferenceStore) -> Self {
        let mut graph = DependencyGraph::new();
        let fields = collect_fields(view);

        for field in &fields {
            if field.reference.is_empty() {
                continue;
            }
            graph.add_reference(&field.reference, field.node());
            if field.has_modes() {
                graph.moded.insert(field.node());
            }
            store.set(&field.reference, seed_value(&field.value));
        }
        for field in &fields {
            graph.link_field(field);
        }

        graph
    }

    pub fn add_node(&mut self, index: FieldIndex) {
        self.adjacency.entry(index).or_default();
    }

    /// Returns whether the edge is new. Self-edges are ignored.
    pub fn add_edge(&mut self, from: FieldIndex, to: FieldIndex) -> bool {
        if from == to {
            return false;
        }
        self.add_node(to);
        self.adjacency.entry(from).or_default().insert(to)
    }

    /// Record that `index` shows `reference` and make it a node.
    pub fn add_reference(&mut self, reference: &str, index: FieldIndex) {
        self.add_node(index);
        self.references
            .entry(expand_relative_path(reference).to_string())
            .or_default()
            .insert(index);
    }

    /// Add the edges that involve `field`. Modeless fields take no part,
    /// neither as the field itself nor as a mirror or parameter source.
    ///
    /// Mirrors of the same reference are linked both ways; each parameter
    /// source links into the field. Returns how many new edges were added.
    pub fn link_field(&mut self, field: &FieldDescriptor) -> usize {
        if field.reference.is_empty() || !field.has_modes() {
            return 0;
        }
        let index = field.node();
        self.add_reference(&field.reference, index);
        self.moded.insert(index);

        let mirrors: Vec<FieldIndex> = self.moded_indices_for(&field.reference).collect();
        let mut providers: Vec<FieldIndex> = Vec::new();
        if let Some(mode) = field.first_mode() {
            for source in mode.parameter_sources() {
                providers.extend(self.moded_indices_for(source));
            }
        }

        let mut added = 0;
        for mirror in mirrors {
            added += usize::from(self.add_edge(mirror, index));
            added += usize::from(self.add_edge(index, mirror));
        }
        for provider in providers {
            added += usize::from(self.add_edge(provider, index));
        }
        added
    }

    /// Direct dependents of `index`, in insertion order.
    pub fn neighbors(&self, index: FieldIndex) -> impl Iterator<Item = FieldIndex> + '_ {
        self.adjacency
            .get(&index)
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    pub fn contains(&self, index: FieldIndex) -> bool {
        self.adjacency.contains_key(&index)
    }

    pub fn has_edge(&self, from: FieldIndex, to: FieldIndex) -> bool {
        self.adjacency
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    pub fn indices_for_reference(&self, reference: &str) -> impl Iterator<Item = FieldIndex> + '_ {
        self.references
            .get(expand_relative_path(reference))
            .into_iter()
            .flat_map(|indices| indices.iter().copied())
    }

    fn moded_indices_for<'a>(&'a self, reference: &str) -> impl Iterator<Item = FieldIndex> + 'a {
        self.indices_for_reference(reference)
            .filter(|index| self.moded.contains(index))
    }

    pub fn references(&self) -> impl Iterator<Item = (&str, &IndexSet<FieldIndex>)> {
        self.references.iter().map(|(r, i)| (r.as_str(), i))
    }

    pub fn nodes(&self) -> impl Iterator<Item = FieldIndex> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexSet::len).sum()
    }

    pub fn edges(&self) -> impl Iterator<Item = (FieldIndex, FieldIndex)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&from, targets)| targets.iter().map(move |&to| (from, to)))
    }
}

fn seed_value(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(decode_html(text)),
        other => other.clone(),
    }
}
