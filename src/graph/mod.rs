pub mod dependency_graph;
pub mod propagation;
