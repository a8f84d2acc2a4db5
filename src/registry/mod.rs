pub mod component_registry;
pub mod widget;
