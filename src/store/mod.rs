pub mod path;
pub mod reference_store;
