pub mod lenient;
pub mod view_model;
pub mod walker;
