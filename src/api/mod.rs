pub mod api_model;
pub mod client;
pub mod error;
