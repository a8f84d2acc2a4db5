pub mod case_container;
pub mod events;
pub mod host;
pub mod lifecycle;
pub mod view_session;
