pub mod config;
pub mod domain;
pub mod host;
pub mod inject;
pub mod popup;
pub mod store;
pub mod tab;
