//! Road-camera station map client
//!
//! Exposes modules for testing

pub mod api;
pub mod config;
pub mod i18n;
pub mod logic;
pub mod messages;
pub mod model;
pub mod prefs;
pub mod query;
pub mod registry;
pub mod route;
pub mod session;
pub mod utils;
