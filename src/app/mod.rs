//! App Orchestration Methods
//!
//! This module contains App implementation methods grouped by domain.
//! Each submodule contains methods that orchestrate between:
//! - Session state (pure, in the library crate)
//! - Services (API worker, location lookup)
//! - Handlers (in src/handlers/)
//! - UI rendering (in src/ui/)
//!
//! Methods are kept as `impl App` but organized by functional domain
//! for better discoverability and maintainability.

pub(crate) mod clipboard;
pub(crate) mod commands;
pub(crate) mod images;
