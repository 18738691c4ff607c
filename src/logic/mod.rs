//! Business Logic
//!
//! This module contains pure business logic functions that can be unit tested:
//! - carousel: Circular camera navigation
//! - cluster: Marker grouping on crowded maps
//! - errors: API error classification and display text
//! - formatting: Timestamps, ages and the heat indicator
//! - map: Viewport projection, zoom and pan
//! - partition: Interesting / standard station split
//! - search: Station filtering with wildcard patterns
//! - ui: Transient indicator timing

pub mod carousel;
pub mod cluster;
pub mod errors;
pub mod formatting;
pub mod map;
pub mod partition;
pub mod search;
pub mod ui;
