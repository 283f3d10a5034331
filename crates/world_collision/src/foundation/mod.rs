//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types, axes and tolerant float comparisons
//! - Rigid transforms and parent-chained locations
//! - Logging utilities

pub mod logging;
pub mod math;
