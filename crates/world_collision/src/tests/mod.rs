//! Cross-module scenario and oracle tests

mod fixtures;
mod scenarios;
