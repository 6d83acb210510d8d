//! Workflow and billing engine for fiber construction work.
//!
//! This crate tracks cable segments and splice points through the boring,
//! pulling and splicing phases, decides which status changes are allowed,
//! checks photo and power meter evidence, and prices completed work against
//! customer rate cards.
//!
//! The rules are pure functions over unit snapshots and an injected
//! [`EngineConfig`](config::EngineConfig). The [`api`] module serves them
//! over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod billing;
pub mod config;
pub mod error;
pub mod evidence;
pub mod models;
pub mod workflow;
