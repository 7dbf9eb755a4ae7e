//! # duel-arena
//!
//! Per-tick orchestration of a hero and a learning knight.
//!
//! This crate provides:
//! - [`Arena`], which owns both combatants and runs the tick pipeline
//! - The [`Presentation`] seam and a headless [`ClipTimeline`]
//! - Telemetry batches published over a broadcast channel
//! - [`SparringPartner`], a scripted hero for training runs

pub mod arena;
pub mod config;
pub mod environment;
mod hero;
mod knight;
pub mod script;
pub mod timeline;

pub use arena::{Arena, Outcome, TickReport};
pub use config::{ArenaConfig, ReactiveBlockConfig};
pub use environment::{NullPresentation, Presentation, TelemetryBatch};
pub use script::SparringPartner;
pub use timeline::ClipTimeline;
