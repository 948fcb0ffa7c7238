//! # sentio-game — game integration for the sentio emotion core
//!
//! The glue between a game's event stream and the game-agnostic
//! `sentio-core` simulation.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │                Game loop                  │
//! │  ┌────────────────────────────────────┐  │
//! │  │          sentio-game               │  │
//! │  │  ┌──────────┐  ┌───────────────┐  │  │
//! │  │  │  Events  │  │    Systems    │  │  │
//! │  │  └────┬─────┘  └──────┬────────┘  │  │
//! │  │       │               │            │  │
//! │  │       ▼               ▼            │  │
//! │  │  ┌──────────────────────────┐      │  │
//! │  │  │       sentio-core        │      │  │
//! │  │  └──────────────────────────┘      │  │
//! │  └────────────────────────────────────┘  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `events` — game event types and their stimulus/relationship mapping
//! - `systems` — per-frame glue between events and the simulation
//! - `spatial` — a uniform-grid spatial index for neighbourhood queries
//! - `presentation` — listen-only aura and music cue adapters

pub mod events;
pub mod presentation;
pub mod spatial;
pub mod systems;
