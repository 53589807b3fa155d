//! Termcel - terminal ASCII animation format, editor core, and player
//!
//! This library provides functionality to:
//! - Load animation definitions (.cel / .json5) with lenient error handling
//! - Edit per-cell frame colors with batched, bounded undo/redo
//! - Flood-fill and line-paint over character grids
//! - Play frame sequences on a deterministic, clock-injected scheduler
//! - Export animations back to self-contained definition text

pub mod cli;
pub mod clipboard;
pub mod edit;
pub mod export;
pub mod models;
pub mod palette;
pub mod player;
pub mod raster;
pub mod registry;
pub mod session;
pub mod store;
pub mod template;
pub mod terminal;
