//! Core library for placing polyomino-shaped trays onto a fixed-size grid.
//!
//! - `ShapeMask`: immutable occupancy mask of one tray within its bounding box
//! - `PlacementGrid`: board occupancy with fit test, atomic commit and release
//! - `TrayPlacer`: greedy randomized placement with a bounded number of attempts per tray
//! - Pipeline: `place_trays` runs a whole session from a `PlacerConfig` and returns a report
//!
//! Randomness is injected through [`RandomSource`], so a seeded source reproduces a
//! session exactly.
//!
//! Quick example:
//! ```no_run
//! use tray_placer_core::prelude::*;
//! # fn main() -> Result<(), TrayPlacerError> {
//! let cfg = PlacerConfig::builder()
//!     .with_board(6, 6)
//!     .tray(TraySpec::rect(2, 2))
//!     .tray("3x2:111/100".parse()?)
//!     .build();
//! let report = place_trays(&cfg, &mut RngSource::seeded(7))?;
//! println!("{}", report.stats().summary());
//! print!("{}", to_ascii(&report));
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod model;
pub mod pipeline;
pub mod placer;
pub mod random;
pub mod shape;

pub use config::*;
pub use error::*;
pub use export::*;
pub use grid::*;
pub use model::*;
pub use pipeline::*;
pub use placer::*;
pub use random::*;
pub use shape::*;

/// Convenience prelude for common types and functions.
/// Importing `tray_placer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PlacerConfig, PlacerConfigBuilder, SelectionMode, TraySpec};
    pub use crate::error::TrayPlacerError;
    pub use crate::export::{to_ascii, to_json};
    pub use crate::grid::{OriginRange, PlacementGrid};
    pub use crate::model::{PlacementReport, PlacementStats, ReportMeta};
    pub use crate::pipeline::{place_trays, place_trays_seeded};
    pub use crate::placer::{PlacedTray, PlacementOutcome, TrayPlacement, TrayPlacer};
    pub use crate::random::{RandomSource, RngSource};
    pub use crate::shape::ShapeMask;
}
