use crate::error::{Result, TrayPlacerError};
use crate::grid::PlacementGrid;
use crate::random::RandomSource;
use crate::shape::ShapeMask;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default bound on random attempts per tray.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Terminal state of a single tray.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// Committed with the mask's `(0, 0)` at board cell `(x, y)`.
    Placed { x: u32, y: u32 },
    /// No free origin was found within the attempt bound.
    Failed,
}

impl PlacementOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }

    pub fn origin(&self) -> Option<(u32, u32)> {
        match *self {
            Self::Placed { x, y } => Some((x, y)),
            Self::Failed => None,
        }
    }
}

/// Result of placing one tray.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrayPlacement<K = String> {
    pub key: K,
    pub mask: ShapeMask,
    pub outcome: PlacementOutcome,
    /// Attempts consumed; zero when the tray is larger than the board.
    pub attempts: u32,
}

/// A tray currently committed to the session's grid.
#[derive(Debug, Clone)]
pub struct PlacedTray<K = String> {
    pub key: K,
    pub mask: ShapeMask,
    pub x: u32,
    pub y: u32,
}

/// Greedy randomized placement session over one grid.
///
/// Trays are placed one at a time in the order given. Each tray gets up to
/// `max_attempts` uniformly drawn origins; the first one that fits is committed. Earlier
/// placements constrain later ones and nothing is ever backtracked.
pub struct TrayPlacer<K = String> {
    grid: PlacementGrid,
    max_attempts: u32,
    placed: Vec<PlacedTray<K>>,
}

impl<K: Clone + PartialEq> TrayPlacer<K> {
    pub fn new(grid: PlacementGrid, max_attempts: u32) -> Result<Self> {
        if max_attempts == 0 {
            return Err(TrayPlacerError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(Self {
            grid,
            max_attempts,
            placed: Vec::new(),
        })
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    /// Direct access to the board. Cells edited here are not reflected in [`Self::placed`].
    pub fn grid_mut(&mut self) -> &mut PlacementGrid {
        &mut self.grid
    }

    pub fn into_grid(self) -> PlacementGrid {
        self.grid
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Trays currently committed, in placement order.
    pub fn placed(&self) -> &[PlacedTray<K>] {
        &self.placed
    }

    /// Tries to place one tray against the current grid.
    pub fn place<R: RandomSource + ?Sized>(
        &mut self,
        key: K,
        mask: &ShapeMask,
        rng: &mut R,
    ) -> TrayPlacement<K> {
        let (outcome, attempts) = self.attempt(mask, rng);
        match outcome {
            PlacementOutcome::Placed { x, y } => {
                debug!(x, y, attempts, "tray placed");
                self.placed.push(PlacedTray {
                    key: key.clone(),
                    mask: mask.clone(),
                    x,
                    y,
                });
            }
            PlacementOutcome::Failed => {
                warn!(
                    attempts,
                    width = mask.width(),
                    height = mask.height(),
                    "failed to place tray after {} attempts",
                    attempts
                );
            }
        }
        TrayPlacement {
            key,
            mask: mask.clone(),
            outcome,
            attempts,
        }
    }

    /// Places every tray in order. A failed tray does not stop the session; the result
    /// mirrors the input order.
    pub fn place_all<R: RandomSource + ?Sized>(
        &mut self,
        trays: &[(K, ShapeMask)],
        rng: &mut R,
    ) -> Vec<TrayPlacement<K>> {
        trays
            .iter()
            .map(|(key, mask)| self.place(key.clone(), mask, rng))
            .collect()
    }

    /// Removes the first placed tray with `key` and frees its footprint.
    pub fn evict(&mut self, key: &K) -> bool {
        let Some(idx) = self.placed.iter().position(|p| &p.key == key) else {
            return false;
        };
        let tray = &self.placed[idx];
        match self.grid.release(&tray.mask, tray.x, tray.y) {
            Ok(()) => {
                self.placed.remove(idx);
                true
            }
            Err(e) => {
                warn!(error = %e, "tray footprint was not fully occupied; kept in session");
                false
            }
        }
    }

    /// Clears the grid and forgets every placement.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.placed.clear();
    }

    fn attempt<R: RandomSource + ?Sized>(
        &mut self,
        mask: &ShapeMask,
        rng: &mut R,
    ) -> (PlacementOutcome, u32) {
        let Some(range) = self.grid.legal_origin_range(mask) else {
            return (PlacementOutcome::Failed, 0);
        };
        for attempt in 1..=self.max_attempts {
            let x = rng.next_in_range(range.min_x, range.max_x);
            let y = rng.next_in_range(range.min_y, range.max_y);
            if self.grid.commit(mask, x, y).is_ok() {
                return (PlacementOutcome::Placed { x, y }, attempt);
            }
        }
        (PlacementOutcome::Failed, self.max_attempts)
    }
}
