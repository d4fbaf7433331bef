use crate::placer::TrayPlacement;
use serde::{Deserialize, Serialize};

/// Session-level metadata carried into exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Schema version of the exported layout; current: "1".
    pub schema_version: String,
    pub app: String,
    pub version: String,
    pub max_attempts: u32,
    pub seed: Option<u64>,
    pub selection: String,
}

/// Outcome of a full placement session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementReport<K = String> {
    pub board_width: u32,
    pub board_height: u32,
    /// One entry per tray, in the order the trays were attempted.
    pub placements: Vec<TrayPlacement<K>>,
    /// Final occupancy, `occupancy[y][x]`.
    pub occupancy: Vec<Vec<bool>>,
    pub meta: ReportMeta,
}

/// Statistics about a placement session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlacementStats {
    pub num_trays: usize,
    pub num_placed: usize,
    pub num_failed: usize,
    /// Board cells covered by placed trays.
    pub occupied_cells: usize,
    pub total_cells: usize,
    /// occupied_cells / total_cells (0.0 to 1.0).
    pub occupancy: f64,
    /// Sum of attempts over all trays.
    pub total_attempts: u64,
}

impl<K> PlacementReport<K> {
    /// Computes statistics for this report.
    pub fn stats(&self) -> PlacementStats {
        let num_trays = self.placements.len();
        let num_placed = self
            .placements
            .iter()
            .filter(|p| p.outcome.is_placed())
            .count();
        let occupied_cells = self.occupancy.iter().flatten().filter(|&&c| c).count();
        let total_cells = self.board_width as usize * self.board_height as usize;
        let occupancy = if total_cells > 0 {
            occupied_cells as f64 / total_cells as f64
        } else {
            0.0
        };
        PlacementStats {
            num_trays,
            num_placed,
            num_failed: num_trays - num_placed,
            occupied_cells,
            total_cells,
            occupancy,
            total_attempts: self.placements.iter().map(|p| p.attempts as u64).sum(),
        }
    }

    pub fn all_placed(&self) -> bool {
        self.placements.iter().all(|p| p.outcome.is_placed())
    }
}

impl PlacementStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Trays: {}, Placed: {}, Failed: {}, Occupancy: {:.2}% ({}/{} cells), Attempts: {}",
            self.num_trays,
            self.num_placed,
            self.num_failed,
            self.occupancy * 100.0,
            self.occupied_cells,
            self.total_cells,
            self.total_attempts,
        )
    }

    /// Fraction of trays that were placed (0.0 to 1.0).
    pub fn success_rate(&self) -> f64 {
        if self.num_trays > 0 {
            self.num_placed as f64 / self.num_trays as f64
        } else {
            0.0
        }
    }
}
