use crate::error::{Result, TrayPlacerError};
use crate::shape::ShapeMask;
use serde::{Deserialize, Serialize};

/// Inclusive range of origins for which a mask's bounding box lies on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OriginRange {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl OriginRange {
    /// Number of candidate origins in the range.
    pub fn candidates(&self) -> u64 {
        (self.max_x - self.min_x + 1) as u64 * (self.max_y - self.min_y + 1) as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Board-wide occupancy model.
///
/// Commits are all-or-nothing: a footprint is written only when every one of its cells
/// is on the board and free, so no two committed footprints ever share a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementGrid {
    width: u32,
    height: u32,
    occupied: Vec<bool>,
}

impl PlacementGrid {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TrayPlacerError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            occupied: vec![false; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_occupied(&self, x: u32, y: u32) -> Result<bool> {
        if x >= self.width || y >= self.height {
            return Err(TrayPlacerError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.occupied[self.index(x, y)])
    }

    /// True if every occupied cell of `mask` lands on a free board cell when the mask's
    /// `(0, 0)` is placed at `(origin_x, origin_y)`. Holes in the mask are ignored.
    pub fn fits(&self, mask: &ShapeMask, origin_x: u32, origin_y: u32) -> bool {
        mask.occupied_cells().all(|(x, y)| {
            self.absolute(origin_x, origin_y, x, y)
                .is_some_and(|i| !self.occupied[i])
        })
    }

    /// Writes the footprint of `mask` at the given origin.
    ///
    /// The fit is re-checked first; on `DoesNotFit` the grid is left unchanged.
    pub fn commit(&mut self, mask: &ShapeMask, origin_x: u32, origin_y: u32) -> Result<()> {
        if !self.fits(mask, origin_x, origin_y) {
            return Err(TrayPlacerError::DoesNotFit {
                x: origin_x,
                y: origin_y,
            });
        }
        self.write(mask, origin_x, origin_y, true);
        Ok(())
    }

    /// Frees a footprint previously committed at the same origin.
    ///
    /// Fails with `DoesNotFit` (grid unchanged) if any target cell is off the board or
    /// already free.
    pub fn release(&mut self, mask: &ShapeMask, origin_x: u32, origin_y: u32) -> Result<()> {
        let covered = mask.occupied_cells().all(|(x, y)| {
            self.absolute(origin_x, origin_y, x, y)
                .is_some_and(|i| self.occupied[i])
        });
        if !covered {
            return Err(TrayPlacerError::DoesNotFit {
                x: origin_x,
                y: origin_y,
            });
        }
        self.write(mask, origin_x, origin_y, false);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.occupied.fill(false);
    }

    /// Origins at which the mask's bounding box stays on the board, or `None` when the
    /// mask is wider or taller than the board.
    pub fn legal_origin_range(&self, mask: &ShapeMask) -> Option<OriginRange> {
        if mask.width() > self.width || mask.height() > self.height {
            return None;
        }
        Some(OriginRange {
            min_x: 0,
            max_x: self.width - mask.width(),
            min_y: 0,
            max_y: self.height - mask.height(),
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&c| c).count()
    }

    pub fn cell_count(&self) -> usize {
        self.occupied.len()
    }

    /// Occupancy as rows, `rows()[y][x]`.
    pub fn rows(&self) -> Vec<Vec<bool>> {
        self.occupied
            .chunks(self.width as usize)
            .map(|r| r.to_vec())
            .collect()
    }

    fn write(&mut self, mask: &ShapeMask, origin_x: u32, origin_y: u32, value: bool) {
        let w = self.width as usize;
        for (x, y) in mask.occupied_cells() {
            let i = (origin_y + y) as usize * w + (origin_x + x) as usize;
            self.occupied[i] = value;
        }
    }

    // Flat index of the board cell under relative cell (x, y), if on the board.
    fn absolute(&self, origin_x: u32, origin_y: u32, x: u32, y: u32) -> Option<usize> {
        let ax = origin_x as u64 + x as u64;
        let ay = origin_y as u64 + y as u64;
        if ax >= self.width as u64 || ay >= self.height as u64 {
            return None;
        }
        Some(ay as usize * self.width as usize + ax as usize)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
