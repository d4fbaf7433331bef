use crate::error::{Result, TrayPlacerError};
use serde::{Deserialize, Serialize};

/// Occupancy mask of a tray within its bounding box.
///
/// Cells are stored row-major: `cells[y * width + x]` is true when the tray covers the
/// relative cell `(x, y)`. A mask always has at least one occupied cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawShapeMask")]
pub struct ShapeMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

#[derive(Deserialize)]
struct RawShapeMask {
    width: u32,
    height: u32,
    #[serde(default)]
    cells: Option<Vec<bool>>,
}

impl TryFrom<RawShapeMask> for ShapeMask {
    type Error = TrayPlacerError;
    fn try_from(raw: RawShapeMask) -> Result<Self> {
        ShapeMask::new(raw.width, raw.height, raw.cells)
    }
}

impl ShapeMask {
    /// Builds a mask from explicit row-major cells, or a fully occupied rectangle when
    /// `cells` is `None`.
    pub fn new(width: u32, height: u32, cells: Option<Vec<bool>>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TrayPlacerError::InvalidShape(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize;
        let cells = match cells {
            Some(c) => c,
            None => vec![true; expected],
        };
        if cells.len() != expected {
            return Err(TrayPlacerError::InvalidShape(format!(
                "expected {} cells for {}x{}, got {}",
                expected,
                width,
                height,
                cells.len()
            )));
        }
        if !cells.iter().any(|&c| c) {
            return Err(TrayPlacerError::InvalidShape(
                "mask has no occupied cells".into(),
            ));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Fully occupied `width x height` rectangle.
    pub fn filled(width: u32, height: u32) -> Result<Self> {
        Self::new(width, height, None)
    }

    /// Builds a mask from rows, `rows[y][x]`. All rows must share the same length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u32;
        if let Some((y, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != width as usize)
        {
            return Err(TrayPlacerError::InvalidShape(format!(
                "row {} has {} columns, expected {}",
                y,
                row.len(),
                width
            )));
        }
        let cells = rows.iter().flatten().copied().collect();
        Self::new(width, height, Some(cells))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cell slice.
    pub fn cells(&self) -> &[bool] {
        &self.cells
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
        Ok(self.cells[self.index(x, y)])
    }

    /// Relative coordinates of every occupied cell, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(move |(i, _)| (i as u32 % w, i as u32 / w))
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn rows(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.width as usize)
            .map(|r| r.to_vec())
            .collect()
    }

    /// Returns a mask of the new size that keeps the overlapping cells of `self` and
    /// fills added columns and rows as occupied. Zero dimensions are clamped to 1.
    ///
    /// Fails with `InvalidShape` if shrinking cuts away every occupied cell.
    pub fn resize(&self, new_width: u32, new_height: u32) -> Result<Self> {
        let w = new_width.max(1);
        let h = new_height.max(1);
        let mut cells = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                let keep = if x < self.width && y < self.height {
                    self.cells[self.index(x, y)]
                } else {
                    true
                };
                cells.push(keep);
            }
        }
        Self::new(w, h, Some(cells))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
