use crate::error::{Result, TrayPlacerError};
use crate::placer::DEFAULT_MAX_ATTEMPTS;
use crate::shape::ShapeMask;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the trays to place are picked from the configured list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Every configured tray once, in list order.
    InOrder,
    /// Each slot draws a tray uniformly (with replacement) from the list.
    RandomDraw,
}

impl FromStr for SelectionMode {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in_order" | "inorder" | "order" => Ok(Self::InOrder),
            "random_draw" | "randomdraw" | "random" => Ok(Self::RandomDraw),
            _ => Err(()),
        }
    }
}

/// Tray descriptor as it appears in configuration.
///
/// `shape` holds rows of occupancy (`shape[y][x]`). When the rows disagree with
/// `width`/`height`, each row and then the row count is resized to the declared size:
/// overlapping cells are kept and new cells are occupied. Rows of different lengths are
/// accepted. Without `shape`, or with no rows, the tray is a full rectangle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraySpec {
    #[serde(default)]
    pub id: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<Vec<bool>>>,
}

impl TraySpec {
    pub fn rect(width: u32, height: u32) -> Self {
        Self {
            id: None,
            width,
            height,
            shape: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_shape(mut self, rows: Vec<Vec<bool>>) -> Self {
        self.shape = Some(rows);
        self
    }

    pub fn to_mask(&self) -> Result<ShapeMask> {
        match self.shape.as_deref() {
            None | Some([]) => ShapeMask::filled(self.width, self.height),
            Some(rows) => {
                if self.width == 0 || self.height == 0 {
                    return Err(TrayPlacerError::InvalidShape(format!(
                        "dimensions must be positive, got {}x{}",
                        self.width, self.height
                    )));
                }
                // Rows edited before a width change: pad with occupied cells or truncate.
                let w = self.width as usize;
                let rows: Vec<Vec<bool>> = rows
                    .iter()
                    .map(|row| {
                        let mut row = row.clone();
                        row.resize(w, true);
                        row
                    })
                    .collect();
                let mask = ShapeMask::from_rows(&rows)?;
                if mask.height() == self.height {
                    Ok(mask)
                } else {
                    mask.resize(self.width, self.height)
                }
            }
        }
    }

    /// Key used in reports: the explicit id, or `tray_<index>`.
    pub fn key(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| format!("tray_{}", index))
    }
}

/// Parses `WxH` or `WxH:rows`, rows separated by `/` with `1`/`#` for occupied and
/// `0`/`.` for empty cells, e.g. `3x2:111/100`.
impl FromStr for TraySpec {
    type Err = TrayPlacerError;
    fn from_str(s: &str) -> Result<Self> {
        let invalid = TrayPlacerError::InvalidShape;
        let (dims, rows) = match s.split_once(':') {
            Some((d, r)) => (d, Some(r)),
            None => (s, None),
        };
        let (w, h) = dims
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| invalid(format!("expected WxH, got '{}'", dims)))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| invalid(format!("bad width '{}'", w)))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| invalid(format!("bad height '{}'", h)))?;
        let shape = match rows {
            None => None,
            Some(r) => {
                let parsed = r
                    .split('/')
                    .map(|row| {
                        row.trim()
                            .chars()
                            .map(|c| match c {
                                '1' | '#' => Ok(true),
                                '0' | '.' => Ok(false),
                                other => Err(invalid(format!("bad cell '{}' in '{}'", other, row))),
                            })
                            .collect::<Result<Vec<bool>>>()
                    })
                    .collect::<Result<Vec<_>>>()?;
                Some(parsed)
            }
        };
        let spec = TraySpec {
            id: None,
            width,
            height,
            shape,
        };
        spec.to_mask()?;
        Ok(spec)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacerConfig {
    /// Board width in cells.
    #[serde(default = "default_board_size")]
    pub board_width: u32,
    /// Board height in cells.
    #[serde(default = "default_board_size")]
    pub board_height: u32,
    /// Random origins tried per tray before giving up on it.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Seed for a reproducible session. None draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_selection")]
    pub selection: SelectionMode,
    /// Number of slots filled in `random_draw` mode. Defaults to the number of trays.
    #[serde(default)]
    pub draw_count: Option<usize>,
    #[serde(default)]
    pub trays: Vec<TraySpec>,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            board_width: default_board_size(),
            board_height: default_board_size(),
            max_attempts: default_max_attempts(),
            seed: None,
            selection: default_selection(),
            draw_count: None,
            trays: Vec::new(),
        }
    }
}

impl PlacerConfig {
    /// Validates the configuration.
    ///
    /// Returns an error if:
    /// - the board has a zero dimension
    /// - `max_attempts` or `draw_count` is zero, or there are no trays
    /// - any tray descriptor does not produce a valid mask
    pub fn validate(&self) -> Result<()> {
        if self.board_width == 0 || self.board_height == 0 {
            return Err(TrayPlacerError::InvalidDimensions {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.max_attempts == 0 {
            return Err(TrayPlacerError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        if self.trays.is_empty() {
            return Err(TrayPlacerError::InvalidConfig("no trays configured".into()));
        }
        if self.draw_count == Some(0) {
            return Err(TrayPlacerError::InvalidConfig(
                "draw_count must be at least 1".into(),
            ));
        }
        for (i, t) in self.trays.iter().enumerate() {
            t.to_mask().map_err(|e| match e {
                TrayPlacerError::InvalidShape(msg) => {
                    TrayPlacerError::InvalidShape(format!("{}: {}", t.key(i), msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Number of trays a session will try to place.
    pub fn slot_count(&self) -> usize {
        match self.selection {
            SelectionMode::InOrder => self.trays.len(),
            SelectionMode::RandomDraw => self.draw_count.unwrap_or(self.trays.len()),
        }
    }

    /// Create a fluent builder for `PlacerConfig`.
    pub fn builder() -> PlacerConfigBuilder {
        PlacerConfigBuilder::new()
    }
}

fn default_board_size() -> u32 {
    8
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_selection() -> SelectionMode {
    SelectionMode::InOrder
}

/// Builder for `PlacerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PlacerConfigBuilder {
    cfg: PlacerConfig,
}

impl PlacerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PlacerConfig::default(),
        }
    }
    pub fn with_board(mut self, w: u32, h: u32) -> Self {
        self.cfg.board_width = w;
        self.cfg.board_height = h;
        self
    }
    pub fn max_attempts(mut self, v: u32) -> Self {
        self.cfg.max_attempts = v;
        self
    }
    pub fn seed(mut self, v: Option<u64>) -> Self {
        self.cfg.seed = v;
        self
    }
    pub fn selection(mut self, v: SelectionMode) -> Self {
        self.cfg.selection = v;
        self
    }
    pub fn draw_count(mut self, v: Option<usize>) -> Self {
        self.cfg.draw_count = v;
        self
    }
    pub fn tray(mut self, t: TraySpec) -> Self {
        self.cfg.trays.push(t);
        self
    }
    pub fn trays(mut self, v: Vec<TraySpec>) -> Self {
        self.cfg.trays = v;
        self
    }
    pub fn build(self) -> PlacerConfig {
        self.cfg
    }
}
