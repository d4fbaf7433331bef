use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrayPlacerError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
    #[error("Invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Cell ({x}, {y}) is outside the {width}x{height} extent")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },
    #[error("Footprint does not fit at origin ({x}, {y})")]
    DoesNotFit { x: u32, y: u32 },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TrayPlacerError>;
