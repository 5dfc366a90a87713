//! Frontend error type

use vgs0_common::PackageError;

#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("display buffer too small ({len} pixels, need {needed})")]
    DisplayTooSmall { len: usize, needed: usize },

    #[error("invalid screen size {width}x{height}")]
    InvalidScreen { width: u32, height: u32 },
}
