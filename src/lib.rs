mod ext;
mod header;
mod mode;
mod physics;
mod stack;

#[cfg(test)]
#[path = "../test/tests.rs"]
mod tests;

#[cfg(test)]
#[path = "../test/stack_test.rs"]
mod stack_test;

pub use ext::{EXT_RECORD_CAPACITY, ExtHeader};
pub use header::{HEADER_SIZE, Header};
pub use mode::Mode;
pub use physics::electron_wavelength;
pub use stack::{Formulation, ImageStore, MrcStack, SliceGeometry, TiltImage, is_mrc_file};

// Error type

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// nx, ny or nz in the primary header is zero or negative.
    #[error("invalid dimensions: nx={nx}, ny={ny}, nz={nz}")]
    InvalidDimensions { nx: i32, ny: i32, nz: i32 },

    /// Only mode 1 (16-bit signed integers) is handled.
    #[error("unsupported pixel mode {found} (only mode 1, 16-bit signed, is handled)")]
    UnsupportedPixelMode { found: i32 },

    /// The image origin must be at zero; this reader has no
    /// offset-correction logic and must not silently proceed.
    #[error("image origin must be at zero: found at {nxstart},{nystart}")]
    NonZeroOrigin { nxstart: i32, nystart: i32 },

    /// A size or count field in the primary header is negative, so no
    /// offset computed from it can be trusted.
    #[error("negative {field} in header: {value}")]
    NegativeHeaderField { field: &'static str, value: i32 },

    /// Per-slice extended-header record would overrun its capacity.
    #[error("extended header record too large: {size} bytes, capacity is {capacity}")]
    ExtendedHeaderTooLarge { size: usize, capacity: usize },

    /// The file ended before the primary header or all extended-header
    /// records were read.
    #[error("truncated file: ends before the headers are complete")]
    TruncatedFile,

    /// The file ended inside a slice's pixel plane.
    #[error("truncated pixel data for slice {slice}")]
    TruncatedSliceData { slice: usize },
}
