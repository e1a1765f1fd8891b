use crate::{Error, Mode};

/// Size of the primary header in bytes. Pixel data begins at
/// `HEADER_SIZE + next`.
pub const HEADER_SIZE: usize = 1024;

/// Primary file header, FEI-variant MRC layout.
///
/// Only the leading fields are interpreted; the remainder of the
/// 1024-byte block (labels, reserved words) is not needed by this
/// consumer and is skipped. All multi-byte fields are little-endian
/// on disk.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Header {
    /// Number of columns (fast axis); image width in samples
    pub nx: i32,
    /// Number of rows (medium axis); image height in samples
    pub ny: i32,
    /// Number of sections (slow axis); tilt images in the series
    pub nz: i32,
    /// Pixel encoding tag (see `Mode`)
    pub mode: i32,
    /// Location of first column in unit cell
    pub nxstart: i32,
    /// Location of first row in unit cell
    pub nystart: i32,
    /// Location of first section in unit cell
    pub nzstart: i32,
    /// Sampling along X axis of unit cell
    pub mx: i32,
    /// Sampling along Y axis of unit cell
    pub my: i32,
    /// Sampling along Z axis of unit cell
    pub mz: i32,
    /// Cell edge length along X, in Angstroms
    pub xlen: f32,
    /// Cell edge length along Y, in Angstroms
    pub ylen: f32,
    /// Cell edge length along Z, in Angstroms
    pub zlen: f32,
    /// Cell angle between Y and Z axes, degrees
    pub alpha: f32,
    /// Cell angle between X and Z axes, degrees
    pub beta: f32,
    /// Cell angle between X and Y axes, degrees
    pub gamma: f32,
    /// 1-based index of column axis
    pub mapc: i32,
    /// 1-based index of row axis
    pub mapr: i32,
    /// 1-based index of section axis
    pub maps: i32,
    /// Minimum density value
    pub amin: f32,
    /// Maximum density value
    pub amax: f32,
    /// Mean density value
    pub amean: f32,
    /// Space group number
    pub ispg: i16,
    /// Number of bytes of symmetry records
    pub nsymbt: i16,
    /// Size of the extended-header block, in bytes. Pixel data starts
    /// at `HEADER_SIZE + next` regardless of how many record bytes
    /// were actually meaningful.
    pub next: i32,
    /// Creator ID
    pub creatid: i16,
    /// Number of 4-byte integers per extended-header record
    pub numintegers: i16,
    /// Number of 4-byte floats per extended-header record
    pub numfloats: i16,
    /// Number of sub-frames per section
    pub sub: i16,
    /// Z-interleave factor
    pub zfac: i16,
}

impl Header {
    /// Decode the primary header from its raw 1024-byte image.
    ///
    /// Field order, width and byte order are fixed here explicitly;
    /// nothing relies on in-memory struct layout.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        let read_i32 = |offset: usize| -> i32 {
            i32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        let read_i16 =
            |offset: usize| -> i16 { i16::from_le_bytes([bytes[offset], bytes[offset + 1]]) };
        let read_f32 = |offset: usize| -> f32 { f32::from_bits(read_i32(offset) as u32) };

        Self {
            nx: read_i32(0),
            ny: read_i32(4),
            nz: read_i32(8),
            mode: read_i32(12),
            nxstart: read_i32(16),
            nystart: read_i32(20),
            nzstart: read_i32(24),
            mx: read_i32(28),
            my: read_i32(32),
            mz: read_i32(36),
            xlen: read_f32(40),
            ylen: read_f32(44),
            zlen: read_f32(48),
            alpha: read_f32(52),
            beta: read_f32(56),
            gamma: read_f32(60),
            mapc: read_i32(64),
            mapr: read_i32(68),
            maps: read_i32(72),
            amin: read_f32(76),
            amax: read_f32(80),
            amean: read_f32(84),
            ispg: read_i16(88),
            nsymbt: read_i16(90),
            next: read_i32(92),
            creatid: read_i16(96),
            numintegers: read_i16(128),
            numfloats: read_i16(130),
            sub: read_i16(132),
            zfac: read_i16(134),
        }
    }

    /// Check the preconditions this consumer requires.
    ///
    /// Dimensions must be positive, the pixel encoding must be mode 1
    /// (16-bit signed) and the declared image origin must be at zero:
    /// there is no registration/offset-correction logic downstream, so
    /// a shifted origin cannot be honoured.
    pub fn validate(&self) -> Result<(), Error> {
        if self.nx <= 0 || self.ny <= 0 || self.nz <= 0 {
            return Err(Error::InvalidDimensions {
                nx: self.nx,
                ny: self.ny,
                nz: self.nz,
            });
        }
        if Mode::from_i32(self.mode) != Some(Mode::Int16) {
            return Err(Error::UnsupportedPixelMode { found: self.mode });
        }
        if self.nxstart != 0 || self.nystart != 0 {
            return Err(Error::NonZeroOrigin {
                nxstart: self.nxstart,
                nystart: self.nystart,
            });
        }
        // Every offset and record size is computed from these; a
        // negative value would sign-extend into a huge unsigned one.
        let sized = [
            ("next", self.next),
            ("numintegers", self.numintegers as i32),
            ("numfloats", self.numfloats as i32),
        ];
        for (field, value) in sized {
            if value < 0 {
                return Err(Error::NegativeHeaderField { field, value });
            }
        }
        Ok(())
    }

    /// Byte size of one extended-header record.
    #[inline]
    pub fn ext_record_size(&self) -> usize {
        4 * self.numintegers as usize + 4 * self.numfloats as usize
    }

    /// Samples in one slice plane.
    #[inline]
    pub fn slice_samples(&self) -> usize {
        self.nx as usize * self.ny as usize
    }

    /// Absolute byte offset of slice `i`'s pixel plane.
    ///
    /// The pixel payload starts at `HEADER_SIZE + next`, independent of
    /// where extended-header reading left off.
    #[inline]
    pub fn slice_offset(&self, i: usize) -> u64 {
        let stride = self.slice_samples() * Mode::Int16.byte_size();
        self.next as u64 + HEADER_SIZE as u64 + (stride as u64) * i as u64
    }
}
