/// Capacity of one per-slice extended-header record, in bytes.
///
/// FEI writes at most 32 four-byte values per section. A file whose
/// declared record size exceeds this is rejected before any record is
/// read.
pub const EXT_RECORD_CAPACITY: usize = 128;

/// Per-slice acquisition metadata from the FEI extended header.
///
/// One record per tilt image, stored back-to-back immediately after the
/// primary header. Only the fields this consumer derives geometry from
/// are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExtHeader {
    /// Alpha stage tilt, degrees
    pub a_tilt: f32,
    /// Rotation (omega) angle of the tilt axis, degrees
    pub tilt_axis: f32,
    /// Physical pixel size, reciprocal-space units
    pub pixel_size: f32,
    /// Magnification; used directly as the effective camera length
    pub magnification: f32,
    /// Accelerating voltage, kV. Zero means unspecified; 200 kV is
    /// assumed downstream.
    pub voltage: f32,
}

impl ExtHeader {
    /// Decode one record from its on-disk image.
    ///
    /// `bytes` holds exactly the record's declared size, which may be
    /// shorter than the full FEI layout; a field whose offset lies past
    /// the end decodes as 0.0.
    pub fn decode(bytes: &[u8]) -> Self {
        let read_f32 = |offset: usize| -> f32 {
            match bytes.get(offset..offset + 4) {
                Some(b) => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
                None => 0.0,
            }
        };

        Self {
            a_tilt: read_f32(0),
            tilt_axis: read_f32(40),
            pixel_size: read_f32(44),
            magnification: read_f32(48),
            voltage: read_f32(52),
        }
    }
}
