use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, info};

use crate::{EXT_RECORD_CAPACITY, Error, ExtHeader, HEADER_SIZE, Header, physics};

/// How downstream geometry is parameterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formulation {
    /// Geometry is expressed via the per-slice pixel size.
    PixelSize,
    /// Geometry is expressed via camera length alone.
    CameraLength,
}

/// Imaging geometry under which one slice was acquired.
///
/// Derived from that slice's extended-header record and passed by value
/// with the image, so slices can be processed independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceGeometry {
    /// Rotation (omega) angle of the tilt axis, radians
    pub rotation: f64,
    /// Effective camera length, metres
    pub camera_length: f64,
    /// Electron wavelength, metres
    pub wavelength: f64,
    /// Physical pixel size, reciprocal-space units
    pub pixel_size: f64,
    /// Always `PixelSize` for images decoded from this format
    pub formulation: Formulation,
}

/// One decoded tilt image: an unsigned intensity grid plus the geometry
/// it was acquired under.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltImage {
    /// Width in samples
    pub width: usize,
    /// Height in samples
    pub height: usize,
    /// Row-major samples, addressed as `x + width * y`
    pub data: Vec<u16>,
    /// Stage tilt angle, radians
    pub tilt: f64,
    pub geometry: SliceGeometry,
}

/// Receiver for decoded tilt images, delivered in ascending slice order.
pub trait ImageStore {
    fn add_image(&mut self, image: TiltImage);
}

impl ImageStore for Vec<TiltImage> {
    fn add_image(&mut self, image: TiltImage) {
        self.push(image);
    }
}

/// An opened tilt-series stack: validated primary header plus all
/// per-slice extended-header records, with the source positioned for
/// pixel extraction.
///
/// Construction reads and validates everything up to the pixel payload;
/// [`MrcStack::decode_into`] then extracts the slices. Any failure along
/// the way aborts the whole decode, and the underlying handle is closed
/// on every path when the value is dropped.
pub struct MrcStack<R> {
    src: R,
    header: Header,
    ext: Vec<ExtHeader>,
}

impl MrcStack<BufReader<File>> {
    /// Open a stack file and read its headers.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

#[cfg(feature = "mmap")]
impl MrcStack<std::io::Cursor<memmap2::Mmap>> {
    /// Open a stack through a memory mapping of the file.
    ///
    /// Decoding semantics are identical to [`MrcStack::open`]; the map
    /// only replaces buffered reads with page-cache access.
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path)?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Self::from_reader(std::io::Cursor::new(mmap))
    }
}

impl<R: Read + Seek> MrcStack<R> {
    /// Read and validate the primary header, then all `nz`
    /// extended-header records, from a source positioned at offset 0.
    pub fn from_reader(mut src: R) -> Result<Self, Error> {
        let header = read_header(&mut src)?;
        info!(images = header.nz, "tilt images in series");

        let ext = read_ext_headers(&mut src, &header)?;
        // Representative value for the series; per-slice geometry still
        // carries each record's own pixel size.
        if let Some(first) = ext.first() {
            debug!(pixel_size = first.pixel_size, "pixel size from first record");
        }

        Ok(Self { src, header, ext })
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub fn ext_headers(&self) -> &[ExtHeader] {
        &self.ext
    }

    /// Extract every slice in ascending index order, handing each
    /// decoded image to `store`. Returns the number of slices delivered.
    ///
    /// A short read inside any pixel plane fails the whole decode; no
    /// image is delivered for a truncated slice.
    pub fn decode_into(mut self, store: &mut impl ImageStore) -> Result<usize, Error> {
        let nz = self.header.nz as usize;
        let samples = self.header.slice_samples();

        let mut raw = vec![0u8; samples * 2];
        for i in 0..nz {
            self.src.seek(SeekFrom::Start(self.header.slice_offset(i)))?;
            self.src.read_exact(&mut raw).map_err(|e| {
                if e.kind() == std::io::ErrorKind::UnexpectedEof {
                    Error::TruncatedSliceData { slice: i }
                } else {
                    Error::Io(e)
                }
            })?;

            let signed: Vec<i16> = raw
                .chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]]))
                .collect();
            // Negative readings are below-floor intensity: clamp to
            // zero, never reinterpret through two's complement.
            let pixels: Vec<u16> = signed.iter().map(|&s| s.max(0) as u16).collect();
            drop(signed);

            let ext = self.ext[i];
            let image = TiltImage {
                width: self.header.nx as usize,
                height: self.header.ny as usize,
                data: pixels,
                tilt: (ext.a_tilt as f64).to_radians(),
                geometry: slice_geometry(&ext),
            };

            info!(
                slice = i,
                tilt_deg = ext.a_tilt,
                omega_deg = ext.tilt_axis,
                camera_length = ext.magnification,
                "decoded tilt image"
            );
            store.add_image(image);
        }

        Ok(nz)
    }
}

fn read_header<R: Read>(src: &mut R) -> Result<Header, Error> {
    let mut bytes = [0u8; HEADER_SIZE];
    src.read_exact(&mut bytes).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::TruncatedFile
        } else {
            Error::Io(e)
        }
    })?;
    let header = Header::decode(&bytes);
    header.validate()?;
    Ok(header)
}

/// Read all `nz` records back-to-back; they directly follow the primary
/// header, so no seeking happens here.
fn read_ext_headers<R: Read>(src: &mut R, header: &Header) -> Result<Vec<ExtHeader>, Error> {
    let extsize = header.ext_record_size();
    if extsize > EXT_RECORD_CAPACITY {
        return Err(Error::ExtendedHeaderTooLarge {
            size: extsize,
            capacity: EXT_RECORD_CAPACITY,
        });
    }

    let mut buf = [0u8; EXT_RECORD_CAPACITY];
    let mut records = Vec::with_capacity(header.nz as usize);
    for _ in 0..header.nz {
        src.read_exact(&mut buf[..extsize]).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::TruncatedFile
            } else {
                Error::Io(e)
            }
        })?;
        records.push(ExtHeader::decode(&buf[..extsize]));
    }
    Ok(records)
}

fn slice_geometry(ext: &ExtHeader) -> SliceGeometry {
    // Voltage 0 means the microscope did not record it; 200 kV is the
    // conventional assumption for this instrument class.
    let wavelength = if ext.voltage == 0.0 {
        physics::electron_wavelength(200_000.0)
    } else {
        physics::electron_wavelength(1000.0 * ext.voltage as f64)
    };

    SliceGeometry {
        rotation: (ext.tilt_axis as f64).to_radians(),
        camera_length: ext.magnification as f64,
        wavelength,
        pixel_size: ext.pixel_size as f64,
        formulation: Formulation::PixelSize,
    }
}

/// Report whether `path` plausibly names an MRC file: true iff its final
/// four characters are exactly `.mrc`. A naming heuristic for
/// pre-filtering candidates, not a format guarantee.
pub fn is_mrc_file(path: &str) -> bool {
    path.ends_with(".mrc")
}
