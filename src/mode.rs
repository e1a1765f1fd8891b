/// MRC pixel encoding tags.
///
/// The decoder only accepts `Int16`; the other tags exist so an
/// unsupported file can be named precisely in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Mode {
    Int8 = 0,
    Int16 = 1,
    Float32 = 2,
    Int16Complex = 3,
    Float32Complex = 4,
    Uint16 = 6,
    Float16 = 12,
}

impl Mode {
    #[inline]
    pub fn from_i32(mode: i32) -> Option<Self> {
        match mode {
            0 => Some(Self::Int8),
            1 => Some(Self::Int16),
            2 => Some(Self::Float32),
            3 => Some(Self::Int16Complex),
            4 => Some(Self::Float32Complex),
            6 => Some(Self::Uint16),
            12 => Some(Self::Float16),
            _ => None,
        }
    }

    #[inline]
    pub fn byte_size(&self) -> usize {
        match self {
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Float32 => 4,
            Self::Int16Complex => 4,
            Self::Float32Complex => 8,
            Self::Uint16 => 2,
            Self::Float16 => 2,
        }
    }
}
