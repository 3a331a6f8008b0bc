use brainbin_structures::{FormatError, RangeStatistic, StatisticVolumeSet};
use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::{CONTAINER_VERSION, SUPPORTED_FLAGS_MASK};

/// Decodes a raw `.dat` buffer of little-endian `f32` samples.
///
/// # Errors
/// [`FormatError::TruncatedData`] if the length is not a multiple of 4 bytes.
pub fn samples_from_le_bytes(bytes: &[u8]) -> Result<Vec<f32>, FormatError> {
    if bytes.len() % 4 != 0 {
        return Err(FormatError::TruncatedData { section: "samples" });
    }
    let mut samples = vec![0f32; bytes.len() / 4];
    LittleEndian::read_f32_into(bytes, &mut samples);
    Ok(samples)
}

//region Statistic Container

/// Decoded or ready-to-encode `BRS1` statistics container.
///
/// # Format
/// All values little-endian.
/// - Header: magic `BRS1` + version (u32) + flags (u32) + n_vertices (u32) + n_volumes (u32)
///   + global_min (f32) + global_max (f32) + nan_count (u32)
/// - Volume ranges: n_volumes x (min f32, max f32)
/// - Data: n_volumes x n_vertices x f32, volume-major, copied unmodified
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticContainer {
    pub flags: u32,
    pub n_vertices: usize,
    pub global_range: RangeStatistic,
    pub nan_count: u32,
    pub volume_ranges: Vec<RangeStatistic>,
    pub values: Vec<f32>,
}

/// Non-fatal mismatch between the derived and the expected volume count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeCountWarning {
    pub expected: usize,
    pub derived: usize,
}

impl std::fmt::Display for VolumeCountWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "expected {} volumes, found {}; using the derived count",
            self.expected, self.derived
        )
    }
}

/// Result of [`StatisticContainer::encode_samples`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticEncoding {
    pub container: StatisticContainer,
    pub volume_count_warning: Option<VolumeCountWarning>,
}

impl StatisticContainer {
    pub const MAGIC: &'static [u8; 4] = b"BRS1";

    pub const HEADER_BYTE_COUNT: usize = 32; // magic + 4 u32 + 2 f32 + u32

    pub const BYTES_PER_VOLUME_RANGE: usize = 8;

    pub const BYTES_PER_SAMPLE: usize = 4;

    /// Computes NaN count and ranges for a volume set.
    pub fn from_volume_set(set: &StatisticVolumeSet) -> Self {
        Self {
            flags: 0,
            n_vertices: set.n_vertices(),
            global_range: set.global_range(),
            nan_count: set.nan_count() as u32,
            volume_ranges: set.volume_ranges(),
            values: set.samples().to_vec(),
        }
    }

    /// Splits `samples` into volumes of `n_vertices` and builds the container.
    ///
    /// A derived volume count different from `expected_volumes` is returned in
    /// [`StatisticEncoding::volume_count_warning`], not as an error; the derived count is written.
    ///
    /// # Errors
    /// [`FormatError::SampleCountMismatch`] if the samples do not split into whole volumes.
    pub fn encode_samples(
        samples: Vec<f32>,
        n_vertices: usize,
        expected_volumes: usize,
    ) -> Result<StatisticEncoding, FormatError> {
        let set = StatisticVolumeSet::new(samples, n_vertices)?;
        let volume_count_warning =
            (set.n_volumes() != expected_volumes).then(|| VolumeCountWarning {
                expected: expected_volumes,
                derived: set.n_volumes(),
            });

        let container = Self::from_volume_set(&set);
        debug!(
            "Encoded {} volumes x {} vertices, {} NaN, range [{}, {}]",
            container.n_volumes(),
            container.n_vertices,
            container.nan_count,
            container.global_range.min,
            container.global_range.max
        );
        Ok(StatisticEncoding {
            container,
            volume_count_warning,
        })
    }

    pub fn n_volumes(&self) -> usize {
        self.volume_ranges.len()
    }

    /// Sample for `(volume, vertex)`, or `None` when either is out of range.
    #[inline]
    pub fn get(&self, volume: usize, vertex: usize) -> Option<f32> {
        if volume < self.n_volumes() && vertex < self.n_vertices {
            self.values.get(volume * self.n_vertices + vertex).copied()
        } else {
            None
        }
    }

    #[inline]
    pub fn volume_slice(&self, volume: usize) -> Option<&[f32]> {
        if volume >= self.n_volumes() {
            return None;
        }
        let start = volume * self.n_vertices;
        self.values.get(start..start + self.n_vertices)
    }

    pub fn number_of_bytes_needed(&self) -> usize {
        Self::HEADER_BYTE_COUNT
            + self.volume_ranges.len() * Self::BYTES_PER_VOLUME_RANGE
            + self.values.len() * Self::BYTES_PER_SAMPLE
    }

    /// Builds the complete uncompressed container.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.number_of_bytes_needed()];

        bytes[0..4].copy_from_slice(Self::MAGIC);
        LittleEndian::write_u32(&mut bytes[4..8], CONTAINER_VERSION);
        LittleEndian::write_u32(&mut bytes[8..12], self.flags);
        LittleEndian::write_u32(&mut bytes[12..16], self.n_vertices as u32);
        LittleEndian::write_u32(&mut bytes[16..20], self.volume_ranges.len() as u32);
        LittleEndian::write_f32(&mut bytes[20..24], self.global_range.min);
        LittleEndian::write_f32(&mut bytes[24..28], self.global_range.max);
        LittleEndian::write_u32(&mut bytes[28..32], self.nan_count);

        let mut offset = Self::HEADER_BYTE_COUNT;
        for range in &self.volume_ranges {
            LittleEndian::write_f32(&mut bytes[offset..offset + 4], range.min);
            LittleEndian::write_f32(&mut bytes[offset + 4..offset + 8], range.max);
            offset += Self::BYTES_PER_VOLUME_RANGE;
        }
        LittleEndian::write_f32_into(&self.values, &mut bytes[offset..]);

        bytes
    }

    /// Parses an uncompressed `BRS1` buffer. Header statistics are taken as stored, not
    /// recomputed.
    ///
    /// # Errors
    /// `InvalidMagic`, `UnsupportedVersion`, `UnsupportedFlags` or `SizeMismatch`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < Self::HEADER_BYTE_COUNT {
            return Err(FormatError::SizeMismatch {
                expected: Self::HEADER_BYTE_COUNT,
                actual: bytes.len(),
            });
        }
        if &bytes[0..4] != Self::MAGIC {
            return Err(FormatError::InvalidMagic {
                expected: "BRS1",
                found: String::from_utf8_lossy(&bytes[0..4]).into(),
            });
        }

        let version = LittleEndian::read_u32(&bytes[4..8]);
        if version != CONTAINER_VERSION {
            return Err(FormatError::UnsupportedVersion {
                expected: CONTAINER_VERSION,
                found: version,
            });
        }

        let flags = LittleEndian::read_u32(&bytes[8..12]);
        if (flags & !SUPPORTED_FLAGS_MASK) != 0 {
            return Err(FormatError::UnsupportedFlags { flags });
        }

        let n_vertices = LittleEndian::read_u32(&bytes[12..16]) as usize;
        let n_volumes = LittleEndian::read_u32(&bytes[16..20]) as usize;
        let global_range = RangeStatistic::new(
            LittleEndian::read_f32(&bytes[20..24]),
            LittleEndian::read_f32(&bytes[24..28]),
        );
        let nan_count = LittleEndian::read_u32(&bytes[28..32]);

        // header counts are untrusted; an overflowing size can never match
        let size_mismatch = |expected: usize| FormatError::SizeMismatch {
            expected,
            actual: bytes.len(),
        };
        let data_start = n_volumes
            .checked_mul(Self::BYTES_PER_VOLUME_RANGE)
            .and_then(|n| n.checked_add(Self::HEADER_BYTE_COUNT))
            .ok_or_else(|| size_mismatch(usize::MAX))?;
        let expected_size = n_vertices
            .checked_mul(n_volumes)
            .and_then(|n| n.checked_mul(Self::BYTES_PER_SAMPLE))
            .and_then(|n| n.checked_add(data_start))
            .ok_or_else(|| size_mismatch(usize::MAX))?;
        if bytes.len() != expected_size {
            return Err(size_mismatch(expected_size));
        }

        let volume_ranges = bytes[Self::HEADER_BYTE_COUNT..data_start]
            .chunks_exact(Self::BYTES_PER_VOLUME_RANGE)
            .map(|chunk| {
                RangeStatistic::new(
                    LittleEndian::read_f32(&chunk[0..4]),
                    LittleEndian::read_f32(&chunk[4..8]),
                )
            })
            .collect();
        let mut values = vec![0f32; n_vertices * n_volumes];
        LittleEndian::read_f32_into(&bytes[data_start..], &mut values);

        Ok(Self {
            flags,
            n_vertices,
            global_range,
            nan_count,
            volume_ranges,
            values,
        })
    }
}

//endregion
