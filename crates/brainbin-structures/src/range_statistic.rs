use crate::FormatError;

/// Vertex count of the fsaverage5 icosahedral mesh that all statistic files are sampled on.
pub const FSAVERAGE5_N_VERTICES: usize = 10242;

/// `(min, max)` over the non-NaN values of a sample subset.
///
/// An empty or all-NaN subset yields `(0.0, 0.0)` rather than NaN or infinities, so the viewer
/// always receives finite color-scale bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeStatistic {
    pub min: f32,
    pub max: f32,
}

impl RangeStatistic {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Computes the range of `values`, skipping NaNs.
    pub fn from_values(values: &[f32]) -> Self {
        values
            .iter()
            .copied()
            .filter(|value| !value.is_nan())
            .fold(None, |acc: Option<(f32, f32)>, value| match acc {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
            .map(|(min, max)| Self { min, max })
            .unwrap_or_default()
    }
}

/// Volume-major per-vertex samples: sample `(volume, vertex)` lives at
/// `volume * n_vertices + vertex`.
///
/// Construction enforces `samples.len() == n_volumes * n_vertices`; the volume count is derived,
/// never padded or truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticVolumeSet {
    samples: Vec<f32>,
    n_vertices: usize,
    n_volumes: usize,
}

impl StatisticVolumeSet {
    /// Wraps `samples`, deriving the volume count from the fixed mesh vertex count.
    ///
    /// # Errors
    /// [`FormatError::SampleCountMismatch`] if the samples do not split into whole volumes, or if
    /// `n_vertices` is zero.
    pub fn new(samples: Vec<f32>, n_vertices: usize) -> Result<Self, FormatError> {
        if n_vertices == 0 || samples.len() % n_vertices != 0 {
            return Err(FormatError::SampleCountMismatch {
                n_samples: samples.len(),
                n_vertices,
            });
        }
        let n_volumes = samples.len() / n_vertices;
        Ok(Self {
            samples,
            n_vertices,
            n_volumes,
        })
    }

    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    pub fn n_volumes(&self) -> usize {
        self.n_volumes
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Sample for `(volume, vertex)`, or `None` when either is out of range.
    #[inline]
    pub fn get(&self, volume: usize, vertex: usize) -> Option<f32> {
        if volume < self.n_volumes && vertex < self.n_vertices {
            Some(self.samples[volume * self.n_vertices + vertex])
        } else {
            None
        }
    }

    /// Contiguous block of one volume.
    #[inline]
    pub fn volume_slice(&self, volume: usize) -> Option<&[f32]> {
        if volume >= self.n_volumes {
            return None;
        }
        let start = volume * self.n_vertices;
        Some(&self.samples[start..start + self.n_vertices])
    }

    pub fn nan_count(&self) -> usize {
        self.samples.iter().filter(|value| value.is_nan()).count()
    }

    pub fn global_range(&self) -> RangeStatistic {
        RangeStatistic::from_values(&self.samples)
    }

    /// Per-volume ranges, in volume order.
    pub fn volume_ranges(&self) -> Vec<RangeStatistic> {
        if self.n_volumes == 0 {
            return Vec::new();
        }
        self.samples
            .chunks_exact(self.n_vertices)
            .map(RangeStatistic::from_values)
            .collect()
    }
}
