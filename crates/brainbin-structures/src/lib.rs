//! The core crate for brainbin. Defines the data structures shared by the conversion pipeline:
//! hemisphere/analysis/statistic identifiers, triangulated surfaces, vertex normals, per-vertex
//! statistic volumes with their NaN-aware ranges, and the static statistic metadata table.
//!
//! ## Core Components
//!
//! - **[`Surface`]** - Vertex positions and triangle faces read from a FreeSurfer surface
//! - **[`VertexNormals`]** - One normal per vertex, produced by [`estimate_vertex_normals`]
//! - **[`StatisticVolumeSet`]** - Volume-major per-vertex samples with [`RangeStatistic`]s
//! - **[`StatisticMetadataTable`]** - Display metadata per [`Statistic`]
//!
//! ```
//! use brainbin_structures::{estimate_vertex_normals, Surface};
//!
//! let surface = Surface::new(
//!     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!     vec![[0, 1, 2]],
//! );
//! let normals = estimate_vertex_normals(&surface).unwrap();
//! assert_eq!(normals.get(0), Some([0.0, 0.0, 1.0]));
//! ```

mod error;
mod identifiers;
mod normals;
mod range_statistic;
mod surface;
pub mod templates;

pub use error::{ConfigurationError, FormatError};
pub use identifiers::{Analysis, Hemisphere, Statistic};
pub use normals::{estimate_vertex_normals, VertexNormals, NORMAL_EPSILON};
pub use range_statistic::{RangeStatistic, StatisticVolumeSet, FSAVERAGE5_N_VERTICES};
pub use surface::Surface;
pub use templates::statistic_metadata::{
    NanHandling, StatisticMetadataEntry, StatisticMetadataTable,
};
