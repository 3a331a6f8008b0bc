//! # brainbin Serialization
//!
//! Byte-level formats of the conversion pipeline:
//!
//! - **[`read_surface`]** - FreeSurfer triangular surface reader (big-endian, external format)
//! - **[`GeometryContainer`]** - `BRG1` geometry container (little-endian)
//! - **[`StatisticContainer`]** - `BRS1` statistics container (little-endian)
//! - **[`StatisticSidecar`]** - JSON description written next to each statistics container
//! - **[`compress_gzip`] / [`decompress_gzip`]** - gzip framing applied to both containers
//!
//! ## Basic Usage
//!
//! ```rust
//! use brainbin_serialization::{compress_gzip, decompress_gzip, GeometryContainer};
//! use brainbin_structures::{estimate_vertex_normals, Surface};
//!
//! let surface = Surface::new(
//!     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!     vec![[0, 1, 2]],
//! );
//! let normals = estimate_vertex_normals(&surface).unwrap();
//! let container = GeometryContainer::from_surface(&surface, &normals).unwrap();
//!
//! let gz = compress_gzip(&container.to_bytes()).unwrap();
//! let decoded = GeometryContainer::from_bytes(&decompress_gzip(&gz).unwrap()).unwrap();
//! assert_eq!(decoded, container);
//! ```

mod compression;
mod freesurfer_surface;
mod geometry_container;
mod metadata_sidecar;
mod statistic_container;

pub use compression::{compress_gzip, decompress_gzip};
pub use freesurfer_surface::{
    read_surface, read_surface_bytes, read_surface_file, FREESURFER_TRIANGLE_MAGIC,
};
pub use geometry_container::GeometryContainer;
pub use metadata_sidecar::{StatisticSidecar, VolumeLabel};
pub use statistic_container::{
    samples_from_le_bytes, StatisticContainer, StatisticEncoding, VolumeCountWarning,
};

/// Flag bits a reader accepts in either container; bits 3-31 must be zero.
pub const SUPPORTED_FLAGS_MASK: u32 = 0b0000_0111;

/// Version written to and required from both containers.
pub const CONTAINER_VERSION: u32 = 1;
