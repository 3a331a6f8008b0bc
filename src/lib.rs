//! # brainbin
//!
//! Converts FreeSurfer cortical surfaces and per-vertex statistic volumes into the compact,
//! versioned, gzip-compressed containers a 3D brain viewer loads:
//!
//! - `BRG1` geometry: vertices, estimated vertex normals and triangle faces
//! - `BRS1` statistics: volume-major samples with NaN count and per-volume ranges
//! - a JSON sidecar per statistic describing labels, colormap and threshold
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brainbin::config::{load_config_or_default, validate_config};
//! use brainbin::pipeline::run_batch;
//!
//! let config = load_config_or_default(None)?;
//! validate_config(&config)?;
//!
//! let report = run_batch(&config)?;
//! println!("{} converted, {} failed", report.converted_count(), report.failed_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: brainbin-structures                        │
//! │  (Surface, normals, volume sets, metadata table)        │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Formats: brainbin-serialization                        │
//! │  (FreeSurfer reader, BRG1/BRS1 codecs, JSON sidecar)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Driver: brainbin::pipeline                             │
//! │  (naming conventions, skip/fail reporting, file output) │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration (`brainbin-config`) and logging (`brainbin-observability`) sit beside the
//! driver.
//!
//! ## License
//!
//! Apache-2.0

pub use brainbin_config as config;
pub use brainbin_observability as observability;
pub use brainbin_serialization as serialization;
pub use brainbin_structures as structures;

pub mod inspect;
pub mod pipeline;

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::inspect::{inspect_container, ContainerSummary};
    pub use crate::pipeline::{
        run_batch, BatchConverter, BatchReport, ConversionError, ConversionOutcome,
        ConversionReport, ConversionTarget,
    };
    pub use crate::serialization::{GeometryContainer, StatisticContainer, StatisticSidecar};
    pub use crate::structures::{
        Analysis, ConfigurationError, FormatError, Hemisphere, Statistic, StatisticMetadataTable,
    };
}
