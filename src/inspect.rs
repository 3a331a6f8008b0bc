//! Header summaries of written containers, for the `inspect` command.

use std::fmt::{Display, Formatter};

use brainbin_serialization::{decompress_gzip, GeometryContainer, StatisticContainer};
use brainbin_structures::{FormatError, RangeStatistic};

use crate::pipeline::ConversionError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, PartialEq)]
pub enum ContainerSummary {
    Geometry {
        flags: u32,
        n_vertices: usize,
        n_faces: usize,
    },
    Statistic {
        flags: u32,
        n_vertices: usize,
        global_range: RangeStatistic,
        nan_count: u32,
        volume_ranges: Vec<RangeStatistic>,
    },
}

/// Decodes a `BRG1` or `BRS1` container, gzip-compressed or not, and summarizes its header.
pub fn inspect_container(bytes: &[u8]) -> Result<ContainerSummary, ConversionError> {
    let raw = if bytes.starts_with(&GZIP_MAGIC) {
        decompress_gzip(bytes).map_err(FormatError::Io)?
    } else {
        bytes.to_vec()
    };

    if raw.starts_with(GeometryContainer::MAGIC) {
        let container = GeometryContainer::from_bytes(&raw)?;
        return Ok(ContainerSummary::Geometry {
            flags: container.flags,
            n_vertices: container.n_vertices(),
            n_faces: container.n_faces(),
        });
    }

    // anything else is reported against the statistics magic
    let container = StatisticContainer::from_bytes(&raw)?;
    Ok(ContainerSummary::Statistic {
        flags: container.flags,
        n_vertices: container.n_vertices,
        global_range: container.global_range,
        nan_count: container.nan_count,
        volume_ranges: container.volume_ranges,
    })
}

impl Display for ContainerSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerSummary::Geometry {
                flags,
                n_vertices,
                n_faces,
            } => {
                writeln!(f, "BRG1 geometry container")?;
                writeln!(f, "  flags:      {:#x}", flags)?;
                writeln!(f, "  vertices:   {}", n_vertices)?;
                write!(f, "  faces:      {}", n_faces)
            }
            ContainerSummary::Statistic {
                flags,
                n_vertices,
                global_range,
                nan_count,
                volume_ranges,
            } => {
                writeln!(f, "BRS1 statistics container")?;
                writeln!(f, "  flags:      {:#x}", flags)?;
                writeln!(f, "  vertices:   {}", n_vertices)?;
                writeln!(f, "  volumes:    {}", volume_ranges.len())?;
                writeln!(f, "  range:      [{}, {}]", global_range.min, global_range.max)?;
                write!(f, "  NaN count:  {}", nan_count)?;
                for (index, range) in volume_ranges.iter().enumerate() {
                    write!(f, "\n  volume {:>3}: [{}, {}]", index, range.min, range.max)?;
                }
                Ok(())
            }
        }
    }
}
