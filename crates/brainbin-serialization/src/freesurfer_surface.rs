//! FreeSurfer triangular surface reader (`lh.pial`, `rh.white`, ...).
//!
//! Layout, all big-endian:
//! ```text
//! magic        3 bytes   FF FF FE
//! comment      ASCII, terminated by "\n\n"
//! n_vertices   u32
//! n_faces      u32
//! vertices     n_vertices x 3 x f32
//! faces        n_faces x 3 x u32
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use brainbin_structures::{FormatError, Surface};
use byteorder::{BigEndian, ReadBytesExt};
use tracing::debug;

/// Magic bytes for the FreeSurfer triangular surface format.
pub const FREESURFER_TRIANGLE_MAGIC: [u8; 3] = [0xFF, 0xFF, 0xFE];

// Header counts are untrusted, so preallocation is capped.
const MAX_PREALLOCATED_ELEMENTS: usize = 1 << 20;

/// Reads a FreeSurfer triangular surface from any byte stream.
///
/// Face indices are not range-checked here; see [`Surface::validate_indices`].
///
/// # Errors
/// - [`FormatError::InvalidMagic`] if the stream does not start with `FF FF FE`
/// - [`FormatError::TruncatedComment`] if the comment is never terminated
/// - [`FormatError::TruncatedData`] if the stream is shorter than the header declares
pub fn read_surface<R: Read>(mut reader: R) -> Result<Surface, FormatError> {
    let mut magic = Vec::with_capacity(FREESURFER_TRIANGLE_MAGIC.len());
    (&mut reader)
        .take(FREESURFER_TRIANGLE_MAGIC.len() as u64)
        .read_to_end(&mut magic)?;
    if magic != FREESURFER_TRIANGLE_MAGIC {
        return Err(FormatError::InvalidMagic {
            expected: "ff ff fe",
            found: hex_string(&magic),
        });
    }

    let comment = read_comment(&mut reader)?;

    let n_vertices = reader
        .read_u32::<BigEndian>()
        .map_err(|e| FormatError::from_io_in_section(e, "vertex count"))? as usize;
    let n_faces = reader
        .read_u32::<BigEndian>()
        .map_err(|e| FormatError::from_io_in_section(e, "face count"))? as usize;

    let mut vertices = Vec::with_capacity(n_vertices.min(MAX_PREALLOCATED_ELEMENTS));
    for _ in 0..n_vertices {
        let mut xyz = [0f32; 3];
        reader
            .read_f32_into::<BigEndian>(&mut xyz)
            .map_err(|e| FormatError::from_io_in_section(e, "vertices"))?;
        vertices.push(xyz);
    }

    let mut faces = Vec::with_capacity(n_faces.min(MAX_PREALLOCATED_ELEMENTS));
    for _ in 0..n_faces {
        let mut triangle = [0u32; 3];
        reader
            .read_u32_into::<BigEndian>(&mut triangle)
            .map_err(|e| FormatError::from_io_in_section(e, "faces"))?;
        faces.push(triangle);
    }

    debug!(
        "Read FreeSurfer surface: {} vertices, {} faces ({:?})",
        n_vertices, n_faces, comment
    );
    Ok(Surface::new(vertices, faces).with_comment(comment))
}

pub fn read_surface_bytes(bytes: &[u8]) -> Result<Surface, FormatError> {
    read_surface(bytes)
}

pub fn read_surface_file<P: AsRef<Path>>(path: P) -> Result<Surface, FormatError> {
    let file = File::open(path.as_ref())?;
    read_surface(BufReader::new(file))
}

/// Consumes the comment up to and including the `\n\n` terminator, returning it without the
/// terminator.
fn read_comment<R: Read>(reader: &mut R) -> Result<String, FormatError> {
    let mut comment = Vec::new();
    loop {
        let byte = match reader.read_u8() {
            Ok(byte) => byte,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(FormatError::TruncatedComment)
            }
            Err(e) => return Err(FormatError::Io(e)),
        };
        comment.push(byte);
        if comment.ends_with(b"\n\n") {
            comment.truncate(comment.len() - 2);
            return Ok(String::from_utf8_lossy(&comment).into_owned());
        }
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
