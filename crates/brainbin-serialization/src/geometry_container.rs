use brainbin_structures::{FormatError, Surface, VertexNormals};
use byteorder::{ByteOrder, LittleEndian};

use crate::{CONTAINER_VERSION, SUPPORTED_FLAGS_MASK};

//region Geometry Container

/// Decoded or ready-to-encode `BRG1` geometry container.
///
/// # Format
/// All values little-endian.
/// - Header: magic `BRG1` (4 bytes) + version (u32) + flags (u32) + n_vertices (u32) + n_faces (u32)
/// - Vertices: n_vertices x 3 x f32
/// - Normals: n_vertices x 3 x f32
/// - Faces: n_faces x 3 x u32
///
/// # Example
/// ```
/// use brainbin_serialization::GeometryContainer;
///
/// let container = GeometryContainer::default();
/// assert_eq!(container.to_bytes().len(), GeometryContainer::HEADER_BYTE_COUNT);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryContainer {
    pub flags: u32,
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl GeometryContainer {
    pub const MAGIC: &'static [u8; 4] = b"BRG1";

    pub const HEADER_BYTE_COUNT: usize = 20; // magic + 4 u32

    pub const BYTES_PER_VERTEX: usize = 24; // position + normal, 6 f32

    pub const BYTES_PER_FACE: usize = 12; // 3 u32

    /// Pairs a surface with its normals.
    ///
    /// # Errors
    /// [`FormatError::VertexCountMismatch`] if the normals do not cover every vertex.
    pub fn from_surface(surface: &Surface, normals: &VertexNormals) -> Result<Self, FormatError> {
        if surface.n_vertices() != normals.len() {
            return Err(FormatError::VertexCountMismatch {
                vertices: surface.n_vertices(),
                normals: normals.len(),
            });
        }
        Ok(Self {
            flags: 0,
            vertices: surface.vertices.clone(),
            normals: normals.as_slice().to_vec(),
            faces: surface.faces.clone(),
        })
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn number_of_bytes_needed(&self) -> usize {
        Self::HEADER_BYTE_COUNT
            + self.vertices.len() * Self::BYTES_PER_VERTEX
            + self.faces.len() * Self::BYTES_PER_FACE
    }

    /// Builds the complete uncompressed container.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.number_of_bytes_needed()];

        bytes[0..4].copy_from_slice(Self::MAGIC);
        LittleEndian::write_u32(&mut bytes[4..8], CONTAINER_VERSION);
        LittleEndian::write_u32(&mut bytes[8..12], self.flags);
        LittleEndian::write_u32(&mut bytes[12..16], self.vertices.len() as u32);
        LittleEndian::write_u32(&mut bytes[16..20], self.faces.len() as u32);

        let mut offset = Self::HEADER_BYTE_COUNT;
        for xyz in self.vertices.iter().chain(self.normals.iter()) {
            LittleEndian::write_f32_into(xyz, &mut bytes[offset..offset + 12]);
            offset += 12;
        }
        for triangle in &self.faces {
            LittleEndian::write_u32_into(triangle, &mut bytes[offset..offset + 12]);
            offset += 12;
        }

        bytes
    }

    /// Parses an uncompressed `BRG1` buffer.
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
                expected: "BRG1",
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
        let n_faces = LittleEndian::read_u32(&bytes[16..20]) as usize;

        let size_mismatch = |expected: usize| FormatError::SizeMismatch {
            expected,
            actual: bytes.len(),
        };
        let expected_size = n_vertices
            .checked_mul(Self::BYTES_PER_VERTEX)
            .zip(n_faces.checked_mul(Self::BYTES_PER_FACE))
            .and_then(|(v, f)| v.checked_add(f))
            .and_then(|n| n.checked_add(Self::HEADER_BYTE_COUNT))
            .ok_or_else(|| size_mismatch(usize::MAX))?;
        if bytes.len() != expected_size {
            return Err(size_mismatch(expected_size));
        }

        let normals_start = Self::HEADER_BYTE_COUNT + n_vertices * 12;
        let faces_start = normals_start + n_vertices * 12;

        let read_xyz = |chunk: &[u8]| {
            let mut xyz = [0f32; 3];
            LittleEndian::read_f32_into(chunk, &mut xyz);
            xyz
        };
        let vertices = bytes[Self::HEADER_BYTE_COUNT..normals_start]
            .chunks_exact(12)
            .map(read_xyz)
            .collect();
        let normals = bytes[normals_start..faces_start]
            .chunks_exact(12)
            .map(read_xyz)
            .collect();
        let faces = bytes[faces_start..]
            .chunks_exact(12)
            .map(|chunk| {
                let mut triangle = [0u32; 3];
                LittleEndian::read_u32_into(chunk, &mut triangle);
                triangle
            })
            .collect();

        Ok(Self {
            flags,
            vertices,
            normals,
            faces,
        })
    }
}

//endregion

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_container() -> GeometryContainer {
        GeometryContainer {
            flags: 0,
            vertices: vec![[0.0, 0.0, 0.0], [1.0, -2.5, 3.25]],
            normals: vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0]],
            faces: vec![[0, 1, 1]],
        }
    }

    #[test]
    fn test_header_layout() {
        let bytes = sample_container().to_bytes();
        assert_eq!(&bytes[0..4], b"BRG1");
        assert_eq!(LittleEndian::read_u32(&bytes[4..8]), 1);
        assert_eq!(LittleEndian::read_u32(&bytes[8..12]), 0);
        assert_eq!(LittleEndian::read_u32(&bytes[12..16]), 2);
        assert_eq!(LittleEndian::read_u32(&bytes[16..20]), 1);
        assert_eq!(bytes.len(), 20 + 2 * 24 + 12);
        // second vertex y, little-endian
        assert_eq!(LittleEndian::read_f32(&bytes[36..40]), -2.5);
        // z of the first normal, which follows the 24-byte vertex block
        assert_eq!(LittleEndian::read_f32(&bytes[52..56]), 1.0);
    }

    #[test]
    fn test_decode_matches_encode() {
        let container = sample_container();
        let decoded = GeometryContainer::from_bytes(&container.to_bytes()).unwrap();
        assert_eq!(decoded, container);
    }

    #[test]
    fn test_rejects_normal_count_mismatch() {
        let surface = Surface::new(vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        let normals = VertexNormals::from_vec(vec![[0.0; 3]; 2]);
        assert!(matches!(
            GeometryContainer::from_surface(&surface, &normals),
            Err(FormatError::VertexCountMismatch {
                vertices: 3,
                normals: 2
            })
        ));
    }

    #[test]
    fn test_decoder_checks() {
        let good = sample_container().to_bytes();

        let mut bad_magic = good.clone();
        bad_magic[3] = b'2';
        assert!(matches!(
            GeometryContainer::from_bytes(&bad_magic),
            Err(FormatError::InvalidMagic { .. })
        ));

        let mut bad_version = good.clone();
        LittleEndian::write_u32(&mut bad_version[4..8], 2);
        assert!(matches!(
            GeometryContainer::from_bytes(&bad_version),
            Err(FormatError::UnsupportedVersion { expected: 1, found: 2 })
        ));

        let mut known_flag = good.clone();
        LittleEndian::write_u32(&mut known_flag[8..12], 0b100);
        assert_eq!(GeometryContainer::from_bytes(&known_flag).unwrap().flags, 0b100);

        let mut bad_flags = good.clone();
        LittleEndian::write_u32(&mut bad_flags[8..12], 0b1000);
        assert!(matches!(
            GeometryContainer::from_bytes(&bad_flags),
            Err(FormatError::UnsupportedFlags { flags: 0b1000 })
        ));

        assert!(matches!(
            GeometryContainer::from_bytes(&good[..good.len() - 1]),
            Err(FormatError::SizeMismatch { .. })
        ));
        assert!(matches!(
            GeometryContainer::from_bytes(&good[..10]),
            Err(FormatError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_oversized_header_counts_are_rejected() {
        let mut header = vec![0u8; GeometryContainer::HEADER_BYTE_COUNT];
        header[0..4].copy_from_slice(GeometryContainer::MAGIC);
        LittleEndian::write_u32(&mut header[4..8], CONTAINER_VERSION);
        LittleEndian::write_u32(&mut header[12..16], u32::MAX);
        LittleEndian::write_u32(&mut header[16..20], u32::MAX);

        assert!(matches!(
            GeometryContainer::from_bytes(&header),
            Err(FormatError::SizeMismatch { actual: 20, .. })
        ));
    }
}
