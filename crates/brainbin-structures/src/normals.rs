//! Per-vertex normal estimation.
//!
//! Each face contributes its unit normal (or the zero vector when degenerate) to its three
//! vertices with equal weight; the sums are then normalized. Face area plays no part, so the
//! output stays bit-compatible with containers the viewer already consumes.

use crate::{FormatError, Surface};

/// Magnitudes at or below this value are treated as zero.
pub const NORMAL_EPSILON: f32 = 1e-10;

/// One normal per surface vertex, same order as [`Surface::vertices`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexNormals {
    normals: Vec<[f32; 3]>,
}

impl VertexNormals {
    pub fn from_vec(normals: Vec<[f32; 3]>) -> Self {
        Self { normals }
    }

    pub fn as_slice(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn into_vec(self) -> Vec<[f32; 3]> {
        self.normals
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    pub fn get(&self, vertex: usize) -> Option<[f32; 3]> {
        self.normals.get(vertex).copied()
    }
}

/// Estimates vertex normals by averaging unit face normals.
///
/// Vertices that no face touches, or whose contributions cancel out, get the zero vector.
///
/// # Errors
/// [`FormatError::FaceIndexOutOfRange`] if a face points past the vertex array.
pub fn estimate_vertex_normals(surface: &Surface) -> Result<VertexNormals, FormatError> {
    surface.validate_indices()?;

    let mut accumulated = vec![[0.0f32; 3]; surface.n_vertices()];
    for face in &surface.faces {
        let v0 = surface.vertices[face[0] as usize];
        let v1 = surface.vertices[face[1] as usize];
        let v2 = surface.vertices[face[2] as usize];

        let mut face_normal = cross(sub(v1, v0), sub(v2, v0));
        let norm = length(face_normal);
        if norm > NORMAL_EPSILON {
            face_normal = scale(face_normal, norm);
        }

        for &index in face {
            let slot = &mut accumulated[index as usize];
            slot[0] += face_normal[0];
            slot[1] += face_normal[1];
            slot[2] += face_normal[2];
        }
    }

    let normals = accumulated
        .into_iter()
        .map(|sum| {
            let mut norm = length(sum);
            if norm < NORMAL_EPSILON {
                norm = 1.0;
            }
            scale(sum, norm)
        })
        .collect();

    Ok(VertexNormals { normals })
}

#[inline]
fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[inline]
fn scale(v: [f32; 3], divisor: f32) -> [f32; 3] {
    [v[0] / divisor, v[1] / divisor, v[2] / divisor]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetra_corner_surface() -> Surface {
        Surface::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            vec![[0, 1, 2], [0, 1, 3]],
        )
    }

    #[test]
    fn test_shared_edge_vertices_average_both_faces() {
        let normals = estimate_vertex_normals(&tetra_corner_surface()).unwrap();
        assert_eq!(normals.len(), 4);

        // Face (0,1,2) points +z, face (0,1,3) points -y.
        let inv_sqrt2 = 1.0 / 2.0f32.sqrt();
        for vertex in [0, 1] {
            let n = normals.get(vertex).unwrap();
            assert!((n[0]).abs() < 1e-6);
            assert!((n[1] + inv_sqrt2).abs() < 1e-6);
            assert!((n[2] - inv_sqrt2).abs() < 1e-6);
        }
        assert_eq!(normals.get(2), Some([0.0, 0.0, 1.0]));
        assert_eq!(normals.get(3), Some([0.0, -1.0, 0.0]));
    }

    #[test]
    fn test_referenced_vertices_are_unit_length() {
        let normals = estimate_vertex_normals(&tetra_corner_surface()).unwrap();
        for n in normals.as_slice() {
            assert!((length(*n) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_unreferenced_vertex_gets_zero_vector() {
        let mut surface = tetra_corner_surface();
        surface.vertices.push([5.0, 5.0, 5.0]);
        let normals = estimate_vertex_normals(&surface).unwrap();
        assert_eq!(normals.get(4), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_degenerate_face_contributes_nothing() {
        let surface = Surface::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
            vec![[0, 1, 2]],
        );
        let normals = estimate_vertex_normals(&surface).unwrap();
        for n in normals.as_slice() {
            assert_eq!(*n, [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_out_of_range_face_is_rejected() {
        let surface = Surface::new(vec![[0.0; 3]; 2], vec![[0, 1, 2]]);
        assert!(matches!(
            estimate_vertex_normals(&surface),
            Err(FormatError::FaceIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_is_area_independent() {
        // Scaling one face up must not change its pull on the shared vertices.
        let mut surface = tetra_corner_surface();
        surface.vertices[3] = [0.0, 0.0, 100.0];
        let normals = estimate_vertex_normals(&surface).unwrap();
        let n = normals.get(0).unwrap();
        assert!((n[1] + n[2]).abs() < 1e-6);
    }
}
