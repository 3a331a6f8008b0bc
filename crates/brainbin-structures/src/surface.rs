use crate::FormatError;

/// Triangulated cortical surface: vertex positions and triangle vertex-index triples.
///
/// Built once by the FreeSurfer reader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Surface {
    /// Vertex positions, in file order.
    pub vertices: Vec<[f32; 3]>,
    /// Triangles as indices into `vertices`, in file order.
    pub faces: Vec<[u32; 3]>,
    /// Free-form comment from the source file header. Informational only.
    pub comment: String,
}

impl Surface {
    pub fn new(vertices: Vec<[f32; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Checks that every face index points at an existing vertex.
    pub fn validate_indices(&self) -> Result<(), FormatError> {
        let n_vertices = self.vertices.len();
        for (face_index, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&index| index as usize >= n_vertices) {
                return Err(FormatError::FaceIndexOutOfRange {
                    face: face_index,
                    index: bad,
                    n_vertices,
                });
            }
        }
        Ok(())
    }
}
