use thiserror::Error;

/// Errors raised when a byte stream does not follow the layout it claims to have.
///
/// Covers both the external FreeSurfer surface format and brainbin's own `BRG1`/`BRS1`
/// containers. A `FormatError` aborts the conversion of a single file only.
///
/// # Examples
/// ```
/// use brainbin_structures::FormatError;
///
/// let err = FormatError::TruncatedComment;
/// assert_eq!(err.to_string(), "truncated comment: stream ended before the \\n\\n terminator");
/// ```
#[derive(Debug, Error)]
pub enum FormatError {
    /// The leading magic bytes did not match the expected value.
    #[error("invalid magic, expected {expected}, found {found}")]
    InvalidMagic { expected: &'static str, found: String },

    /// The FreeSurfer comment region was never terminated.
    #[error("truncated comment: stream ended before the \\n\\n terminator")]
    TruncatedComment,

    /// The stream ended before all header-declared data could be read.
    #[error("truncated data while reading {section}")]
    TruncatedData { section: &'static str },

    /// The sample count is not a whole number of volumes.
    #[error("size mismatch: {n_samples} samples do not divide into volumes of {n_vertices} vertices")]
    SampleCountMismatch { n_samples: usize, n_vertices: usize },

    /// A container's byte length disagrees with its header.
    #[error("size mismatch, expected {expected} bytes, actual {actual} bytes")]
    SizeMismatch { expected: usize, actual: usize },

    /// The container version is not supported.
    #[error("unsupported version, expected {expected}, found {found}")]
    UnsupportedVersion { expected: u32, found: u32 },

    /// The container flags contain unsupported bits.
    #[error("unsupported flags: {flags:#x}")]
    UnsupportedFlags { flags: u32 },

    /// Normals and vertices disagree in length.
    #[error("vertex count mismatch: {vertices} vertices but {normals} normals")]
    VertexCountMismatch { vertices: usize, normals: usize },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the surface has {n_vertices} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        n_vertices: usize,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Maps an end-of-file I/O error to [`FormatError::TruncatedData`] for the given section,
    /// passing any other I/O error through unchanged.
    pub fn from_io_in_section(err: std::io::Error, section: &'static str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            FormatError::TruncatedData { section }
        } else {
            FormatError::Io(err)
        }
    }
}

/// Errors in static tables or user configuration. These are defects, not bad input data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No metadata entry exists for the statistic.
    #[error("no metadata entry for statistic '{statistic}'")]
    MissingMetadata { statistic: String },

    /// The label list does not match the expected volume count.
    #[error("statistic '{statistic}' has {labels} labels but {expected} expected volumes")]
    LabelCountMismatch {
        statistic: String,
        labels: usize,
        expected: usize,
    },

    /// An identifier string did not name a known hemisphere, analysis or statistic.
    #[error("unknown {kind} identifier '{value}'")]
    UnknownIdentifier { kind: &'static str, value: String },
}
