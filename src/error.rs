//! Error handling for weight capture, transfer, and file operations

use thiserror::Error;

/// Result type alias for skin-weight operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during weight capture, serialization, or resynthesis
#[derive(Error, Debug)]
pub enum Error {
    /// A weight file is malformed: missing header fields, an unparsable
    /// vertex key, or a table that disagrees with the declared vertex count
    #[error("Structural file error: {message}")]
    StructuralFile { message: String },

    /// Index-identity resynthesis was requested but the destination vertex
    /// count does not match the record
    #[error("Vertex count mismatch: record has {expected} vertices, destination has {actual}")]
    VertexCountMismatch { expected: usize, actual: usize },

    /// An influence name was referenced that the record (or destination
    /// deformer) does not contain
    #[error("Missing influence: {name}")]
    MissingInfluence { name: String },

    /// A transfer spec names an influence as both retained and removed,
    /// or removes the same influence twice
    #[error("Cyclic transfer spec: {name} is both retained and removed")]
    CyclicTransferSpec { name: String },

    /// A weight record failed internal validation (row lengths, weight sums)
    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The operation was cancelled through its progress handler
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a new structural file error
    pub fn structural_file<S: Into<String>>(message: S) -> Self {
        Self::StructuralFile {
            message: message.into(),
        }
    }

    /// Create a new vertex count mismatch error
    pub fn vertex_count_mismatch(expected: usize, actual: usize) -> Self {
        Self::VertexCountMismatch { expected, actual }
    }

    /// Create a new missing influence error
    pub fn missing_influence<S: Into<String>>(name: S) -> Self {
        Self::MissingInfluence { name: name.into() }
    }

    /// Create a new cyclic transfer spec error
    pub fn cyclic_transfer_spec<S: Into<String>>(name: S) -> Self {
        Self::CyclicTransferSpec { name: name.into() }
    }

    /// Create a new invalid record error
    pub fn invalid_record<S: Into<String>>(message: S) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Create a new invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::structural_file(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = Error::structural_file("missing header");
        assert!(matches!(error, Error::StructuralFile { .. }));
        assert_eq!(error.to_string(), "Structural file error: missing header");
    }

    #[test]
    fn test_vertex_count_mismatch_display() {
        let error = Error::vertex_count_mismatch(3, 5);
        assert_eq!(
            error.to_string(),
            "Vertex count mismatch: record has 3 vertices, destination has 5"
        );
    }

    #[test]
    fn test_json_error_maps_to_structural() {
        let parse = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let error = Error::from(parse);
        assert!(matches!(error, Error::StructuralFile { .. }));
    }
}
