//! Error types for planet generation and persistence

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating, querying, or storing a planet
#[derive(Debug, Error)]
pub enum PlanetError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Subdivision level below zero
    #[error("subdivision_level must be >= 0 (got {0})")]
    InvalidSubdivision(i32),

    /// Subdivision level whose mesh would not fit 32-bit indices
    #[error("subdivision_level must be <= {max} (got {level})")]
    SubdivisionTooLarge { level: i32, max: i32 },

    /// A stage that needs a mesh ran before mesh generation
    #[error("planet has no mesh; run mesh generation first")]
    MeshMissing,

    /// Requested face index does not exist
    #[error("face not found: {0}")]
    FaceNotFound(usize),

    /// Planet or config file does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// On-disk structure is corrupt or inconsistent
    #[error("malformed planet file: {0}")]
    MalformedFile(String),

    /// Render-data boundary invariants were violated
    #[error("invalid render data: {0}")]
    InvalidRenderData(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary encoding or decoding failure
    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// Config file could not be parsed
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type alias for planet operations
pub type Result<T> = std::result::Result<T, PlanetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdivision_message() {
        let err = PlanetError::InvalidSubdivision(-1);
        assert!(err.to_string().contains("subdivision_level must be >= 0"));
    }

    #[test]
    fn test_subdivision_too_large_message() {
        let err = PlanetError::SubdivisionTooLarge { level: 20, max: 13 };
        assert_eq!(err.to_string(), "subdivision_level must be <= 13 (got 20)");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: PlanetError = io.into();
        assert!(matches!(err, PlanetError::Io(_)));
    }
}
