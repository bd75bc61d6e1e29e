//! Error types for dxf-geojson
//!
//! Each layer has its own error enum: [`DxfError`] for reading drawings,
//! [`CrsError`] for spatial references and transforms, [`ConfigError`] for
//! service settings, and [`ConvertError`] for the request pipeline, which
//! also carries the HTTP status mapping.

use std::io;
use thiserror::Error;

/// Errors raised while reading a DXF drawing
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing the group code stream
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid file format
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type alias for drawing operations
pub type Result<T> = std::result::Result<T, DxfError>;

/// Errors raised while building spatial references or transforming coordinates
#[derive(Debug, Error)]
pub enum CrsError {
    /// The identifier does not follow any accepted grammar
    #[error("could not parse spatial reference: {0}")]
    Unparsable(String),

    /// The identifier parsed but names an unknown definition
    #[error("unknown spatial reference: {0}")]
    Unknown(String),

    /// The projection backend rejected a definition or a coordinate
    #[error("projection error: {0}")]
    Projection(String),
}

impl From<proj4rs::errors::Error> for CrsError {
    fn from(err: proj4rs::errors::Error) -> Self {
        CrsError::Projection(err.to_string())
    }
}

/// Errors raised while loading the service configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that end a conversion request
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Request body was not valid JSON
    #[error("{0}")]
    MalformedBody(String),

    /// Request body was JSON but did not match the expected shape
    #[error("{0}")]
    InvalidBody(String),

    /// `dxf_base64` could not be decoded
    #[error("dxf_base64 is not valid base64")]
    InvalidBase64,

    /// `dxf_base64` decoded to zero bytes
    #[error("DXF payload is empty")]
    EmptyPayload,

    /// Decoded payload is larger than the configured ceiling
    #[error("payload exceeds the limit ({limit} bytes)")]
    PayloadTooLarge { limit: usize },

    /// A spatial reference identifier could not be interpreted
    #[error("could not interpret {field}: {value}")]
    InvalidCrs { field: &'static str, value: String },

    /// The drawing could not be opened by any registered driver
    #[error("failed to open the file as a DXF drawing; check that it is a valid DXF file")]
    Unreadable(#[source] DxfError),

    /// Transient storage failed
    #[error("could not stage the uploaded drawing")]
    Staging(#[from] io::Error),

    /// The blocking worker running the conversion failed
    #[error("conversion worker failed: {0}")]
    Worker(String),
}

impl ConvertError {
    /// HTTP status code reported for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ConvertError::MalformedBody(_)
            | ConvertError::InvalidBase64
            | ConvertError::EmptyPayload
            | ConvertError::InvalidCrs { .. } => 400,
            ConvertError::PayloadTooLarge { .. } => 413,
            ConvertError::InvalidBody(_) | ConvertError::Unreadable(_) => 422,
            ConvertError::Staging(_) | ConvertError::Worker(_) => 500,
        }
    }
}
