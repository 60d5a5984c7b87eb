// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io(String),
    Config(String),
    /// The file could not be read as a DICOM object.
    Dicom(String),
    /// The object was read but its pixel data could not be turned into an image.
    Decode(String),
    InvalidImageId(String),
    WorkerPool(String),
    Surface(SurfaceError),
    Tool(String),
}

/// Failures reported by the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface has not been enabled, or was disabled.
    NotEnabled,
    /// No image has been displayed on the surface yet.
    NoImage,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::NotEnabled => write!(f, "display surface is not enabled"),
            SurfaceError::NoImage => write!(f, "no image is displayed"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Dicom(e) => write!(f, "DICOM Error: {}", e),
            Error::Decode(e) => write!(f, "Decode Error: {}", e),
            Error::InvalidImageId(e) => write!(f, "Invalid image id: {}", e),
            Error::WorkerPool(e) => write!(f, "Worker Pool Error: {}", e),
            Error::Surface(e) => write!(f, "Surface Error: {}", e),
            Error::Tool(e) => write!(f, "Tool Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<SurfaceError> for Error {
    fn from(err: SurfaceError) -> Self {
        Error::Surface(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<dicom::object::ReadError> for Error {
    fn from(err: dicom::object::ReadError) -> Self {
        Error::Dicom(err.to_string())
    }
}

impl From<dicom::pixeldata::Error> for Error {
    fn from(err: dicom::pixeldata::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::WorkerPool(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
