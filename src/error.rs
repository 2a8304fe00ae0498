use crate::tile::TileId;

/// Error type for mercantile-rs operations.
#[derive(Debug, PartialEq)]
pub enum MercantileError {
    /// A tile string did not split into three integer fields.
    Parse(String),
    /// None of the recognised delimiters were found in a tile string.
    UnsupportedDelimiter(String),
    /// A quadkey contained a digit outside 0-3 (strict decoding only).
    InvalidQuadkeyDigit(char),
    /// The zoom level is not valid for the requested operation.
    InvalidZoomLevel(u8),
    /// Descending from this tile would overflow the `i64` tile indices.
    IndexOverflow(TileId),
    /// Failed to decode a Base64 tile token.
    Base64DecodeError,
    /// The decoded tile token has an invalid length.
    InvalidTokenLength,
    /// The tile token checksum validation failed.
    InvalidChecksum,
    /// The tile token version is not supported.
    UnsupportedVersion(u8),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
    /// CSV parsing or reading error.
    CsvError(String),
    /// File I/O or serialization error.
    IoError(String),
    /// A configuration document could not be loaded.
    ConfigError(String),
}

impl std::fmt::Display for MercantileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MercantileError::Parse(msg) => write!(f, "Parse error: {}", msg),
            MercantileError::UnsupportedDelimiter(s) => {
                write!(f, "No supported delimiter found in '{}'", s)
            }
            MercantileError::InvalidQuadkeyDigit(c) => {
                write!(f, "Invalid quadkey digit: '{}'", c)
            }
            MercantileError::InvalidZoomLevel(z) => write!(f, "Invalid zoom level: {}", z),
            MercantileError::IndexOverflow(tile) => {
                write!(f, "Tile index overflow below tile {}", tile)
            }
            MercantileError::Base64DecodeError => write!(f, "Base64 decode error"),
            MercantileError::InvalidTokenLength => write!(f, "Invalid token length"),
            MercantileError::InvalidChecksum => write!(f, "Invalid checksum"),
            MercantileError::UnsupportedVersion(v) => write!(f, "Unsupported version: {}", v),
            MercantileError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
            MercantileError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            MercantileError::IoError(msg) => write!(f, "IO error: {}", msg),
            MercantileError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for MercantileError {}
