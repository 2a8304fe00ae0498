use crate::error::MercantileError;
use crate::index::constants::{
    FILENAME_DELIMITER, TILE_DELIMITERS, TILESTR_DELIMITER, TOKEN_LENGTH, TOKEN_VERSION,
};
use crate::index::projection::locate_tile;
use crate::tile::TileId;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// How quadkey digits outside `0..=3` are treated when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadkeyMode {
    /// Unknown digits are skipped but still count towards the zoom level.
    #[default]
    Lenient,
    /// Unknown digits are rejected.
    Strict,
}

/// Formats a tile as the canonical `x/y/z` string.
///
/// # Example
/// ```
/// use mercantile_rs::{TileId, tilestr};
///
/// assert_eq!(tilestr(&TileId::new(0, 0, 0)), "0/0/0");
/// ```
pub fn tilestr(tile: &TileId) -> String {
    format!(
        "{}{d}{}{d}{}",
        tile.x,
        tile.y,
        tile.z,
        d = TILESTR_DELIMITER
    )
}

/// Formats a tile as `x-y-z`, safe for use as a file name.
pub fn filename(tile: &TileId) -> String {
    format!(
        "{}{d}{}{d}{}",
        tile.x,
        tile.y,
        tile.z,
        d = FILENAME_DELIMITER
    )
}

/// Parses a canonical `x/y/z` tile string.
///
/// # Errors
///
/// [`MercantileError::Parse`] if the string does not hold exactly three
/// integer fields.
pub fn strtile(s: &str) -> Result<TileId, MercantileError> {
    split_fields(s, TILESTR_DELIMITER)
}

/// Parses a tile string with any recognised delimiter.
///
/// The delimiters `-`, `/`, `_`, `,` and space are tried in that order and
/// the first one present in the string is used to split it. Because `-`
/// comes first, negative indices cannot be parsed by this function.
///
/// # Example
/// ```
/// use mercantile_rs::{TileId, tile_from_string};
///
/// # fn main() -> Result<(), mercantile_rs::MercantileError> {
/// assert_eq!(tile_from_string("256-387-10")?, TileId::new(256, 387, 10));
/// assert_eq!(tile_from_string("256_387_10")?, TileId::new(256, 387, 10));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`MercantileError::UnsupportedDelimiter`] - No recognised delimiter found
/// - [`MercantileError::Parse`] - Wrong field count or a non-integer field
pub fn tile_from_string(s: &str) -> Result<TileId, MercantileError> {
    let delimiter = TILE_DELIMITERS
        .iter()
        .copied()
        .find(|d| s.contains(*d))
        .ok_or_else(|| MercantileError::UnsupportedDelimiter(s.to_string()))?;

    debug!("Parsing tile string '{}' on delimiter '{}'", s, delimiter);
    split_fields(s, delimiter)
}

fn split_fields(s: &str, delimiter: char) -> Result<TileId, MercantileError> {
    let fields: Vec<&str> = s.split(delimiter).map(str::trim).collect();
    if fields.len() != 3 {
        return Err(MercantileError::Parse(format!(
            "expected 3 fields separated by '{}' in '{}', found {}",
            delimiter,
            s,
            fields.len()
        )));
    }

    let x: i64 = fields[0]
        .parse()
        .map_err(|_| MercantileError::Parse(format!("invalid x index: '{}'", fields[0])))?;
    let y: i64 = fields[1]
        .parse()
        .map_err(|_| MercantileError::Parse(format!("invalid y index: '{}'", fields[1])))?;
    let z: u8 = fields[2]
        .parse()
        .map_err(|_| MercantileError::Parse(format!("invalid zoom level: '{}'", fields[2])))?;

    Ok(TileId::new(x, y, z))
}

/// Locates a tile and returns its `x/y/z` string directly.
pub fn tile_geohash(lng: f64, lat: f64, zoom: u8) -> String {
    tilestr(&locate_tile(lng, lat, zoom))
}

/// Encodes a tile as a quadkey.
///
/// One base-4 digit per zoom level, most significant first. A digit is
/// the x bit plus twice the y bit of that level; zoom 0 gives an empty
/// string.
///
/// # Example
/// ```
/// use mercantile_rs::{TileId, quadkey};
///
/// assert_eq!(quadkey(&TileId::new(486, 332, 10)), "0313102310");
/// ```
pub fn quadkey(tile: &TileId) -> String {
    (1..=tile.z as u32)
        .rev()
        .map(|i| {
            let x_bit = tile.x.checked_shr(i - 1).unwrap_or(0) & 1;
            let y_bit = tile.y.checked_shr(i - 1).unwrap_or(0) & 1;
            match x_bit + 2 * y_bit {
                0 => '0',
                1 => '1',
                2 => '2',
                _ => '3',
            }
        })
        .collect()
}

/// Decodes a quadkey in [`QuadkeyMode::Lenient`] mode.
pub fn quadkey_to_tile(qk: &str) -> Result<TileId, MercantileError> {
    quadkey_to_tile_with(qk, QuadkeyMode::Lenient)
}

/// Decodes a quadkey into a tile.
///
/// The zoom level is the number of digits. In lenient mode a digit
/// outside `0..=3` contributes no bits but still counts towards the zoom.
///
/// # Errors
///
/// - [`MercantileError::InvalidQuadkeyDigit`] - Unknown digit in strict mode
/// - [`MercantileError::InvalidZoomLevel`] - More than 255 digits
pub fn quadkey_to_tile_with(qk: &str, mode: QuadkeyMode) -> Result<TileId, MercantileError> {
    let digits = qk.chars().count();
    let z = u8::try_from(digits).map_err(|_| MercantileError::InvalidZoomLevel(u8::MAX))?;

    let mut x: i64 = 0;
    let mut y: i64 = 0;
    for (i, digit) in qk.chars().rev().enumerate() {
        let mask = 1_i64.checked_shl(i as u32).unwrap_or(0);
        match digit {
            '0' => {}
            '1' => x |= mask,
            '2' => y |= mask,
            '3' => {
                x |= mask;
                y |= mask;
            }
            other => match mode {
                QuadkeyMode::Strict => return Err(MercantileError::InvalidQuadkeyDigit(other)),
                QuadkeyMode::Lenient => {
                    warn!("Ignoring quadkey digit '{}' in '{}'", other, qk);
                }
            },
        }
    }

    Ok(TileId::new(x, y, z))
}

/// Generates a compact URL-safe tile token.
///
/// # Binary Format
///
/// | Offset | Size | Field    | Description                               |
/// |--------|------|----------|-------------------------------------------|
/// | 0      | 1    | Version  | Token format version (currently 1)        |
/// | 1      | 1    | Zoom     | Tile zoom level                           |
/// | 2      | 8    | X        | Column as big-endian `i64`                |
/// | 10     | 8    | Y        | Row as big-endian `i64`                   |
/// | 18     | 1    | Checksum | Wrapping sum of bytes 0-17                |
///
/// The 19 bytes are encoded as URL-safe Base64 without padding.
///
/// # Example
/// ```
/// use mercantile_rs::{TileId, decode_tile_token, encode_tile_token};
///
/// let token = encode_tile_token(&TileId::new(256, 387, 10));
/// assert_eq!(decode_tile_token(&token).unwrap(), TileId::new(256, 387, 10));
/// ```
pub fn encode_tile_token(tile: &TileId) -> String {
    let mut binary_data = Vec::with_capacity(TOKEN_LENGTH);
    binary_data.push(TOKEN_VERSION);
    binary_data.push(tile.z);
    binary_data.extend_from_slice(&tile.x.to_be_bytes());
    binary_data.extend_from_slice(&tile.y.to_be_bytes());

    let checksum: u8 = binary_data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    binary_data.push(checksum);

    URL_SAFE_NO_PAD.encode(&binary_data)
}

/// Decodes a tile token produced by [`encode_tile_token`].
///
/// # Errors
///
/// - [`MercantileError::Base64DecodeError`] - Invalid Base64 encoding
/// - [`MercantileError::InvalidTokenLength`] - Decoded data is not 19 bytes
/// - [`MercantileError::InvalidChecksum`] - Checksum validation failed
/// - [`MercantileError::UnsupportedVersion`] - Version byte doesn't match current version
pub fn decode_tile_token(token: &str) -> Result<TileId, MercantileError> {
    let binary_data = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| MercantileError::Base64DecodeError)?;

    if binary_data.len() != TOKEN_LENGTH {
        return Err(MercantileError::InvalidTokenLength);
    }

    let (data, checksum_bytes) = binary_data.split_at(TOKEN_LENGTH - 1);
    let checksum = checksum_bytes[0];

    let calculated_checksum: u8 = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    if calculated_checksum != checksum {
        return Err(MercantileError::InvalidChecksum);
    }

    let version = data[0];
    if version != TOKEN_VERSION {
        return Err(MercantileError::UnsupportedVersion(version));
    }

    let zoom = data[1];
    let x_bytes: [u8; 8] = data[2..10]
        .try_into()
        .map_err(|_| MercantileError::InvalidTokenLength)?;
    let y_bytes: [u8; 8] = data[10..18]
        .try_into()
        .map_err(|_| MercantileError::InvalidTokenLength)?;

    Ok(TileId::new(
        i64::from_be_bytes(x_bytes),
        i64::from_be_bytes(y_bytes),
        zoom,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilestr() {
        assert_eq!(tilestr(&TileId::new(0, 0, 0)), "0/0/0");
        assert_eq!(tilestr(&TileId::new(256, 387, 10)), "256/387/10");
    }

    #[test]
    fn test_filename() {
        assert_eq!(filename(&TileId::new(256, 387, 10)), "256-387-10");
    }

    #[test]
    fn test_strtile() -> Result<(), MercantileError> {
        assert_eq!(strtile("256/387/10")?, TileId::new(256, 387, 10));
        Ok(())
    }

    #[test]
    fn test_strtile_roundtrip_string() -> Result<(), MercantileError> {
        for s in ["0/0/0", "1/0/1", "486/332/10", "8191/8191/13"] {
            assert_eq!(tilestr(&strtile(s)?), s);
        }
        Ok(())
    }

    #[test]
    fn test_strtile_wrong_field_count() {
        assert!(matches!(strtile("256/387"), Err(MercantileError::Parse(_))));
        assert!(matches!(strtile("1/2/3/4"), Err(MercantileError::Parse(_))));
        assert!(matches!(strtile(""), Err(MercantileError::Parse(_))));
    }

    #[test]
    fn test_strtile_non_numeric() {
        assert!(matches!(strtile("a/387/10"), Err(MercantileError::Parse(_))));
        assert!(matches!(strtile("1/2/300"), Err(MercantileError::Parse(_))));
    }

    #[test]
    fn test_tile_from_string_delimiters() -> Result<(), MercantileError> {
        let expected = TileId::new(256, 387, 10);
        for s in ["256-387-10", "256/387/10", "256_387_10", "256,387,10", "256 387 10"] {
            assert_eq!(tile_from_string(s)?, expected);
        }
        Ok(())
    }

    #[test]
    fn test_tile_from_string_priority() {
        // '-' wins over '/', leaving two fields.
        let result = tile_from_string("1-2/3");
        assert!(matches!(result, Err(MercantileError::Parse(_))));
    }

    #[test]
    fn test_tile_from_string_no_delimiter() {
        let result = tile_from_string("256.387.10");
        assert_eq!(
            result,
            Err(MercantileError::UnsupportedDelimiter("256.387.10".to_string()))
        );
    }

    #[test]
    fn test_tile_geohash() {
        assert_eq!(tile_geohash(-90.0, 40.0, 10), "256/387/10");
    }

    #[test]
    fn test_quadkey() {
        assert_eq!(quadkey(&TileId::new(0, 0, 0)), "");
        assert_eq!(quadkey(&TileId::new(1, 0, 1)), "1");
        assert_eq!(quadkey(&TileId::new(0, 1, 1)), "2");
        assert_eq!(quadkey(&TileId::new(1, 1, 1)), "3");
        assert_eq!(quadkey(&TileId::new(486, 332, 10)), "0313102310");
    }

    #[test]
    fn test_quadkey_to_tile() -> Result<(), MercantileError> {
        assert_eq!(quadkey_to_tile("0313102310")?, TileId::new(486, 332, 10));
        assert_eq!(quadkey_to_tile("")?, TileId::new(0, 0, 0));
        Ok(())
    }

    #[test]
    fn test_quadkey_roundtrip() -> Result<(), MercantileError> {
        for tile in [
            TileId::new(0, 0, 1),
            TileId::new(1, 1, 1),
            TileId::new(256, 387, 10),
            TileId::new(8191, 0, 13),
        ] {
            assert_eq!(quadkey_to_tile(&quadkey(&tile))?, tile);
        }
        Ok(())
    }

    #[test]
    fn test_keys_roundtrip_all_tiles() -> Result<(), MercantileError> {
        for z in 1..=8u8 {
            let n = 1i64 << z;
            for x in 0..n {
                for y in 0..n {
                    let tile = TileId::new(x, y, z);
                    let key = quadkey(&tile);
                    assert_eq!(key.len(), z as usize);
                    assert_eq!(quadkey_to_tile_with(&key, QuadkeyMode::Strict)?, tile);
                    assert_eq!(strtile(&tilestr(&tile))?, tile);
                    assert_eq!(tile_from_string(&filename(&tile))?, tile);
                    assert_eq!(decode_tile_token(&encode_tile_token(&tile))?, tile);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_quadkey_extends_parent_quadkey() -> Result<(), MercantileError> {
        for tile in [TileId::new(256, 387, 10), TileId::new(3, 5, 3), TileId::new(1, 0, 1)] {
            let key = quadkey(&tile);
            assert_eq!(quadkey(&tile.parent()?), &key[..key.len() - 1]);
        }
        Ok(())
    }

    #[test]
    fn test_quadkey_lenient_ignores_unknown_digits() -> Result<(), MercantileError> {
        // '9' contributes nothing but still counts as a zoom level.
        assert_eq!(quadkey_to_tile("193")?, TileId::new(5, 1, 3));
        Ok(())
    }

    #[test]
    fn test_quadkey_strict_rejects_unknown_digits() {
        let result = quadkey_to_tile_with("193", QuadkeyMode::Strict);
        assert_eq!(result, Err(MercantileError::InvalidQuadkeyDigit('9')));
    }

    #[test]
    fn test_quadkey_too_long() {
        let qk = "0".repeat(256);
        assert!(matches!(
            quadkey_to_tile(&qk),
            Err(MercantileError::InvalidZoomLevel(_))
        ));
    }

    #[test]
    fn test_tile_token_roundtrip() -> Result<(), MercantileError> {
        let tile = TileId::new(486, 332, 10);
        let token = encode_tile_token(&tile);
        assert!(!token.is_empty());
        assert_eq!(decode_tile_token(&token)?, tile);
        Ok(())
    }

    #[test]
    fn test_invalid_token() {
        assert!(decode_tile_token("invalid").is_err());
        assert_eq!(
            decode_tile_token("!!!"),
            Err(MercantileError::Base64DecodeError)
        );
    }

    #[test]
    fn test_token_checksum_mismatch() {
        let mut bytes = URL_SAFE_NO_PAD
            .decode(encode_tile_token(&TileId::new(1, 2, 3)))
            .unwrap();
        bytes[5] ^= 0xff;
        let tampered = URL_SAFE_NO_PAD.encode(&bytes);
        assert_eq!(
            decode_tile_token(&tampered),
            Err(MercantileError::InvalidChecksum)
        );
    }
}
