/// Tile token format version for encoding/decoding
pub const TOKEN_VERSION: u8 = 1;

/// Decoded tile token length in bytes
pub(crate) const TOKEN_LENGTH: usize = 19;

/// Delimiter of the canonical `x/y/z` tile string
pub const TILESTR_DELIMITER: char = '/';

/// Delimiter of the filename-safe `x-y-z` tile string
pub const FILENAME_DELIMITER: char = '-';

/// Delimiters recognised by the generic tile string parser, in priority order
pub const TILE_DELIMITERS: [char; 5] = ['-', '/', '_', ',', ' '];

/// Latitude limit of the square Web Mercator world
pub const MAX_LATITUDE: f64 = 85.0511287798066;
