pub mod constants;
mod cover;
mod hierarchy;
mod identifier;
mod projection;

pub use constants::{
    FILENAME_DELIMITER, MAX_LATITUDE, TILE_DELIMITERS, TILESTR_DELIMITER, TOKEN_VERSION,
};
pub use cover::{TileCover, tiles_in_bounds};
pub use hierarchy::{ancestor, center, children, children_at_zoom, parent};
pub use identifier::{
    QuadkeyMode, decode_tile_token, encode_tile_token, filename, quadkey, quadkey_to_tile,
    quadkey_to_tile_with, strtile, tile_from_string, tile_geohash, tilestr,
};
pub use projection::{bounds, coord_to_tile, locate_tile, locate_tiles, ul, xy_bounds};
