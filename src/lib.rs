//! # mercantile-rs
//!
//! Web Mercator slippy-map tiles: find the tile under a point, get a tile's
//! bounds, walk the tile hierarchy and encode tile addresses as strings.
//!
//! ### 1. `TileId` - Single Tile Operations
//!
//! ```
//! use mercantile_rs::TileId;
//!
//! # fn main() -> Result<(), mercantile_rs::MercantileError> {
//! let tile = TileId::from_lnglat(&(-90.0, 40.0), 10);
//! assert_eq!(tile.to_string(), "256/387/10");
//!
//! let bounds = tile.bounds();
//! assert!(bounds.w < bounds.e && bounds.s < bounds.n);
//!
//! let parent = tile.parent()?;
//! let children = parent.children()?;
//! assert!(children.contains(&tile));
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. Tile keys
//!
//! ```
//! use mercantile_rs::{TileId, quadkey_to_tile, tile_from_string};
//!
//! # fn main() -> Result<(), mercantile_rs::MercantileError> {
//! let tile = TileId::new(486, 332, 10);
//! assert_eq!(tile.quadkey(), "0313102310");
//! assert_eq!(tile.filename(), "486-332-10");
//! assert_eq!(quadkey_to_tile("0313102310")?, tile);
//! assert_eq!(tile_from_string("486_332_10")?, tile);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `CsvToTiles` - CSV File Conversion
//!
//! ```no_run
//! use mercantile_rs::{CsvToTiles, CsvTileConfig, GeometryFormat, TileKeyFormat};
//!
//! let config = CsvTileConfig::from_coords("Longitude", "Latitude", 14)
//!     .key_format(TileKeyFormat::Quadkey)
//!     .with_tile_geometry(GeometryFormat::Wkt);
//!
//! "input.csv".to_tile_csv("output.csv", &config).unwrap();
//! ```
//!

pub mod coord;
pub mod error;
pub mod geom;
pub mod index;
pub mod io;
pub mod tile;

pub use coord::{Coordinate, EARTH_RADIUS, lnglat, xy};
pub use error::MercantileError;
pub use geom::{parse_geometry, polygon_to_geojson, polygon_to_wkt, tile_polygon};
pub use index::{
    FILENAME_DELIMITER, MAX_LATITUDE, QuadkeyMode, TILE_DELIMITERS, TILESTR_DELIMITER,
    TOKEN_VERSION, TileCover, ancestor, bounds, center, children, children_at_zoom,
    coord_to_tile, decode_tile_token, encode_tile_token, filename, locate_tile, locate_tiles,
    parent, quadkey, quadkey_to_tile, quadkey_to_tile_with, strtile, tile_from_string,
    tile_geohash, tiles_in_bounds, tilestr, ul, xy_bounds,
};
pub use io::{
    CoordinateSource, CsvTileConfig, CsvToTiles, GeometryFormat, RowErrorPolicy, TileKeyFormat,
    TileSetMetadata, TilesToArrow, TilesToGeoParquet, csv_to_tile_csv, write_tiles_geoparquet,
};
pub use tile::{Extrema, TileId};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;
