pub mod arrow;
pub mod csv;
pub mod parquet;

pub use self::arrow::TilesToArrow;
pub use self::csv::{
    CoordinateSource, CsvTileConfig, CsvToTiles, GeometryFormat, RowErrorPolicy, TileKeyFormat,
    csv_to_tile_csv,
};
pub use self::parquet::{
    DEFAULT_ROW_GROUP_TILES, TILESET_METADATA_KEY, TileSetMetadata, TilesToGeoParquet,
    write_tiles_geoparquet,
};
