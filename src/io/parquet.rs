use crate::error::MercantileError;
use crate::io::arrow::TilesToArrow;
use crate::tile::TileId;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use log::debug;
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Key of the tile set entry in the Parquet key-value metadata.
pub const TILESET_METADATA_KEY: &str = "tileset";

/// Rows per row group unless the caller picks another size.
pub const DEFAULT_ROW_GROUP_TILES: usize = 65_536;

/// Describes the tiles stored in a GeoParquet file.
///
/// Written as JSON under [`TILESET_METADATA_KEY`] next to the `geo` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSetMetadata {
    pub scheme: String,
    pub crs: String,
    pub ordering: String,
    pub min_zoom: Option<u8>,
    pub max_zoom: Option<u8>,
    pub tile_count: usize,
}

impl TileSetMetadata {
    pub fn from_tiles(tiles: &[TileId]) -> Self {
        TileSetMetadata {
            scheme: "xyz".to_string(),
            crs: "EPSG:4326".to_string(),
            ordering: "quadkey".to_string(),
            min_zoom: tiles.iter().map(|t| t.z).min(),
            max_zoom: tiles.iter().map(|t| t.z).max(),
            tile_count: tiles.len(),
        }
    }
}

/// Writes tiles to a GeoParquet file, one row per tile.
///
/// Rows are sorted by quadkey so that each row group holds a spatially
/// compact block of tiles, and a parent's quadkey sorts before its
/// descendants. Geometries are WKB tile outlines.
///
/// # Errors
///
/// [`MercantileError::ConfigError`] if `row_group_tiles` is zero, and
/// [`MercantileError::IoError`] if encoding or writing fails.
pub fn write_tiles_geoparquet(
    tiles: &[TileId],
    path: impl AsRef<Path>,
    row_group_tiles: usize,
) -> Result<(), MercantileError> {
    if row_group_tiles == 0 {
        return Err(MercantileError::ConfigError(
            "row group size must be at least one tile".to_string(),
        ));
    }

    let mut sorted = tiles.to_vec();
    sorted.sort_by_cached_key(|t| (t.quadkey(), t.z));

    let batch = sorted.to_record_batch()?;
    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();
    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&batch.schema(), &options)
        .map_err(|e| MercantileError::IoError(e.to_string()))?;

    let props = WriterProperties::builder()
        .set_max_row_group_size(row_group_tiles)
        .build();
    let file = File::create(path.as_ref()).map_err(|e| MercantileError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), Some(props))
        .map_err(|e| MercantileError::IoError(e.to_string()))?;

    let encoded_batch = encoder
        .encode_record_batch(&batch)
        .map_err(|e| MercantileError::IoError(e.to_string()))?;
    writer
        .write(&encoded_batch)
        .map_err(|e| MercantileError::IoError(e.to_string()))?;

    let geo_metadata = encoder
        .into_keyvalue()
        .map_err(|e| MercantileError::IoError(e.to_string()))?;
    writer.append_key_value_metadata(geo_metadata);

    let tileset = serde_json::to_string(&TileSetMetadata::from_tiles(&sorted))
        .map_err(|e| MercantileError::IoError(e.to_string()))?;
    writer.append_key_value_metadata(KeyValue::new(TILESET_METADATA_KEY.to_string(), tileset));

    writer
        .finish()
        .map_err(|e| MercantileError::IoError(e.to_string()))?;

    debug!(
        "Wrote {} tiles to {} in row groups of {}",
        sorted.len(),
        path.as_ref().display(),
        row_group_tiles
    );
    Ok(())
}

/// Trait for writing collections of [`TileId`]s to GeoParquet.
pub trait TilesToGeoParquet: TilesToArrow {
    /// Writes the tiles in quadkey order with [`DEFAULT_ROW_GROUP_TILES`] rows per group.
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MercantileError>;
}

impl TilesToGeoParquet for [TileId] {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MercantileError> {
        write_tiles_geoparquet(self, path, DEFAULT_ROW_GROUP_TILES)
    }
}

impl TilesToGeoParquet for Vec<TileId> {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MercantileError> {
        self.as_slice().to_geoparquet(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::{Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn io_err(e: impl std::fmt::Display) -> MercantileError {
        MercantileError::IoError(e.to_string())
    }

    fn temp_path() -> Result<(TempDir, PathBuf), MercantileError> {
        let dir = tempdir().map_err(io_err)?;
        let path = dir.path().join("tiles.parquet");
        Ok((dir, path))
    }

    fn read_tile_ids(path: &Path) -> Result<Vec<String>, MercantileError> {
        let file = File::open(path).map_err(io_err)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(io_err)?
            .build()
            .map_err(io_err)?;

        let mut ids = Vec::new();
        for batch in reader {
            let batch = batch.map_err(io_err)?;
            let column = batch
                .column(0)
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| io_err("tile_id is not a string column"))?;
            ids.extend((0..column.len()).map(|i| column.value(i).to_string()));
        }
        Ok(ids)
    }

    fn read_tileset(path: &Path) -> Result<TileSetMetadata, MercantileError> {
        let file = File::open(path).map_err(io_err)?;
        let reader = SerializedFileReader::new(file).map_err(io_err)?;
        let entry = reader
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .and_then(|kvs| kvs.iter().find(|kv| kv.key == TILESET_METADATA_KEY))
            .and_then(|kv| kv.value.clone())
            .ok_or_else(|| io_err("missing tileset metadata"))?;
        serde_json::from_str(&entry).map_err(io_err)
    }

    #[test]
    fn test_tiles_to_geoparquet() -> Result<(), MercantileError> {
        let tiles = TileId::new(0, 0, 0).children_at_zoom(2)?;
        let (_dir, path) = temp_path()?;

        tiles.to_geoparquet(&path)?;

        assert!(path.exists());
        assert_eq!(read_tile_ids(&path)?.len(), 16);
        Ok(())
    }

    #[test]
    fn test_geoparquet_rows_in_quadkey_order() -> Result<(), MercantileError> {
        // breadth-first order is TL, TR, BR, BL per parent
        let tiles = TileId::new(0, 0, 0).children_at_zoom(2)?;
        let (_dir, path) = temp_path()?;

        tiles.to_geoparquet(&path)?;

        let ids = read_tile_ids(&path)?;
        assert_eq!(&ids[..5], &["0/0/2", "1/0/2", "0/1/2", "1/1/2", "2/0/2"]);
        assert_eq!(ids.last().map(String::as_str), Some("3/3/2"));
        Ok(())
    }

    #[test]
    fn test_geoparquet_parent_before_descendants() -> Result<(), MercantileError> {
        let tiles = vec![
            TileId::new(1, 1, 2),
            TileId::new(1, 0, 1),
            TileId::new(0, 0, 1),
            TileId::new(0, 0, 0),
        ];
        let (_dir, path) = temp_path()?;

        tiles.to_geoparquet(&path)?;

        let ids = read_tile_ids(&path)?;
        assert_eq!(ids, vec!["0/0/0", "0/0/1", "1/1/2", "1/0/1"]);
        Ok(())
    }

    #[test]
    fn test_geoparquet_tileset_metadata() -> Result<(), MercantileError> {
        let tiles = vec![TileId::new(256, 387, 10), TileId::new(0, 0, 3), TileId::new(1, 1, 1)];
        let (_dir, path) = temp_path()?;

        tiles.to_geoparquet(&path)?;

        let tileset = read_tileset(&path)?;
        assert_eq!(tileset.scheme, "xyz");
        assert_eq!(tileset.crs, "EPSG:4326");
        assert_eq!(tileset.ordering, "quadkey");
        assert_eq!(tileset.min_zoom, Some(1));
        assert_eq!(tileset.max_zoom, Some(10));
        assert_eq!(tileset.tile_count, 3);
        Ok(())
    }

    #[test]
    fn test_geoparquet_row_groups() -> Result<(), MercantileError> {
        let tiles = TileId::new(0, 0, 0).children_at_zoom(2)?;
        let (_dir, path) = temp_path()?;

        write_tiles_geoparquet(&tiles, &path, 4)?;

        let file = File::open(&path).map_err(io_err)?;
        let reader = SerializedFileReader::new(file).map_err(io_err)?;
        assert_eq!(reader.metadata().num_row_groups(), 4);
        assert_eq!(reader.metadata().file_metadata().num_rows(), 16);
        Ok(())
    }

    #[test]
    fn test_geoparquet_zero_row_group_is_error() -> Result<(), MercantileError> {
        let (_dir, path) = temp_path()?;
        let result = write_tiles_geoparquet(&[TileId::new(0, 0, 0)], &path, 0);
        assert!(matches!(result, Err(MercantileError::ConfigError(_))));
        assert!(!path.exists());
        Ok(())
    }
}
