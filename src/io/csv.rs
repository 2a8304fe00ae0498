use crate::error::MercantileError;
use crate::geom::{parse_geometry, polygon_to_geojson, polygon_to_wkt};
use crate::tile::TileId;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

enum SourceIndices {
    Geometry(usize),
    Coordinates { x_idx: usize, y_idx: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Which encoding to write in the `tile_id` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKeyFormat {
    /// `x/y/z`
    #[default]
    Slash,
    /// `x-y-z`
    Filename,
    Quadkey,
    /// URL-safe Base64 tile token
    Token,
}

impl TileKeyFormat {
    pub fn encode(&self, tile: &TileId) -> String {
        match self {
            TileKeyFormat::Slash => tile.to_string(),
            TileKeyFormat::Filename => tile.filename(),
            TileKeyFormat::Quadkey => tile.quadkey(),
            TileKeyFormat::Token => tile.token(),
        }
    }
}

/// What to do with a row whose location cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Abort the conversion with the row's error.
    #[default]
    Fail,
    /// Log the row and carry on.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry
    GeometryColumn(String),
    /// Separate longitude and latitude columns
    CoordinateColumns { x_column: String, y_column: String },
}

/// Configuration for tagging CSV rows with tile keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvTileConfig {
    pub source: CoordinateSource,
    #[serde(default)]
    pub exclude_columns: Vec<String>,
    pub zoom_level: u8,
    #[serde(default)]
    pub key_format: TileKeyFormat,
    #[serde(default)]
    pub include_tile_geometry: Option<GeometryFormat>,
    #[serde(default)]
    pub on_invalid_row: RowErrorPolicy,
}

impl CsvTileConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use mercantile_rs::CsvTileConfig;
    ///
    /// let config = CsvTileConfig::new("geometry", 12);
    /// ```
    pub fn new(geometry_column: impl Into<String>, zoom_level: u8) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            zoom_level,
            key_format: TileKeyFormat::default(),
            include_tile_geometry: None,
            on_invalid_row: RowErrorPolicy::default(),
        }
    }

    /// Create config for a CSV with separate longitude/latitude columns.
    ///
    /// # Example
    /// ```
    /// use mercantile_rs::{CsvTileConfig, TileKeyFormat};
    ///
    /// let config = CsvTileConfig::from_coords("Longitude", "Latitude", 14)
    ///     .key_format(TileKeyFormat::Quadkey);
    /// ```
    pub fn from_coords(
        x_column: impl Into<String>,
        y_column: impl Into<String>,
        zoom_level: u8,
    ) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                x_column: x_column.into(),
                y_column: y_column.into(),
            },
            exclude_columns: Vec::new(),
            zoom_level,
            key_format: TileKeyFormat::default(),
            include_tile_geometry: None,
            on_invalid_row: RowErrorPolicy::default(),
        }
    }

    /// Load a config from a JSON document.
    ///
    /// # Example
    /// ```
    /// use mercantile_rs::{CsvTileConfig, TileKeyFormat};
    ///
    /// let json = r#"{
    ///     "source": {"coordinate_columns": {"x_column": "lon", "y_column": "lat"}},
    ///     "zoom_level": 12,
    ///     "key_format": "quadkey"
    /// }"#;
    /// let config = CsvTileConfig::from_json(json).unwrap();
    /// assert_eq!(config.key_format, TileKeyFormat::Quadkey);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, MercantileError> {
        serde_json::from_str(json).map_err(|e| MercantileError::ConfigError(e.to_string()))
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn key_format(mut self, format: TileKeyFormat) -> Self {
        self.key_format = format;
        self
    }

    pub fn on_invalid_row(mut self, policy: RowErrorPolicy) -> Self {
        self.on_invalid_row = policy;
        self
    }

    /// Include the tile outline in output.
    pub fn with_tile_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_tile_geometry = Some(format);
        self
    }
}

pub trait CsvToTiles {
    fn to_tile_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvTileConfig,
    ) -> Result<(), MercantileError>;
}

impl<P: AsRef<Path>> CsvToTiles for P {
    fn to_tile_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvTileConfig,
    ) -> Result<(), MercantileError> {
        csv_to_tile_csv(self, output_path, config)
    }
}

fn find_column(
    headers: &csv::StringRecord,
    name: &str,
    role: &str,
) -> Result<usize, MercantileError> {
    if name.is_empty() {
        return Err(MercantileError::CsvError(format!(
            "{} column name cannot be empty",
            role
        )));
    }
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| MercantileError::CsvError(format!("{} column '{}' not found", role, name)))
}

fn record_field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    role: &str,
) -> Result<&'r str, MercantileError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| {
            MercantileError::CsvError(format!("Missing {} column at index {}", role, idx))
        })
}

fn tiles_for_record(
    record: &csv::StringRecord,
    source: &SourceIndices,
    zoom: u8,
) -> Result<Vec<TileId>, MercantileError> {
    match source {
        SourceIndices::Geometry(idx) => {
            let geom = parse_geometry(record_field(record, *idx, "geometry")?)?;
            TileId::from_geometry(geom, zoom)
        }
        SourceIndices::Coordinates { x_idx, y_idx } => {
            let x_str = record_field(record, *x_idx, "X")?;
            let y_str = record_field(record, *y_idx, "Y")?;

            let x: f64 = x_str.parse().map_err(|_| {
                MercantileError::CsvError(format!("Invalid longitude: '{}'", x_str))
            })?;
            let y: f64 = y_str.parse().map_err(|_| {
                MercantileError::CsvError(format!("Invalid latitude: '{}'", y_str))
            })?;

            Ok(vec![TileId::from_lnglat(&(x, y), zoom)])
        }
    }
}

/// Converts a CSV file with geometry or coordinate columns to a CSV file keyed by tile.
///
/// Streams output to minimize memory usage for large files. Rows whose
/// geometry covers several tiles are written once per tile.
///
/// # Example
///
/// ```no_run
/// use mercantile_rs::{csv_to_tile_csv, CsvTileConfig, GeometryFormat};
///
/// let config = CsvTileConfig::from_coords("Longitude", "Latitude", 14)
///     .with_tile_geometry(GeometryFormat::Wkt);
///
/// csv_to_tile_csv("stops.csv", "stops_tiled.csv", &config).unwrap();
/// ```
pub fn csv_to_tile_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvTileConfig,
) -> Result<(), MercantileError> {
    let file = File::open(csv_path).map_err(|e| MercantileError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| MercantileError::CsvError(e.to_string()))?
        .clone();

    // Source columns never make it into the output.
    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = find_column(&headers, col, "Geometry")?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns { x_column, y_column } => {
            let x_idx = find_column(&headers, x_column, "X")?;
            let y_idx = find_column(&headers, y_column, "Y")?;
            (
                SourceIndices::Coordinates { x_idx, y_idx },
                HashSet::from([x_idx, y_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file =
        File::create(output_path).map_err(|e| MercantileError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["tile_id"];
    if config.include_tile_geometry.is_some() {
        header_row.push("tile_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| MercantileError::CsvError(e.to_string()))?;

    let mut skipped = 0usize;
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| MercantileError::CsvError(e.to_string()))?;

        let tiles = match tiles_for_record(&record, &source_indices, config.zoom_level) {
            Ok(tiles) => tiles,
            Err(e) => match config.on_invalid_row {
                RowErrorPolicy::Fail => return Err(e),
                RowErrorPolicy::Skip => {
                    warn!("Skipping CSV record {}: {}", line + 1, e);
                    skipped += 1;
                    continue;
                }
            },
        };

        for tile in tiles {
            let mut row: Vec<String> = vec![config.key_format.encode(&tile)];

            if let Some(format) = config.include_tile_geometry {
                let polygon = tile.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| MercantileError::CsvError(e.to_string()))?;
        }
    }

    writer
        .flush()
        .map_err(|e| MercantileError::CsvError(e.to_string()))?;

    debug!("CSV conversion finished, {} records skipped", skipped);
    Ok(())
}
