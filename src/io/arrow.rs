use crate::error::MercantileError;
use crate::tile::TileId;
use arrow_array::{Int64Array, RecordBatch, StringArray, UInt8Array};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::{PointArray, PolygonArray};
use geoarrow_array::builder::{PointBuilder, PolygonBuilder};
use geoarrow_schema::{Crs, Dimension, Metadata, PointType, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

fn wgs84_metadata() -> Arc<Metadata> {
    let crs = Crs::from_authority_code("EPSG:4326".to_string());
    Arc::new(Metadata::new(crs, None))
}

/// Trait for converting collections of [`TileId`]s to Arrow arrays.
///
/// Implemented for `[TileId]` and `Vec<TileId>`.
pub trait TilesToArrow {
    /// Converts tile centres to an Arrow PointArray.
    fn to_arrow_points(&self) -> PointArray;
    /// Converts tile outlines to an Arrow PolygonArray.
    fn to_arrow_polygons(&self) -> PolygonArray;
    /// Converts tiles to a RecordBatch with tile_id, z, x, y, quadkey and geometry.
    fn to_record_batch(&self) -> Result<RecordBatch, MercantileError>;
}

impl TilesToArrow for [TileId] {
    fn to_arrow_points(&self) -> PointArray {
        let point = PointType::new(Dimension::XY, wgs84_metadata());
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for tile in self {
            builder.push_point(Some(&tile.center()));
        }
        builder.finish()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        let poly = PolygonType::new(Dimension::XY, wgs84_metadata());
        let polygons: Vec<_> = self.par_iter().map(|t: &TileId| t.to_polygon()).collect();
        PolygonBuilder::from_polygons(&polygons, poly).finish()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, MercantileError> {
        let polygon_array = self.to_arrow_polygons();
        let ids: StringArray = self.iter().map(|t| Some(t.to_string())).collect();
        let zooms: UInt8Array = self.iter().map(|t| Some(t.z)).collect();
        let xs: Int64Array = self.iter().map(|t| Some(t.x)).collect();
        let ys: Int64Array = self.iter().map(|t| Some(t.y)).collect();
        let quadkeys: StringArray = self.iter().map(|t| Some(t.quadkey())).collect();

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("tile_id", DataType::Utf8, false),
            Field::new("z", DataType::UInt8, false),
            Field::new("x", DataType::Int64, false),
            Field::new("y", DataType::Int64, false),
            Field::new("quadkey", DataType::Utf8, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(ids),
                Arc::new(zooms),
                Arc::new(xs),
                Arc::new(ys),
                Arc::new(quadkeys),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| MercantileError::IoError(e.to_string()))
    }
}

impl TilesToArrow for Vec<TileId> {
    fn to_arrow_points(&self) -> PointArray {
        self.as_slice().to_arrow_points()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        self.as_slice().to_arrow_polygons()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, MercantileError> {
        self.as_slice().to_record_batch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::Array;
    use geoarrow_array::GeoArrowArray;

    #[test]
    fn test_tiles_to_arrow_points() -> Result<(), MercantileError> {
        let tiles = TileId::new(0, 0, 0).children()?.to_vec();
        let point_array = tiles.to_arrow_points();
        assert_eq!(point_array.len(), 4);
        Ok(())
    }

    #[test]
    fn test_tiles_to_arrow_polygons() {
        let tiles = vec![TileId::new(256, 387, 10), TileId::new(257, 387, 10)];
        let polygon_array = tiles.to_arrow_polygons();
        assert_eq!(polygon_array.len(), 2);
    }

    #[test]
    fn test_tiles_to_record_batch() -> Result<(), MercantileError> {
        let tiles = vec![TileId::new(486, 332, 10), TileId::new(0, 0, 0)];
        let batch = tiles.to_record_batch()?;

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 6);

        let quadkeys = batch
            .column(4)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| MercantileError::IoError("quadkey column".to_string()))?;
        assert_eq!(quadkeys.value(0), "0313102310");
        assert_eq!(quadkeys.value(1), "");
        Ok(())
    }

    #[test]
    fn test_single_tile_record_batch() -> Result<(), MercantileError> {
        let batch = TileId::new(1, 1, 1).to_record_batch()?;
        assert_eq!(batch.num_rows(), 1);
        Ok(())
    }
}
