use crate::error::MercantileError;
use crate::index::projection::{bounds, locate_tile};
use crate::tile::TileId;
use geo_types::Point;
use std::collections::VecDeque;

/// Returns the (lng, lat) midpoint of a tile's bounding box.
pub fn center(tile: &TileId) -> Point<f64> {
    let bds = bounds(tile);
    Point::new((bds.w + bds.e) / 2.0, (bds.n + bds.s) / 2.0)
}

/// Returns the parent of a tile.
///
/// The parent is found by locating the tile's centre one zoom level up,
/// not by halving the indices, so edge cases follow the floating point
/// path of [`locate_tile`].
///
/// # Errors
///
/// [`MercantileError::InvalidZoomLevel`] for a zoom 0 tile, which has no parent.
pub fn parent(tile: &TileId) -> Result<TileId, MercantileError> {
    if tile.z == 0 {
        return Err(MercantileError::InvalidZoomLevel(tile.z));
    }
    let c = center(tile);
    Ok(locate_tile(c.x(), c.y(), tile.z - 1))
}

/// Returns the ancestor of a tile at a shallower zoom.
///
/// Walks [`parent`] one level at a time. Asking for the tile's own zoom
/// returns the tile itself.
pub fn ancestor(tile: &TileId, zoom: u8) -> Result<TileId, MercantileError> {
    if zoom > tile.z {
        return Err(MercantileError::InvalidZoomLevel(zoom));
    }
    let mut current = *tile;
    while current.z > zoom {
        current = parent(&current)?;
    }
    Ok(current)
}

/// Returns the four children of a tile one zoom level down.
///
/// Order is top-left, top-right, bottom-right, bottom-left.
///
/// # Errors
///
/// [`MercantileError::InvalidZoomLevel`] for a zoom 255 tile, and
/// [`MercantileError::IndexOverflow`] when the child indices do not fit an `i64`.
pub fn children(tile: &TileId) -> Result<[TileId; 4], MercantileError> {
    let z = tile
        .z
        .checked_add(1)
        .ok_or(MercantileError::InvalidZoomLevel(tile.z))?;
    let (x, y) = tile
        .x
        .checked_mul(2)
        .zip(tile.y.checked_mul(2))
        .ok_or(MercantileError::IndexOverflow(*tile))?;
    let (x1, y1) = x
        .checked_add(1)
        .zip(y.checked_add(1))
        .ok_or(MercantileError::IndexOverflow(*tile))?;
    Ok([
        TileId::new(x, y, z),
        TileId::new(x1, y, z),
        TileId::new(x1, y1, z),
        TileId::new(x, y1, z),
    ])
}

/// Returns every descendant of a tile at the target zoom.
///
/// Expansion is breadth first: tiles are taken from the front of the queue
/// and their [`children`] appended in four-way order, so the output order
/// is deterministic. The result holds `4^(zoom - tile.z)` tiles; bounding
/// the zoom delta is the caller's job.
///
/// # Errors
///
/// [`MercantileError::InvalidZoomLevel`] if `zoom` is shallower than the tile.
pub fn children_at_zoom(tile: &TileId, zoom: u8) -> Result<Vec<TileId>, MercantileError> {
    if zoom < tile.z {
        return Err(MercantileError::InvalidZoomLevel(zoom));
    }

    let mut queue = VecDeque::from([*tile]);
    while let Some(next) = queue.front() {
        if next.z >= zoom {
            break;
        }
        if let Some(t) = queue.pop_front() {
            queue.extend(children(&t)?);
        }
    }

    Ok(queue.into_iter().collect())
}
