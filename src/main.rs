use log::info;
use mercantile_rs::{MercantileError, TileId};

fn main() -> Result<(), MercantileError> {
    env_logger::init();

    let lon = -90.0;
    let lat = 40.0;

    let tile = TileId::from_lnglat(&(lon, lat), 10);
    info!("Located ({}, {}) at zoom {}", lon, lat, tile.z);

    println!("Tile: {}", tile);
    println!("Quadkey: {}", tile.quadkey());
    println!("Filename: {}", tile.filename());
    println!("Token: {}", tile.token());
    println!("Bounds: {:?}", tile.bounds());
    println!("Parent: {}", tile.parent()?);

    for child in tile.children()? {
        println!("Child: {}", child);
    }

    println!("Polygon: {:?}", tile.to_polygon());

    Ok(())
}
