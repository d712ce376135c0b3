use glam::{DVec2, IVec2};
use hexmapper::errors::HexMapResult;
use hexmapper::map::HexMap;
use hexmapper::terrain::TerrainType;
use hexmapper::terrain::hex::{hex_center, pixel_to_hex};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Tile scale of the preview raster; a hex is about 23 pixels wide
pub const PREVIEW_SCALE: f64 = 0.05;

const BACKGROUND: [u8; 4] = [20, 20, 24, 255];
const RIVER_COLOR: [u8; 4] = [70, 140, 230, 255];
const ROAD_COLOR: [u8; 4] = [120, 80, 40, 255];
const BRIDGE_COLOR: [u8; 4] = [240, 240, 240, 255];
const LABEL_COLOR: [u8; 4] = [255, 60, 60, 255];

fn terrain_color(terrain: TerrainType) -> [u8; 4] {
    let [r, g, b] = match terrain {
        TerrainType::Water => [40, 90, 170],
        TerrainType::Wetland => [90, 130, 110],
        TerrainType::Plains => [170, 200, 110],
        TerrainType::Forest => [40, 110, 50],
        TerrainType::Mountain => [130, 120, 110],
        TerrainType::Urban => [200, 70, 70],
        TerrainType::Ruins => [150, 110, 150],
        TerrainType::Snow => [235, 240, 245],
        TerrainType::SnowMountain => [200, 205, 215],
        TerrainType::Dune => [225, 200, 140],
        TerrainType::Hills => [150, 170, 90],
        TerrainType::SnowHills => [215, 225, 230],
        TerrainType::Volcano => [160, 50, 30],
        TerrainType::BadVolcano => [110, 30, 20],
        TerrainType::SnowVolcano => [190, 130, 130],
        TerrainType::BadMountain => [90, 80, 75],
        TerrainType::WheatField => [230, 200, 70],
    };
    [r, g, b, 255]
}

/// Rasterize a map: tiles filled by terrain, then rivers, roads, bridges and
/// label anchors on top. Paths are rescaled from the map's own tile scale.
pub fn render_preview(map: &HexMap, scale: f64) -> RgbaImage {
    let ratio = scale / map.scale;
    let (width, height) = map.pixel_size();
    let (width, height) = ((width * ratio).ceil() as u32, (height * ratio).ceil() as u32);
    let mut img = RgbaImage::new(width.max(1), height.max(1));

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let point = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
        let color = map
            .terrain
            .get(pixel_to_hex(point, scale))
            .map_or(BACKGROUND, terrain_color);
        *pixel = Rgba(color);
    }

    let to_pixel = |p: DVec2| (p * ratio).round().as_ivec2();

    for river in map.rivers.rivers() {
        draw_polyline(&mut img, river.points.iter().map(|&p| to_pixel(p)), RIVER_COLOR);
    }
    for road in &map.roads.polylines {
        draw_polyline(&mut img, road.iter().map(|&p| to_pixel(p)), ROAD_COLOR);
    }
    for &bridge in &map.roads.bridges {
        draw_disk(&mut img, hex_center(bridge, scale).round().as_ivec2(), 2, BRIDGE_COLOR);
    }
    for label in &map.labels {
        draw_disk(&mut img, to_pixel(label.anchor), 1, LABEL_COLOR);
    }

    img
}

pub fn write_preview(map: &HexMap, path: &Path, scale: f64) -> HexMapResult<()> {
    render_preview(map, scale).save(path)?;
    Ok(())
}

fn draw_polyline(img: &mut RgbaImage, points: impl Iterator<Item = IVec2>, color: [u8; 4]) {
    let points: Vec<IVec2> = points.collect();
    for segment in points.windows(2) {
        draw_line(img, segment[0], segment[1], color);
    }
}

// Bresenham
fn draw_line(img: &mut RgbaImage, a: IVec2, b: IVec2, color: [u8; 4]) {
    let (mut x0, mut y0) = (a.x, a.y);
    let (x1, y1) = (b.x, b.y);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_disk(img: &mut RgbaImage, c: IVec2, r: i32, color: [u8; 4]) {
    for y in (c.y - r)..=(c.y + r) {
        for x in (c.x - r)..=(c.x + r) {
            let (dx, dy) = (x - c.x, y - c.y);
            if dx * dx + dy * dy <= r * r {
                put(img, x, y, color);
            }
        }
    }
}

fn put(img: &mut RgbaImage, x: i32, y: i32, color: [u8; 4]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgba(color));
    }
}
