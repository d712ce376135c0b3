use super::constants::{HEX_HEIGHT, HEX_WIDTH, HORIZONTAL_SPACING_RATIO, VERTICAL_SPACING_RATIO};
use derive_more::Display;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Grid coordinates in the offset hex layout (odd columns sit half a row lower)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[display("({q}, {r})")]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn is_even_column(&self) -> bool {
        self.q % 2 == 0
    }

    /// Raw `(dq, dr)` step from `self` to `other`, used as a direction vector
    pub fn step_to(&self, other: HexCoord) -> DVec2 {
        DVec2::new((other.q - self.q) as f64, (other.r - self.r) as f64)
    }
}

const EVEN_COLUMN_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (0, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];
const ODD_COLUMN_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (0, 1), (-1, 1), (-1, 0), (0, -1), (1, 1)];

/// Pixel position of a hex center for tiles scaled by `scale`
pub fn hex_center(coord: HexCoord, scale: f64) -> DVec2 {
    let hex_width = HEX_WIDTH * scale;
    let hex_height = HEX_HEIGHT * scale;
    let h_spacing = hex_width * HORIZONTAL_SPACING_RATIO;
    let v_spacing = hex_height * VERTICAL_SPACING_RATIO;
    let column_shift = coord.q.rem_euclid(2) as f64 * v_spacing / 2.0;

    DVec2::new(
        h_spacing * coord.q as f64 + hex_width / 2.0,
        v_spacing * coord.r as f64 + column_shift + hex_height / 2.0,
    )
}

/// Approximate inverse of [`hex_center`]. Rounds to the nearest column and
/// then the nearest row within it, so points close to a hex edge can land in
/// the neighbouring tile. The result may lie outside the grid.
pub fn pixel_to_hex(point: DVec2, scale: f64) -> HexCoord {
    let hex_width = HEX_WIDTH * scale;
    let hex_height = HEX_HEIGHT * scale;
    let h_spacing = hex_width * HORIZONTAL_SPACING_RATIO;
    let v_spacing = hex_height * VERTICAL_SPACING_RATIO;

    let q = ((point.x - hex_width / 2.0) / h_spacing).round() as i32;
    let column_shift = q.rem_euclid(2) as f64 * v_spacing / 2.0;
    let r = ((point.y - hex_height / 2.0 - column_shift) / v_spacing).round() as i32;
    HexCoord::new(q, r)
}

/// In-bounds neighbours of `coord`, in direction-table order
pub fn neighbors(coord: HexCoord, width: u32, height: u32) -> Vec<HexCoord> {
    let directions = if coord.is_even_column() {
        &EVEN_COLUMN_DIRECTIONS
    } else {
        &ODD_COLUMN_DIRECTIONS
    };

    directions
        .iter()
        .map(|&(dq, dr)| HexCoord::new(coord.q + dq, coord.r + dr))
        .filter(|n| n.q >= 0 && n.r >= 0 && (n.q as u32) < width && (n.r as u32) < height)
        .collect()
}

/// Axial distance formula applied to grid coordinates. Not an exact metric
/// for the offset layout, but it is what every progress heuristic uses.
pub fn hex_distance(a: HexCoord, b: HexCoord) -> i32 {
    let dq = a.q - b.q;
    let dr = a.r - b.r;
    (dq.abs() + (dq + dr).abs() + dr.abs()) / 2
}
