/// Constants for hex map generation

/// Hex tile artwork size in pixels at scale 1.0
pub const HEX_WIDTH: f64 = 466.0;
pub const HEX_HEIGHT: f64 = 405.0;
pub const HORIZONTAL_SPACING_RATIO: f64 = 0.75;
pub const VERTICAL_SPACING_RATIO: f64 = 0.866; // sin(60°)

/// Mountain range carving
pub const MOUNTAIN_RANGE_MIN_LENGTH: usize = 5;
pub const MOUNTAIN_RANGE_LENGTH_SPREAD: usize = 5;
pub const MAX_MOUNTAIN_RANGES: usize = 2;

/// Wheatfields around settlements
pub const WHEATFIELD_CHANCE: f64 = 0.7;
pub const MAX_WHEATFIELDS_PER_SETTLEMENT: usize = 7;

/// River growth
pub const MEANDER_HISTORY: usize = 3;
pub const RIVER_PLAINS_WEIGHT: f64 = 3.0;
pub const RIVER_LAND_WEIGHT: f64 = 1.5;
pub const RIVER_MIN_PROGRESS_WEIGHT: f64 = 0.1;

/// Road growth
pub const ROAD_MAX_STEPS: usize = 800;
pub const ROAD_MAX_LENGTH: usize = 400;
pub const ROAD_SNAP_DISTANCE: i32 = 2;
pub const ROAD_PLAINS_WEIGHT: f64 = 2.0;
pub const ROAD_FOREST_WEIGHT: f64 = 1.5;
pub const ROAD_MOUNTAIN_WEIGHT: f64 = 0.1;
pub const MST_ATTEMPTS_PER_SETTLEMENT: usize = 20;
pub const EXTRA_ROAD_ATTEMPTS_PER_SETTLEMENT: usize = 10;

/// Labels
pub const MAX_LABEL_KEYWORDS: usize = 5;
pub const KEYWORD_POSITION_CHANCES: [f64; MAX_LABEL_KEYWORDS] = [100.0, 50.0, 30.0, 10.0, 5.0];
