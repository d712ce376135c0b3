use crate::errors::{HexMapError, HexMapResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod constants;
pub mod features;
pub mod field;
pub mod growth;
pub mod hex;
pub mod rivers;
pub mod roads;
pub mod smoothing;
pub mod water;

pub use hex::HexCoord;

/// Ordered sequence of grid coordinates produced by path growth
pub type HexPath = Vec<HexCoord>;

/// Every tile kind a map can contain. Declaration order is significant: the
/// terrain field builds its cumulative distribution in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainType {
    Water,
    Wetland,
    Plains,
    Forest,
    Mountain,
    Urban,
    Ruins,
    Snow,
    SnowMountain,
    Dune,
    Hills,
    SnowHills,
    Volcano,
    BadVolcano,
    SnowVolcano,
    BadMountain,
    WheatField,
}

impl TerrainType {
    pub const COUNT: usize = 17;

    pub const ALL: [TerrainType; Self::COUNT] = [
        TerrainType::Water,
        TerrainType::Wetland,
        TerrainType::Plains,
        TerrainType::Forest,
        TerrainType::Mountain,
        TerrainType::Urban,
        TerrainType::Ruins,
        TerrainType::Snow,
        TerrainType::SnowMountain,
        TerrainType::Dune,
        TerrainType::Hills,
        TerrainType::SnowHills,
        TerrainType::Volcano,
        TerrainType::BadVolcano,
        TerrainType::SnowVolcano,
        TerrainType::BadMountain,
        TerrainType::WheatField,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TerrainType::Water => "water",
            TerrainType::Wetland => "wetland",
            TerrainType::Plains => "plains",
            TerrainType::Forest => "forest",
            TerrainType::Mountain => "mountain",
            TerrainType::Urban => "urban",
            TerrainType::Ruins => "ruins",
            TerrainType::Snow => "snow",
            TerrainType::SnowMountain => "snowmountain",
            TerrainType::Dune => "dune",
            TerrainType::Hills => "hills",
            TerrainType::SnowHills => "snowhills",
            TerrainType::Volcano => "volcano",
            TerrainType::BadVolcano => "badvolcano",
            TerrainType::SnowVolcano => "snowvolcano",
            TerrainType::BadMountain => "badmountain",
            TerrainType::WheatField => "wheatfield",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_water(self) -> bool {
        self == TerrainType::Water
    }

    /// Wheatfields only appear around settlements, never from the random field
    pub fn is_field_generated(self) -> bool {
        self != TerrainType::WheatField
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerrainType {
    type Err = HexMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TerrainType::ALL
            .into_iter()
            .find(|terrain| terrain.name() == wanted)
            .ok_or_else(|| HexMapError::UnknownTerrain {
                name: s.to_string(),
            })
    }
}

/// Per-terrain values keyed by [`TerrainType`]; serialized as a map keyed by
/// lowercase terrain names so config files read naturally.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainTable<T> {
    entries: BTreeMap<TerrainType, T>,
}

impl<T> TerrainTable<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, terrain: TerrainType) -> Option<&T> {
        self.entries.get(&terrain)
    }

    pub fn insert(&mut self, terrain: TerrainType, value: T) -> Option<T> {
        self.entries.insert(terrain, value)
    }

    pub fn get_mut(&mut self, terrain: TerrainType) -> Option<&mut T> {
        self.entries.get_mut(&terrain)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (TerrainType, &T)> {
        self.entries.iter().map(|(terrain, value)| (*terrain, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TerrainTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(TerrainType, T)> for TerrainTable<T> {
    fn from_iter<I: IntoIterator<Item = (TerrainType, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T: Serialize> Serialize for TerrainTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(terrain, value)| (terrain.name(), value)))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TerrainTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, T>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(name, value)| {
                name.parse::<TerrainType>()
                    .map(|terrain| (terrain, value))
                    .map_err(D::Error::custom)
            })
            .collect()
    }
}

/// Terrain type per tile, stored row-major (`r` outer, `q` inner)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    pub width: u32,
    pub height: u32,
    cells: Vec<TerrainType>,
}

impl TerrainGrid {
    /// Wrap an existing row-major cell vector, checking it matches the dimensions
    pub fn new(width: u32, height: u32, cells: Vec<TerrainType>) -> HexMapResult<Self> {
        if width == 0 || height == 0 {
            return Err(HexMapError::InvalidGridSize { width, height });
        }

        let expected_size = width as usize * height as usize;
        if cells.len() != expected_size {
            return Err(HexMapError::InvalidConfig {
                reason: format!(
                    "Cell array size {} does not match grid dimensions {}x{} (expected {})",
                    cells.len(),
                    width,
                    height,
                    expected_size
                ),
            });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid with every tile set to one terrain, mostly useful for tests
    pub fn filled(width: u32, height: u32, terrain: TerrainType) -> HexMapResult<Self> {
        Self::new(width, height, vec![terrain; width as usize * height as usize])
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        coord.q >= 0 && coord.r >= 0 && (coord.q as u32) < self.width && (coord.r as u32) < self.height
    }

    fn index(&self, coord: HexCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.r as usize * self.width as usize + coord.q as usize)
    }

    pub fn get(&self, coord: HexCoord) -> Option<TerrainType> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Overwrite a tile; returns false (and does nothing) outside the grid
    pub fn set(&mut self, coord: HexCoord, terrain: TerrainType) -> bool {
        match self.index(coord) {
            Some(i) => {
                self.cells[i] = terrain;
                true
            }
            None => false,
        }
    }

    pub fn is_water(&self, coord: HexCoord) -> bool {
        self.get(coord).is_some_and(TerrainType::is_water)
    }

    pub fn cells(&self) -> &[TerrainType] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = HexCoord> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |r| (0..width).map(move |q| HexCoord::new(q, r)))
    }

    /// Coordinates of every tile of `terrain`, row-major
    pub fn positions_of(&self, terrain: TerrainType) -> Vec<HexCoord> {
        self.coords()
            .filter(|&coord| self.get(coord) == Some(terrain))
            .collect()
    }

    pub fn count(&self, terrain: TerrainType) -> usize {
        self.cells.iter().filter(|&&t| t == terrain).count()
    }
}
