pub mod config;
pub mod errors;
pub mod labels;
pub mod map;
pub mod rng;
pub mod terrain;

// Re-export commonly used types
pub use config::GeneratorConfig;
pub use errors::{HexMapError, HexMapResult};
pub use map::{HexMap, MapGenerator};
pub use rng::Mulberry32;
pub use terrain::{HexCoord, TerrainGrid, TerrainType};
