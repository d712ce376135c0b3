pub mod range_types;

pub use range_types::*;

use crate::errors::{HexMapError, HexMapResult};
use crate::terrain::{TerrainTable, TerrainType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use validator::Validate;

/// Target share and clustering strength for one terrain type
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TerrainSettings {
    pub percentage: Percentage,
    #[serde(default)]
    pub clustering: ClusteringFactor,
}

impl TerrainSettings {
    pub fn new(percentage: u32, clustering: f64) -> Self {
        Self {
            percentage: Percentage::new(percentage),
            clustering: ClusteringFactor::new(clustering),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RiverSettings {
    #[validate(range(max = 100))]
    pub count: u32,
    #[validate(range(min = 1, max = 500))]
    pub min_length: u32,
    #[validate(range(min = 2, max = 500))]
    pub max_length: u32,
    pub curvature: Curvature,
    pub segments: SegmentCount,
}

impl Default for RiverSettings {
    fn default() -> Self {
        Self {
            count: 3,
            min_length: 4,
            max_length: 30,
            curvature: Curvature::new(80.0),
            segments: SegmentCount::new(4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RoadSettings {
    /// Desired total number of roads; anything beyond the spanning backbone
    /// is added as extra random connections
    #[validate(range(max = 200))]
    pub count: u32,
    pub curvature: Curvature,
    pub segments: SegmentCount,
    /// Width in pixels of the window a road's sideways offset is drawn from
    #[validate(range(min = 0.0, max = 200.0))]
    pub offset_range: f64,
}

impl Default for RoadSettings {
    fn default() -> Self {
        Self {
            count: 6,
            curvature: Curvature::new(40.0),
            segments: SegmentCount::new(3),
            offset_range: 20.0,
        }
    }
}

/// How often a terrain gets a label and what the label can say
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LabelSettings {
    pub chance: LabelChance,
    #[validate(range(min = 1, max = 400))]
    pub size: u32,
    pub color: String,
    pub names: Vec<String>,
    pub keywords: Vec<String>,
    pub keyword_weights: Vec<u32>,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            chance: LabelChance::default(),
            size: 48,
            color: "#f4e4c1".to_string(),
            names: Vec::new(),
            keywords: Vec::new(),
            keyword_weights: Vec::new(),
        }
    }
}

impl LabelSettings {
    fn with_words(chance: f64, size: u32, color: &str, names: &[&str], keywords: &[(&str, u32)]) -> Self {
        Self {
            chance: LabelChance::new(chance),
            size,
            color: color.to_string(),
            names: names.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|(k, _)| k.to_string()).collect(),
            keyword_weights: keywords.iter().map(|(_, w)| *w).collect(),
        }
    }

    /// Keyword weights, or all ones when the weight list does not line up
    /// with the keyword list
    pub fn effective_weights(&self) -> Vec<u32> {
        if self.keyword_weights.len() == self.keywords.len() {
            self.keyword_weights.clone()
        } else {
            vec![1; self.keywords.len()]
        }
    }
}

/// Everything a map generation run needs besides the seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GeneratorConfig {
    #[validate(range(min = 1, max = 512))]
    pub width: u32,
    #[validate(range(min = 1, max = 512))]
    pub height: u32,
    /// Tile scale used for river pixel paths
    #[validate(range(min = 0.01, max = 10.0))]
    pub scale_factor: f64,
    pub terrain: TerrainTable<TerrainSettings>,
    pub rivers: RiverSettings,
    pub roads: RoadSettings,
    pub labels: TerrainTable<LabelSettings>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let mut terrain = terrain_preset("balanced").unwrap_or_default();
        apply_clustering_preset(&mut terrain, "normal");

        Self {
            width: 20,
            height: 15,
            scale_factor: 1.0,
            terrain,
            rivers: RiverSettings::default(),
            roads: RoadSettings::default(),
            labels: default_labels(),
        }
    }
}

impl GeneratorConfig {
    /// Run field validators and the cross-field rules they cannot express
    pub fn validate_all(&self) -> HexMapResult<()> {
        let invalid = |e: validator::ValidationErrors| HexMapError::InvalidConfig {
            reason: e.to_string(),
        };

        self.validate().map_err(invalid)?;
        self.rivers.validate().map_err(invalid)?;
        self.roads.validate().map_err(invalid)?;
        for (_, label) in self.labels.iter() {
            label.validate().map_err(invalid)?;
        }

        if self.rivers.min_length > self.rivers.max_length {
            return Err(HexMapError::InvalidConfig {
                reason: format!(
                    "River min_length {} exceeds max_length {}",
                    self.rivers.min_length, self.rivers.max_length
                ),
            });
        }

        if let Some(settings) = self.terrain.get(TerrainType::WheatField) {
            if settings.percentage.get() > 0 {
                return Err(HexMapError::InvalidConfig {
                    reason: "wheatfield is placed around settlements and cannot have a percentage"
                        .to_string(),
                });
            }
        }

        let total = self.percentage_total();
        if total != 100 {
            return Err(HexMapError::InvalidConfig {
                reason: format!("Terrain percentages must total 100, got {total}"),
            });
        }

        Ok(())
    }

    pub fn percentage_total(&self) -> u32 {
        self.terrain
            .iter()
            .map(|(_, settings)| settings.percentage.get())
            .sum()
    }
}

/// Named terrain mixes. Names are matched case-insensitively and ignore
/// `-`/`_`, so `water-heavy`, `water_heavy` and `waterHeavy` are the same.
pub fn terrain_preset(name: &str) -> Option<TerrainTable<TerrainSettings>> {
    let mix: [u32; 7] = match normalize_preset_name(name).as_str() {
        "balanced" => [20, 10, 30, 25, 10, 5, 0],
        "waterheavy" => [50, 10, 15, 10, 10, 5, 0],
        "forestheavy" => [10, 5, 20, 50, 10, 5, 0],
        _ => return None,
    };

    let classic = [
        TerrainType::Water,
        TerrainType::Wetland,
        TerrainType::Plains,
        TerrainType::Forest,
        TerrainType::Mountain,
        TerrainType::Urban,
        TerrainType::Ruins,
    ];

    Some(
        TerrainType::ALL
            .into_iter()
            .filter(|terrain| terrain.is_field_generated())
            .map(|terrain| {
                let percentage = classic
                    .iter()
                    .position(|&c| c == terrain)
                    .map_or(0, |i| mix[i]);
                (terrain, TerrainSettings::new(percentage, 0.0))
            })
            .collect(),
    )
}

/// Overwrite clustering coefficients with a named preset (`none` or `normal`).
/// Returns false for an unknown preset name.
pub fn apply_clustering_preset(table: &mut TerrainTable<TerrainSettings>, name: &str) -> bool {
    let factors: &[(TerrainType, f64)] = match normalize_preset_name(name).as_str() {
        "none" => &[],
        "normal" | "normalclustering" => &[
            (TerrainType::Water, 1.5),
            (TerrainType::Wetland, 0.3),
            (TerrainType::Plains, 0.3),
            (TerrainType::Forest, 0.3),
            (TerrainType::Mountain, 1.5),
            (TerrainType::Urban, 0.1),
            (TerrainType::Ruins, 0.1),
        ],
        _ => return false,
    };

    for terrain in TerrainType::ALL {
        if let Some(settings) = table.get_mut(terrain) {
            let factor = factors
                .iter()
                .find(|(t, _)| *t == terrain)
                .map_or(0.0, |(_, f)| *f);
            settings.clustering = ClusteringFactor::new(factor);
        }
    }
    true
}

fn normalize_preset_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn default_labels() -> TerrainTable<LabelSettings> {
    [
        (
            TerrainType::Urban,
            LabelSettings::with_words(
                40.0,
                64,
                "#f4e4c1",
                &["Highmere", "Dunwick", "Ashford", "Caer Lind", "Saltmarsh", "Eastwatch"],
                &[("Market", 3), ("Walled", 2), ("Harbor", 1), ("Old", 2), ("Free City", 1)],
            ),
        ),
        (
            TerrainType::Forest,
            LabelSettings::with_words(
                4.0,
                48,
                "#c8e6b0",
                &["Greywood", "The Tangle", "Elderholt", "Mirkwald"],
                &[("Ancient", 3), ("Haunted", 1), ("Deep", 2), ("Whispering", 1)],
            ),
        ),
        (
            TerrainType::Mountain,
            LabelSettings::with_words(
                6.0,
                52,
                "#e0e0e0",
                &["Stormcrown", "The Teeth", "Karak Dun", "Irongate Peaks"],
                &[("Jagged", 2), ("Dwarven", 1), ("Frozen", 1), ("Forbidden", 1)],
            ),
        ),
        (
            TerrainType::Water,
            LabelSettings::with_words(
                3.0,
                56,
                "#bfe3ff",
                &["Mirror Lake", "The Shallows", "Sea of Reeds"],
                &[("Calm", 2), ("Misty", 2), ("Cursed", 1)],
            ),
        ),
        (
            TerrainType::Ruins,
            LabelSettings::with_words(
                50.0,
                44,
                "#d9c2a3",
                &["Fallen Keep", "Old Tor", "The Broken Tower"],
                &[("Forgotten", 3), ("Haunted", 2), ("Sunken", 1)],
            ),
        ),
    ]
    .into_iter()
    .collect()
}

/// Default config file location, `<config dir>/hexmapper/config.toml`
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("hexmapper");
        fs::create_dir_all(&path).ok()?;
        path.push("config.toml");
        Some(path)
    })
}

/// Load the config from the default location, falling back to defaults when
/// the file is missing or unreadable
pub fn load_config() -> GeneratorConfig {
    if let Some(config_path) = get_config_path() {
        if config_path.exists() {
            match load_config_from(&config_path) {
                Ok(config) => return config,
                Err(e) => warn!("Ignoring config at {}: {e}", config_path.display()),
            }
        }
    }
    GeneratorConfig::default()
}

pub fn load_config_from(path: &Path) -> HexMapResult<GeneratorConfig> {
    if !path.exists() {
        return Err(HexMapError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str::<GeneratorConfig>(&contents)?)
}

/// Write the config to the default location and return where it went
pub fn save_config(config: &GeneratorConfig) -> HexMapResult<PathBuf> {
    let config_path = get_config_path().ok_or(HexMapError::ConfigDirNotFound)?;
    save_config_to(config, &config_path)?;
    Ok(config_path)
}

pub fn save_config_to(config: &GeneratorConfig, path: &Path) -> HexMapResult<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        config
            .validate_all()
            .expect("Default config should pass validation");
        assert_eq!(config.percentage_total(), 100);
        assert_eq!(
            config.terrain.get(TerrainType::Water).map(|s| s.clustering.get()),
            Some(1.5)
        );
    }

    #[test]
    fn test_terrain_presets() {
        for name in ["balanced", "water-heavy", "waterHeavy", "forest_heavy"] {
            let preset = terrain_preset(name).expect("Preset should exist");
            let total: u32 = preset.iter().map(|(_, s)| s.percentage.get()).sum();
            assert_eq!(total, 100, "{name} should total 100");
            assert!(preset.get(TerrainType::WheatField).is_none());
            assert_eq!(preset.len(), TerrainType::COUNT - 1);
        }

        let water_heavy = terrain_preset("waterheavy").unwrap();
        assert_eq!(
            water_heavy.get(TerrainType::Water).map(|s| s.percentage.get()),
            Some(50)
        );
        assert!(terrain_preset("volcanic").is_none());
    }

    #[test]
    fn test_clustering_presets() {
        let mut table = terrain_preset("balanced").unwrap();
        assert!(apply_clustering_preset(&mut table, "normal"));
        assert_eq!(table.get(TerrainType::Mountain).unwrap().clustering.get(), 1.5);
        assert_eq!(table.get(TerrainType::Urban).unwrap().clustering.get(), 0.1);
        assert_eq!(table.get(TerrainType::Snow).unwrap().clustering.get(), 0.0);

        assert!(apply_clustering_preset(&mut table, "none"));
        assert!(table.iter().all(|(_, s)| s.clustering.get() == 0.0));

        assert!(!apply_clustering_preset(&mut table, "extreme"));
    }

    #[test]
    fn test_percentage_total_must_be_100() {
        let mut config = GeneratorConfig::default();
        config
            .terrain
            .insert(TerrainType::Water, TerrainSettings::new(90, 0.0));
        assert!(matches!(
            config.validate_all(),
            Err(HexMapError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_wheatfield_percentage_rejected() {
        let mut config = GeneratorConfig::default();
        config
            .terrain
            .insert(TerrainType::Plains, TerrainSettings::new(25, 0.3));
        config
            .terrain
            .insert(TerrainType::WheatField, TerrainSettings::new(5, 0.0));
        assert_eq!(config.percentage_total(), 100);
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_river_length_order() {
        let mut config = GeneratorConfig::default();
        config.rivers.min_length = 40;
        config.rivers.max_length = 10;
        assert!(config.validate_all().is_err());

        config.rivers.max_length = 600;
        config.rivers.min_length = 4;
        assert!(config.validate_all().is_err(), "max_length above range");
    }

    #[test]
    fn test_effective_weights_fallback() {
        let mut labels = LabelSettings::default();
        labels.keywords = vec!["Old".to_string(), "Grand".to_string()];
        labels.keyword_weights = vec![5];
        assert_eq!(labels.effective_weights(), vec![1, 1]);

        labels.keyword_weights = vec![5, 2];
        assert_eq!(labels.effective_weights(), vec![5, 2]);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            width = 8
            height = 6

            [rivers]
            count = 1

            [terrain.water]
            percentage = 100
            "#,
        )
        .expect("Partial config should parse");

        assert_eq!(config.width, 8);
        assert_eq!(config.rivers.count, 1);
        assert_eq!(config.rivers.max_length, RiverSettings::default().max_length);
        assert_eq!(config.terrain.len(), 1);
        assert_eq!(config.percentage_total(), 100);
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_out_of_range_toml_values_are_clamped() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            [rivers]
            curvature = -50.0
            segments = 4000000000

            [roads]
            segments = 0

            [terrain.water]
            percentage = 100
            clustering = 1000.0

            [labels.urban]
            chance = 250.0
            names = ["Anvil"]
            "#,
        )
        .expect("Out-of-range values still parse");

        assert_eq!(config.rivers.curvature.get(), 0.0);
        assert_eq!(config.rivers.segments.get(), 32);
        assert_eq!(config.roads.segments.get(), 1);
        let water = config.terrain.get(TerrainType::Water).unwrap();
        assert_eq!(water.clustering.get(), 10.0);
        assert_eq!(config.labels.get(TerrainType::Urban).unwrap().chance.get(), 100.0);
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("hexmapper-test-{}.toml", std::process::id()));
        let mut config = GeneratorConfig::default();
        config.width = 33;
        config.roads.count = 2;

        save_config_to(&config, &path).expect("Config should save");
        let loaded = load_config_from(&path).expect("Config should load");
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/definitely/not/here/hexmapper.toml");
        assert!(matches!(
            load_config_from(path),
            Err(HexMapError::ConfigFileNotFound { .. })
        ));
    }
}
