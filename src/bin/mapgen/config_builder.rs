use hexmapper::config::{GeneratorConfig, apply_clustering_preset, terrain_preset};
use hexmapper::errors::{HexMapError, HexMapResult};
use tracing::info;

/// Layers command line overrides on top of a base configuration
pub struct ConfigBuilder {
    base: GeneratorConfig,
    preset: Option<String>,
    clustering: Option<String>,
    size: Option<(u32, u32)>,
    rivers: Option<u32>,
    roads: Option<u32>,
    river_length: Option<(u32, u32)>,
    scale: Option<f64>,
}

impl ConfigBuilder {
    pub fn new(base: GeneratorConfig) -> Self {
        Self {
            base,
            preset: None,
            clustering: None,
            size: None,
            rivers: None,
            roads: None,
            river_length: None,
            scale: None,
        }
    }

    pub fn preset(mut self, preset: Option<String>) -> Self {
        self.preset = preset;
        self
    }

    pub fn clustering(mut self, clustering: Option<String>) -> Self {
        self.clustering = clustering;
        self
    }

    pub fn size(mut self, size: Option<(u32, u32)>) -> Self {
        self.size = size;
        self
    }

    pub fn rivers(mut self, rivers: Option<u32>) -> Self {
        self.rivers = rivers;
        self
    }

    pub fn roads(mut self, roads: Option<u32>) -> Self {
        self.roads = roads;
        self
    }

    pub fn river_length(mut self, river_length: Option<(u32, u32)>) -> Self {
        self.river_length = river_length;
        self
    }

    pub fn scale(mut self, scale: Option<f64>) -> Self {
        self.scale = scale;
        self
    }

    pub fn build(self) -> HexMapResult<GeneratorConfig> {
        let mut config = self.base;

        // Presets replace percentages but keep the clustering already configured
        if let Some(name) = &self.preset {
            let mut mix = terrain_preset(name).ok_or_else(|| HexMapError::InvalidConfig {
                reason: format!(
                    "Unknown terrain preset: '{name}'. Available presets: balanced, water-heavy, forest-heavy"
                ),
            })?;
            for (terrain, settings) in config.terrain.iter() {
                if let Some(target) = mix.get_mut(terrain) {
                    target.clustering = settings.clustering;
                }
            }
            info!("Using terrain preset '{name}'");
            config.terrain = mix;
        }

        if let Some(name) = &self.clustering {
            if !apply_clustering_preset(&mut config.terrain, name) {
                return Err(HexMapError::InvalidConfig {
                    reason: format!("Unknown clustering preset: '{name}'. Available presets: none, normal"),
                });
            }
        }

        if let Some((width, height)) = self.size {
            config.width = width;
            config.height = height;
        }
        if let Some(count) = self.rivers {
            config.rivers.count = count;
        }
        if let Some(count) = self.roads {
            config.roads.count = count;
        }
        if let Some((min, max)) = self.river_length {
            config.rivers.min_length = min;
            config.rivers.max_length = max;
        }
        if let Some(scale) = self.scale {
            config.scale_factor = scale;
        }

        config.validate_all()?;
        Ok(config)
    }
}
