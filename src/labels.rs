use crate::config::LabelSettings;
use crate::rng::Mulberry32;
use crate::terrain::constants::{KEYWORD_POSITION_CHANCES, MAX_LABEL_KEYWORDS};
use crate::terrain::hex::hex_center;
use crate::terrain::{HexCoord, TerrainGrid, TerrainTable, TerrainType};
use glam::DVec2;

/// A name placed on the map over one tile
#[derive(Debug, Clone, PartialEq)]
pub struct MapLabel {
    pub coord: HexCoord,
    pub terrain: TerrainType,
    /// Pixel position of the tile center
    pub anchor: DVec2,
    pub name: String,
    pub keywords: Vec<String>,
    pub size: u32,
    pub color: String,
}

impl MapLabel {
    /// Keywords joined for a subtitle line, e.g. `Ancient • Haunted`
    pub fn subtitle(&self) -> String {
        self.keywords.join(" \u{2022} ")
    }
}

/// Up to `count` (at most five) distinct keywords. Each round draws one
/// keyword by weight and then keeps it only if a second draw passes the
/// chance for that position; a failed check ends the selection.
pub fn pick_keywords(settings: &LabelSettings, count: usize, rng: &mut Mulberry32) -> Vec<String> {
    let mut pool: Vec<(&str, u32)> = settings
        .keywords
        .iter()
        .map(String::as_str)
        .zip(settings.effective_weights())
        .collect();
    let mut picked = Vec::new();

    for position_chance in KEYWORD_POSITION_CHANCES.iter().take(count.min(MAX_LABEL_KEYWORDS)) {
        if pool.is_empty() {
            break;
        }

        let total: f64 = pool.iter().map(|&(_, w)| w as f64).sum();
        let mut roll = rng.next_f64() * total;
        let mut index = 0;
        while index + 1 < pool.len() && roll > pool[index].1 as f64 {
            roll -= pool[index].1 as f64;
            index += 1;
        }

        if rng.next_f64() > position_chance / 100.0 {
            break;
        }
        picked.push(pool.remove(index).0.to_string());
    }

    picked
}

/// Visit tiles row-major and label those whose terrain has names configured,
/// each with probability `chance` percent.
pub fn place_labels(
    grid: &TerrainGrid,
    labels: &TerrainTable<LabelSettings>,
    rng: &mut Mulberry32,
    scale: f64,
) -> Vec<MapLabel> {
    let mut placed = Vec::new();

    for coord in grid.coords() {
        let Some(terrain) = grid.get(coord) else {
            continue;
        };
        let Some(settings) = labels.get(terrain) else {
            continue;
        };
        if settings.names.is_empty() || rng.next_f64() * 100.0 > settings.chance.get() {
            continue;
        }

        let name = settings.names[rng.below(settings.names.len())].clone();
        let keyword_count = (rng.next_f64().powi(2) * 4.0).floor() as usize + 1;
        let keywords = pick_keywords(settings, keyword_count, rng);

        placed.push(MapLabel {
            coord,
            terrain,
            anchor: hex_center(coord, scale),
            name,
            keywords,
            size: settings.size,
            color: settings.color.clone(),
        });
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelChance;

    fn label_settings(chance: f64, names: &[&str], keywords: &[&str]) -> LabelSettings {
        LabelSettings {
            chance: LabelChance::new(chance),
            names: names.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            keyword_weights: vec![1; keywords.len()],
            ..LabelSettings::default()
        }
    }

    #[test]
    fn test_keywords_are_distinct_and_bounded() {
        let settings = label_settings(100.0, &["X"], &["a", "b", "c", "d", "e", "f", "g"]);
        for seed in 0..100 {
            let mut rng = Mulberry32::new(seed);
            let picked = pick_keywords(&settings, 10, &mut rng);
            assert!(!picked.is_empty(), "first position always passes");
            assert!(picked.len() <= MAX_LABEL_KEYWORDS);

            let mut sorted = picked.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), picked.len());
        }
    }

    #[test]
    fn test_keywords_respect_count_and_pool() {
        let settings = label_settings(100.0, &["X"], &["only"]);
        let mut rng = Mulberry32::new(3);
        assert_eq!(pick_keywords(&settings, 4, &mut rng), vec!["only".to_string()]);

        let empty = label_settings(100.0, &["X"], &[]);
        assert!(pick_keywords(&empty, 3, &mut rng).is_empty());

        let many = label_settings(100.0, &["X"], &["a", "b", "c"]);
        assert_eq!(pick_keywords(&many, 1, &mut rng).len(), 1);
    }

    #[test]
    fn test_zero_weight_keyword_is_skipped_by_draw() {
        let mut settings = label_settings(100.0, &["X"], &["never", "always"]);
        settings.keyword_weights = vec![0, 5];
        for seed in 0..30 {
            let mut rng = Mulberry32::new(seed);
            let picked = pick_keywords(&settings, 1, &mut rng);
            assert_eq!(picked, vec!["always".to_string()]);
        }
    }

    #[test]
    fn test_place_labels_certain_and_never() {
        let mut grid = TerrainGrid::filled(6, 4, TerrainType::Forest).unwrap();
        grid.set(HexCoord::new(2, 1), TerrainType::Urban);

        let labels: TerrainTable<LabelSettings> = [
            (TerrainType::Urban, label_settings(100.0, &["Townsville"], &["Market"])),
            (TerrainType::Forest, label_settings(0.0, &["Greenwood"], &[])),
        ]
        .into_iter()
        .collect();

        let mut rng = Mulberry32::new(12);
        let placed = place_labels(&grid, &labels, &mut rng, 1.0);

        assert!(placed.iter().all(|l| l.terrain == TerrainType::Urban));
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].name, "Townsville");
        assert_eq!(placed[0].keywords, vec!["Market".to_string()]);
        assert_eq!(placed[0].anchor, hex_center(HexCoord::new(2, 1), 1.0));
        assert_eq!(placed[0].subtitle(), "Market");
    }

    #[test]
    fn test_terrain_without_names_draws_nothing() {
        let grid = TerrainGrid::filled(5, 5, TerrainType::Plains).unwrap();
        let labels: TerrainTable<LabelSettings> =
            [(TerrainType::Plains, label_settings(100.0, &[], &["x"]))].into_iter().collect();

        let mut rng = Mulberry32::new(8);
        assert!(place_labels(&grid, &labels, &mut rng, 1.0).is_empty());
        assert_eq!(rng, Mulberry32::new(8));
    }

    #[test]
    fn test_subtitle_join() {
        let label = MapLabel {
            coord: HexCoord::new(0, 0),
            terrain: TerrainType::Ruins,
            anchor: DVec2::ZERO,
            name: "Old Tor".to_string(),
            keywords: vec!["Haunted".to_string(), "Sunken".to_string()],
            size: 40,
            color: "#ffffff".to_string(),
        };
        assert_eq!(label.subtitle(), "Haunted \u{2022} Sunken");
    }
}
