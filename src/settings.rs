use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::constants::*;
use crate::error::ConfigError;
use crate::world::generator::TerrainParams;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WorldSettings {
    pub stream: StreamSettings,
    #[serde(default)]
    pub terrain: TerrainSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StreamSettings {
    /// Chebyshev radius (chunks) of the set kept queued/generating/live.
    pub load_radius: i32,
    /// Live chunks further than this are evicted.
    pub unload_radius: i32,
    pub max_starts_per_tick: usize,
    pub max_finalizes_per_tick: usize,
    pub max_remesh_per_tick: usize,
    pub max_in_flight: usize,
    pub worker_count: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            load_radius: LOAD_RADIUS,
            unload_radius: UNLOAD_RADIUS,
            max_starts_per_tick: MAX_STARTS_PER_TICK,
            max_finalizes_per_tick: MAX_FINALIZES_PER_TICK,
            max_remesh_per_tick: MAX_REMESH_PER_TICK,
            max_in_flight: MAX_IN_FLIGHT,
            worker_count: num_cpus::get().saturating_sub(1).clamp(1, MAX_ASYNC_WORKERS),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TerrainSettings {
    pub seed: u32,
    pub frequency: f32,
    pub octaves: i32,
    pub lacunarity: f32,
    pub gain: f32,
    pub base_height: i32,
    pub amplitude: f32,
    pub trees: bool,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            frequency: NOISE_FREQUENCY,
            octaves: NOISE_OCTAVES,
            lacunarity: NOISE_LACUNARITY,
            gain: NOISE_GAIN,
            base_height: BASE_HEIGHT,
            amplitude: TERRAIN_AMPLITUDE,
            trees: true,
        }
    }
}

impl TerrainSettings {
    pub fn params(&self) -> TerrainParams {
        TerrainParams {
            seed: self.seed,
            frequency: self.frequency,
            octaves: self.octaves,
            lacunarity: self.lacunarity,
            gain: self.gain,
            base_height: self.base_height,
            amplitude: self.amplitude,
            trees: self.trees,
        }
    }
}

impl WorldSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.stream;
        if s.load_radius < 0 {
            return Err(ConfigError::NegativeRadius {
                name: "load_radius",
                value: s.load_radius,
            });
        }
        if s.unload_radius < s.load_radius {
            return Err(ConfigError::UnloadInsideLoad {
                load: s.load_radius,
                unload: s.unload_radius,
            });
        }
        for (name, value) in [
            ("max_starts_per_tick", s.max_starts_per_tick),
            ("max_finalizes_per_tick", s.max_finalizes_per_tick),
            ("max_remesh_per_tick", s.max_remesh_per_tick),
            ("max_in_flight", s.max_in_flight),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroBudget(name));
            }
        }
        if s.worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }

        let t = &self.terrain;
        if !(t.frequency.is_finite() && t.frequency > 0.0) {
            return Err(ConfigError::InvalidNoise("frequency must be positive"));
        }
        if t.octaves < 1 {
            return Err(ConfigError::InvalidNoise("octaves must be at least 1"));
        }
        if !t.lacunarity.is_finite() || !t.gain.is_finite() || !t.amplitude.is_finite() {
            return Err(ConfigError::InvalidNoise("tuning values must be finite"));
        }
        if !(1..CHUNK_SIZE_Y).contains(&t.base_height) {
            return Err(ConfigError::InvalidBaseHeight(t.base_height));
        }
        Ok(())
    }
}

pub fn save_settings(path: &Path, settings: &WorldSettings) -> Result<(), ConfigError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, settings)?;
    Ok(())
}

pub fn load_settings(path: &Path) -> Result<WorldSettings, ConfigError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let settings: WorldSettings = bincode::deserialize_from(&mut reader)?;
    settings.validate()?;
    Ok(settings)
}
