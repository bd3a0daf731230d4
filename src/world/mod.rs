//! World generation and management modules
//! Contains terrain generation, background loading, and the streaming world state.

pub mod collapse;
pub mod generator;
pub mod loader;
pub mod manager;

// Re-export commonly used types
pub use collapse::FallingBlock;
pub use generator::{ChunkGenerator, TerrainParams};
pub use loader::{ChunkJob, ChunkLoader, GeneratedChunk};
pub use manager::{StreamState, TickReport, World, WorldStats};

#[cfg(test)]
pub(crate) mod testing {
    use std::thread;
    use std::time::Duration;

    use crate::settings::{StreamSettings, TerrainSettings, WorldSettings};
    use crate::world::manager::World;

    pub(crate) fn test_world(load: i32, unload: i32, terrain: TerrainSettings) -> World {
        let settings = WorldSettings {
            stream: StreamSettings {
                load_radius: load,
                unload_radius: unload,
                worker_count: 2,
                ..StreamSettings::default()
            },
            terrain,
        };
        World::new(settings).unwrap()
    }

    pub(crate) fn flat_terrain() -> TerrainSettings {
        TerrainSettings {
            amplitude: 0.0,
            trees: false,
            ..TerrainSettings::default()
        }
    }

    /// Ticks until nothing is pending.
    pub(crate) fn settle(world: &mut World) {
        for _ in 0..10_000 {
            world.tick();
            if world.is_settled() {
                return;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("world did not settle: {:?}", world.stats());
    }
}
