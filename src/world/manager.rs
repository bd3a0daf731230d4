//! Chunk streaming around an observer.
//!
//! `World` is owned by a single control loop. Each `tick` runs, in order:
//! drain worker results, update the desired set (evict, cancel, enqueue),
//! dispatch queued coordinates, admit finished chunks, then work through
//! deferred neighbor remeshes. Every phase has its own per-tick budget.

use std::collections::{BTreeSet, VecDeque};

use glam::{IVec3, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::{BlockSource, Chunk, ChunkCoord};
use crate::error::ConfigError;
use crate::settings::{StreamSettings, WorldSettings};
use crate::world::generator::{ChunkGenerator, TerrainParams};
use crate::world::loader::{ChunkJob, ChunkLoader, GeneratedChunk};

/// Lifecycle stage of a chunk coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StreamState {
    Absent,
    Queued,
    Generating,
    Live,
}

/// Read-only numbers for a debug overlay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub loaded_chunks: usize,
    pub queued: usize,
    pub generating: usize,
    pub in_flight: usize,
    pub pending_results: usize,
    pub pending_remesh: usize,
    pub seed: u32,
    pub epoch: u64,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub queued: usize,
    pub cancelled: usize,
    pub evicted: usize,
    pub started: usize,
    pub finalized: usize,
    pub discarded: usize,
    pub remeshed: usize,
}

pub struct World {
    stream: StreamSettings,
    terrain: TerrainParams,
    chunks: FxHashMap<ChunkCoord, Chunk>,
    queued: FxHashSet<ChunkCoord>,
    generating: FxHashSet<ChunkCoord>,
    results: VecDeque<GeneratedChunk>,
    remesh_queue: VecDeque<ChunkCoord>,
    remesh_pending: FxHashSet<ChunkCoord>,
    loader: ChunkLoader,
    observer: Vec3,
    epoch: u64,
}

impl World {
    pub fn new(settings: WorldSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let loader = ChunkLoader::with_worker_count(settings.stream.worker_count)?;
        let terrain = settings.terrain.params();

        tracing::info!(
            seed = terrain.seed,
            load_radius = settings.stream.load_radius,
            unload_radius = settings.stream.unload_radius,
            "World created"
        );

        Ok(World {
            stream: settings.stream,
            terrain,
            chunks: FxHashMap::default(),
            queued: FxHashSet::default(),
            generating: FxHashSet::default(),
            results: VecDeque::new(),
            remesh_queue: VecDeque::new(),
            remesh_pending: FxHashSet::default(),
            loader,
            observer: Vec3::ZERO,
            epoch: 0,
        })
    }

    pub fn set_observer_position(&mut self, position: Vec3) {
        self.observer = position;
    }

    pub fn observer_position(&self) -> Vec3 {
        self.observer
    }

    pub fn observer_chunk(&self) -> ChunkCoord {
        ChunkCoord::from_position(self.observer)
    }

    pub fn tick(&mut self) -> TickReport {
        let _span = tracing::debug_span!("world_tick").entered();
        let center = self.observer_chunk();
        let mut report = TickReport::default();

        // Anything finished from now on waits for the next tick
        self.results.extend(self.loader.drain());

        self.update_desired(center, &mut report);
        self.start_generation(center, &mut report);
        self.finalize_results(center, &mut report);
        self.process_remesh_queue(&mut report);

        tracing::trace!(
            queued = report.queued,
            started = report.started,
            finalized = report.finalized,
            discarded = report.discarded,
            evicted = report.evicted,
            remeshed = report.remeshed,
            live = self.chunks.len(),
            "tick complete"
        );
        report
    }

    fn update_desired(&mut self, center: ChunkCoord, report: &mut TickReport) {
        let load = self.stream.load_radius;
        let unload = self.stream.unload_radius;

        let out_of_range: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| coord.chebyshev_distance(center) > unload)
            .copied()
            .collect();
        for coord in out_of_range {
            if self.evict(coord) {
                report.evicted += 1;
            }
        }

        let before = self.queued.len() + self.generating.len();
        self.queued
            .retain(|coord| coord.chebyshev_distance(center) <= load);
        // In-flight work still completes; its result is dropped on arrival
        self.generating
            .retain(|coord| coord.chebyshev_distance(center) <= load);
        report.cancelled += before - (self.queued.len() + self.generating.len());

        for dz in -load..=load {
            for dx in -load..=load {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if self.state_of(coord) == StreamState::Absent {
                    self.queued.insert(coord);
                    report.queued += 1;
                }
            }
        }
    }

    fn start_generation(&mut self, center: ChunkCoord, report: &mut TickReport) {
        // Cancelled jobs and undrained backlog still hold their slot
        let outstanding = self.loader.in_flight() + self.results.len();
        let capacity = self.stream.max_in_flight.saturating_sub(outstanding);
        let budget = self.stream.max_starts_per_tick.min(capacity);
        if budget == 0 || self.queued.is_empty() {
            return;
        }

        let mut candidates: Vec<ChunkCoord> = self.queued.iter().copied().collect();
        candidates.sort_unstable_by_key(|coord| (coord.manhattan_distance(center), coord.x, coord.z));

        for coord in candidates.into_iter().take(budget) {
            let job = ChunkJob {
                coord,
                epoch: self.epoch,
                params: self.terrain,
            };
            if !self.loader.submit(job) {
                tracing::warn!("chunk loader rejected a job; workers are gone");
                break;
            }
            self.queued.remove(&coord);
            self.generating.insert(coord);
            report.started += 1;
        }
    }

    fn finalize_results(&mut self, center: ChunkCoord, report: &mut TickReport) {
        for _ in 0..self.stream.max_finalizes_per_tick {
            let Some(result) = self.results.pop_front() else {
                break;
            };
            if self.admit(result, center) {
                report.finalized += 1;
            } else {
                report.discarded += 1;
            }
        }
    }

    fn admit(&mut self, result: GeneratedChunk, center: ChunkCoord) -> bool {
        let coord = result.coord;
        if result.epoch != self.epoch {
            tracing::trace!(x = coord.x, z = coord.z, "dropping result from an older seed");
            return false;
        }
        if !self.generating.contains(&coord) {
            tracing::trace!(x = coord.x, z = coord.z, "dropping result for cancelled chunk");
            return false;
        }
        self.generating.remove(&coord);
        if coord.chebyshev_distance(center) > self.stream.unload_radius {
            tracing::trace!(x = coord.x, z = coord.z, "dropping result outside unload radius");
            return false;
        }

        self.chunks
            .insert(coord, Chunk::from_generated(coord, result.blocks, result.mesh));

        // The new chunk's mesh saw air past its edges, and live neighbors
        // still show faces against it.
        let mut has_live_neighbor = false;
        for neighbor in coord.neighbors() {
            if self.chunks.contains_key(&neighbor) {
                self.schedule_remesh(neighbor);
                has_live_neighbor = true;
            }
        }
        if has_live_neighbor {
            self.schedule_remesh(coord);
        }

        tracing::debug!(x = coord.x, z = coord.z, "chunk admitted");
        true
    }

    fn schedule_remesh(&mut self, coord: ChunkCoord) {
        if self.remesh_pending.insert(coord) {
            self.remesh_queue.push_back(coord);
        }
    }

    fn process_remesh_queue(&mut self, report: &mut TickReport) {
        while report.remeshed < self.stream.max_remesh_per_tick {
            let Some(coord) = self.remesh_queue.pop_front() else {
                break;
            };
            // Entries whose chunk was evicted or already rebuilt are stale
            if self.remesh_pending.contains(&coord) && self.remesh_chunk(coord) {
                report.remeshed += 1;
            }
        }
    }

    /// Rebuilds one live chunk's mesh against its live neighbors.
    fn remesh_chunk(&mut self, coord: ChunkCoord) -> bool {
        self.remesh_pending.remove(&coord);
        let Some(mut chunk) = self.chunks.remove(&coord) else {
            return false;
        };
        chunk.rebuild_mesh(&*self);
        self.chunks.insert(coord, chunk);
        true
    }

    /// Drops a live chunk. Returns false if there was nothing to drop.
    pub fn evict(&mut self, coord: ChunkCoord) -> bool {
        self.queued.remove(&coord);
        self.remesh_pending.remove(&coord);
        if self.chunks.remove(&coord).is_none() {
            return false;
        }

        // Faces that were hidden against the evicted chunk are exposed again
        for neighbor in coord.neighbors() {
            if self.chunks.contains_key(&neighbor) {
                self.schedule_remesh(neighbor);
            }
        }
        tracing::debug!(x = coord.x, z = coord.z, "chunk evicted");
        true
    }

    /// Throws away all streaming state and switches to a new seed. Chunks
    /// come back through normal ticking.
    pub fn regenerate(&mut self, seed: u32) {
        tracing::info!(old = self.terrain.seed, new = seed, "Regenerating world");
        self.chunks.clear();
        self.queued.clear();
        self.generating.clear();
        self.results.clear();
        self.remesh_queue.clear();
        self.remesh_pending.clear();
        self.loader.discard_completed();
        self.terrain.seed = seed;
        self.epoch += 1;
    }

    fn locate(x: i32, z: i32) -> (ChunkCoord, i32, i32) {
        (
            ChunkCoord::from_block(x, z),
            x.rem_euclid(CHUNK_SIZE_X),
            z.rem_euclid(CHUNK_SIZE_Z),
        )
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !(0..CHUNK_SIZE_Y).contains(&y) {
            return BlockType::Air;
        }
        let (coord, lx, lz) = Self::locate(x, z);
        self.chunks
            .get(&coord)
            .map(|chunk| chunk.get(lx, y, lz))
            .unwrap_or(BlockType::Air)
    }

    /// Writes without remeshing. Returns the owning chunk on success.
    fn write_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> Option<ChunkCoord> {
        if !(0..CHUNK_SIZE_Y).contains(&y) {
            return None;
        }
        let (coord, lx, lz) = Self::locate(x, z);
        let chunk = self.chunks.get_mut(&coord)?;
        chunk.set(lx, y, lz, block);
        chunk.player_modified = true;
        Some(coord)
    }

    /// Live chunks other than the owner whose meshes depend on block `(x, z)`.
    fn boundary_neighbors(x: i32, z: i32) -> Vec<ChunkCoord> {
        let (coord, lx, lz) = Self::locate(x, z);
        let mut out = Vec::with_capacity(2);
        if lx == 0 {
            out.push(ChunkCoord::new(coord.x - 1, coord.z));
        }
        if lx == CHUNK_SIZE_X - 1 {
            out.push(ChunkCoord::new(coord.x + 1, coord.z));
        }
        if lz == 0 {
            out.push(ChunkCoord::new(coord.x, coord.z - 1));
        }
        if lz == CHUNK_SIZE_Z - 1 {
            out.push(ChunkCoord::new(coord.x, coord.z + 1));
        }
        out
    }

    /// Edits one block and immediately rebuilds every mesh it touches.
    /// Returns false (and changes nothing) if the block is not loaded.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        let Some(coord) = self.write_block(x, y, z, block) else {
            return false;
        };
        self.remesh_chunk(coord);
        for neighbor in Self::boundary_neighbors(x, z) {
            self.remesh_chunk(neighbor);
        }
        true
    }

    /// Applies many edits, rebuilding each affected chunk once. Returns the
    /// number of edits that landed in live chunks.
    pub fn set_blocks<I>(&mut self, edits: I) -> usize
    where
        I: IntoIterator<Item = (IVec3, BlockType)>,
    {
        let mut dirty = BTreeSet::new();
        let mut applied = 0;
        for (pos, block) in edits {
            if let Some(coord) = self.write_block(pos.x, pos.y, pos.z, block) {
                applied += 1;
                dirty.insert(coord);
                dirty.extend(Self::boundary_neighbors(pos.x, pos.z));
            }
        }
        for coord in dirty {
            self.remesh_chunk(coord);
        }
        applied
    }

    pub fn state_of(&self, coord: ChunkCoord) -> StreamState {
        if self.chunks.contains_key(&coord) {
            StreamState::Live
        } else if self.generating.contains(&coord) {
            StreamState::Generating
        } else if self.queued.contains(&coord) {
            StreamState::Queued
        } else {
            StreamState::Absent
        }
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Live coordinates in sorted order.
    pub fn live_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// True once nothing is queued, in flight, waiting to be admitted or
    /// waiting for a remesh.
    pub fn is_settled(&self) -> bool {
        self.queued.is_empty()
            && self.generating.is_empty()
            && self.results.is_empty()
            && self.remesh_pending.is_empty()
            && self.loader.in_flight() == 0
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn seed(&self) -> u32 {
        self.terrain.seed
    }

    pub fn terrain_params(&self) -> TerrainParams {
        self.terrain
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            loaded_chunks: self.chunks.len(),
            queued: self.queued.len(),
            generating: self.generating.len(),
            in_flight: self.loader.in_flight(),
            pending_results: self.results.len() + self.loader.completed_len(),
            pending_remesh: self.remesh_pending.len(),
            seed: self.terrain.seed,
            epoch: self.epoch,
        }
    }

    /// Standing position on generated ground near the origin, clear of trees.
    pub fn find_spawn_point(&self) -> Vec3 {
        let generator = ChunkGenerator::new(self.terrain);
        let clear_of_trees = |x: i32, z: i32| {
            !self.terrain.trees
                || (-TREE_BORDER..=TREE_BORDER).all(|dz| {
                    (-TREE_BORDER..=TREE_BORDER).all(|dx| generator.tree_at(x + dx, z + dz).is_none())
                })
        };

        for radius in 0..CHUNK_SIZE_X * 2 {
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    if dx.abs() != radius && dz.abs() != radius {
                        continue;
                    }
                    if clear_of_trees(dx, dz) {
                        let height = generator.surface_height(dx, dz);
                        return Vec3::new(dx as f32 + 0.5, (height + 1) as f32, dz as f32 + 0.5);
                    }
                }
            }
        }
        let height = generator.surface_height(0, 0);
        Vec3::new(0.5, (height + 1) as f32, 0.5)
    }
}

impl BlockSource for World {
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        self.get_block(wx, wy, wz)
    }
}
