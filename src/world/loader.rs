//! Background chunk generation worker pool
//!
//! Jobs go out over a crossbeam channel. Finished chunks come back through a
//! mutex-guarded completion queue that the main loop drains in one swap, so
//! workers never see the world's own maps.

use std::mem;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, unbounded};
use parking_lot::Mutex;

use crate::core::chunk::{BlockGrid, ChunkCoord};
use crate::error::ConfigError;
use crate::render::mesh::{MeshBuffers, build_isolated_mesh};
use crate::world::generator::{ChunkGenerator, TerrainParams};

/// One unit of background work: generate and mesh a single chunk.
#[derive(Clone, Copy, Debug)]
pub struct ChunkJob {
    pub coord: ChunkCoord,
    pub epoch: u64,
    pub params: TerrainParams,
}

/// Result of background chunk generation
pub struct GeneratedChunk {
    pub coord: ChunkCoord,
    pub epoch: u64,
    pub blocks: BlockGrid,
    pub mesh: MeshBuffers,
}

impl ChunkJob {
    /// Runs the job on the current thread.
    pub fn run(self) -> GeneratedChunk {
        let blocks = ChunkGenerator::new(self.params).generate_chunk(self.coord);
        let mesh = build_isolated_mesh(&blocks);
        GeneratedChunk {
            coord: self.coord,
            epoch: self.epoch,
            blocks,
            mesh,
        }
    }
}

/// Manages background chunk generation with worker threads
pub struct ChunkLoader {
    job_tx: Option<Sender<ChunkJob>>,
    completed: Arc<Mutex<Vec<GeneratedChunk>>>,
    workers: Vec<JoinHandle<()>>,
    // Submitted jobs whose result has not been drained or discarded yet
    in_flight: usize,
}

impl ChunkLoader {
    pub fn with_worker_count(num_workers: usize) -> Result<Self, ConfigError> {
        if num_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }

        let (job_tx, job_rx) = unbounded::<ChunkJob>();
        let completed = Arc::new(Mutex::new(Vec::new()));
        let mut workers = Vec::with_capacity(num_workers);

        for worker_id in 0..num_workers {
            let rx = job_rx.clone();
            let completed = Arc::clone(&completed);

            let handle = thread::Builder::new()
                .name(format!("chunk-gen-{}", worker_id))
                .spawn(move || {
                    // Exits once every sender is gone
                    while let Ok(job) = rx.recv() {
                        let coord = job.coord;
                        let result = job.run();
                        tracing::trace!(worker_id, x = coord.x, z = coord.z, "chunk generated");
                        completed.lock().push(result);
                    }
                })?;
            workers.push(handle);
        }

        tracing::info!("Chunk loader started with {} workers", num_workers);

        Ok(ChunkLoader {
            job_tx: Some(job_tx),
            completed,
            workers,
            in_flight: 0,
        })
    }

    /// Hands a job to the pool. Returns false if no worker can take it.
    pub fn submit(&mut self, job: ChunkJob) -> bool {
        let sent = match &self.job_tx {
            Some(tx) => tx.send(job).is_ok(),
            None => false,
        };
        if sent {
            self.in_flight += 1;
        }
        sent
    }

    /// Takes every finished chunk out of the completion queue.
    pub fn drain(&mut self) -> Vec<GeneratedChunk> {
        let results = mem::take(&mut *self.completed.lock());
        self.in_flight = self.in_flight.saturating_sub(results.len());
        results
    }

    /// Drops finished chunks that nobody will admit.
    pub fn discard_completed(&mut self) {
        let dropped = mem::take(&mut *self.completed.lock()).len();
        self.in_flight = self.in_flight.saturating_sub(dropped);
    }

    /// Jobs submitted but not yet drained, whether queued, running or
    /// finished. Cancelled work counts until its result comes back.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn completed_len(&self) -> usize {
        self.completed.lock().len()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for ChunkLoader {
    fn drop(&mut self) {
        self.job_tx.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("chunk worker panicked during shutdown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(loader: &mut ChunkLoader, count: usize) -> Vec<GeneratedChunk> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut results = Vec::new();
        while results.len() < count {
            assert!(Instant::now() < deadline, "workers did not finish");
            results.extend(loader.drain());
            thread::sleep(Duration::from_millis(1));
        }
        results
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(
            ChunkLoader::with_worker_count(0),
            Err(ConfigError::ZeroWorkers)
        ));
    }

    #[test]
    fn background_result_matches_inline_generation() {
        let mut loader = ChunkLoader::with_worker_count(2).unwrap();
        assert_eq!(loader.worker_count(), 2);

        let params = TerrainParams::with_seed(31);
        let coords = [ChunkCoord::new(0, 0), ChunkCoord::new(1, -4), ChunkCoord::new(-2, 3)];
        for coord in coords {
            assert!(loader.submit(ChunkJob {
                coord,
                epoch: 7,
                params,
            }));
        }

        assert_eq!(loader.in_flight(), coords.len());
        let results = wait_for(&mut loader, coords.len());
        assert_eq!(results.len(), coords.len());
        for result in results {
            assert_eq!(result.epoch, 7);
            let inline = ChunkJob {
                coord: result.coord,
                epoch: 7,
                params,
            }
            .run();
            assert_eq!(result.blocks, inline.blocks);
            assert_eq!(result.mesh, inline.mesh);
        }
        assert_eq!(loader.completed_len(), 0);
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn discard_clears_the_queue() {
        let mut loader = ChunkLoader::with_worker_count(1).unwrap();
        loader.submit(ChunkJob {
            coord: ChunkCoord::new(3, 3),
            epoch: 0,
            params: TerrainParams::default(),
        });
        let deadline = Instant::now() + Duration::from_secs(10);
        while loader.completed_len() == 0 {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(loader.in_flight(), 1);
        loader.discard_completed();
        assert!(loader.drain().is_empty());
        assert_eq!(loader.in_flight(), 0);
    }
}
