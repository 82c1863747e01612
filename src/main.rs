//! Terrastream - headless streaming walk
//!
//! Usage: `terrastream [config.json]`
//!
//! Walks a viewer east across the world, streaming chunks as it goes, and
//! logs what the streamer loads. Run with `RUST_LOG=terrastream=debug` to see
//! individual chunks and lakes.

use std::path::PathBuf;
use std::time::Instant;

use terrastream::core::logging;
use terrastream::generation::TerrainConfig;
use terrastream::math::AlwaysVisible;
use terrastream::streaming::TerrainStreamer;
use terrastream::world::CHUNK_SIZE;

const WALK_STEPS: usize = 12;

fn main() -> terrastream::core::types::Result<()> {
    logging::init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            TerrainConfig::load(&path)?
        }
        None => TerrainConfig::default(),
    };

    let mut streamer = TerrainStreamer::new(config)?;
    let step = CHUNK_SIZE as f32 * streamer.scale() * 0.5;
    let start = Instant::now();

    for i in 0..WALK_STEPS {
        let x = i as f32 * step;
        let z = 0.0;
        let frame_start = Instant::now();
        let stats = streamer.update(x, z, &AlwaysVisible);

        let features: usize = streamer.chunks().map(|c| c.features().len()).sum();
        let lakes: usize = streamer.chunks().map(|c| c.lakes().count()).sum();
        log::info!(
            "Step {:>2} x={:>7.1} h={:>6.2} {} chunks={} (+{} ~{} -{}) features={} lakes={} {:.1?}",
            i,
            x,
            streamer.get_height(x, z),
            streamer.dominant_biome(x, z).name(),
            streamer.chunk_count(),
            stats.created,
            stats.replaced,
            stats.disposed,
            features,
            lakes,
            frame_start.elapsed()
        );
    }

    log::info!("Walk finished in {:.2?}", start.elapsed());
    Ok(())
}
