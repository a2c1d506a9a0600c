// src/main.rs

use sortviz::{Distribution, Engine, RecordingStage, SampleGenerator, SortConfig, SortPhase};

const FRAME: f32 = 1.0 / 60.0;
const MAX_FRAMES: usize = 1_000_000;

/// ===============================
/// Main
/// ===============================

fn main() {
    // --------------------------------
    // Engine + Stage
    // --------------------------------

    let mut engine = Engine::with_generator(SampleGenerator::with_seed(7));
    let mut stage = RecordingStage::new();

    println!("Starting sort sanity test…");

    for distribution in [
        Distribution::Uniform,
        Distribution::Ascending,
        Distribution::Descending,
    ] {
        println!("--- {:?} ---", distribution);

        let config = SortConfig::new()
            .with_samples(20)
            .with_distribution(distribution)
            .with_speed(4.0)
            .with_seed(7);

        let run_id = match engine.start(config, &mut stage) {
            Ok(id) => id,
            Err(e) => {
                println!("Rejected: {}", e);
                continue;
            }
        };
        println!("Run {} input:  {:?}", run_id, engine.data());

        // --------------------------------
        // Frame loop
        // --------------------------------

        let mut frames = 0;
        while engine.phase() != SortPhase::Done && frames < MAX_FRAMES {
            engine.tick(FRAME, &mut stage);
            frames += 1;
        }

        let stats = engine.stats();
        println!("Run {} output: {:?}", run_id, engine.data());
        println!(
            "{} comparisons, {} swaps, {} frames ({:.1}s), bars in order: {}",
            stats.comparisons,
            stats.swaps,
            frames,
            engine.readback().elapsed,
            stage.values_by_position() == engine.data()
        );
    }

    engine.request_exit(&mut stage);
    println!("Sanity test completed.");
}
