// Shared helpers for driving a full simulation from integration tests.
#![allow(dead_code)]

use arena_sim::Simulation;
use arena_sim::domain::tuning::Tuning;
use arena_sim::domain::{Bounds, Layout};
use arena_sim::interface_adapters::FrameBuffer;
use arena_sim::use_cases::SimulationSettings;
use std::{sync::Arc, time::Duration};

// Formation members never fire, so outcomes depend only on the test's own moves.
pub fn quiet_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.formation.fire_probability = 0.0;
    tuning
}

// Start a simulation that renders into an in-memory frame.
pub fn start(bounds: Bounds, layout: Layout) -> (Simulation, Arc<FrameBuffer>) {
    let frame = Arc::new(FrameBuffer::new(bounds));
    let settings = SimulationSettings {
        seed: Some(1),
        ..SimulationSettings::new(bounds)
    };
    let sim = Simulation::start(settings, quiet_tuning(), layout, frame.clone());
    (sim, frame)
}

// Let every ready actor drain its mailbox under paused time.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
