use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::arena::Arena;
use super::types::SimulationSettings;
use crate::domain::tuning::{FormationTuning, Tuning};
use crate::domain::{Bounds, Position, Renderer, Style};

// Renderer that records every call for actor tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderEvent {
    Draw {
        pos: Position,
        glyph: char,
        style: Style,
    },
    Clear {
        pos: Position,
    },
}

#[derive(Default)]
pub(crate) struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub(crate) fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().expect("render log mutex poisoned").clone()
    }

    // Positions drawn with `style`, in call order.
    pub(crate) fn draws_with(&self, style: Style) -> Vec<Position> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::Draw { pos, style: s, .. } if s == style => Some(pos),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn cleared(&self) -> Vec<Position> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::Clear { pos } => Some(pos),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: RenderEvent) {
        self.events
            .lock()
            .expect("render log mutex poisoned")
            .push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn draw_cell(&self, pos: Position, glyph: char, style: Style) {
        self.record(RenderEvent::Draw { pos, glyph, style });
    }

    fn clear_cell(&self, pos: Position) {
        self.record(RenderEvent::Clear { pos });
    }
}

// Formation members never fire unless a test opts in.
pub(crate) fn quiet_tuning() -> Tuning {
    Tuning {
        formation: FormationTuning {
            fire_probability: 0.0,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub(crate) fn test_settings(bounds: Bounds) -> SimulationSettings {
    SimulationSettings {
        seed: Some(7),
        ..SimulationSettings::new(bounds)
    }
}

pub(crate) fn test_arena(bounds: Bounds) -> (Arc<Arena>, Arc<RecordingRenderer>) {
    test_arena_with(bounds, quiet_tuning())
}

pub(crate) fn test_arena_with(
    bounds: Bounds,
    tuning: Tuning,
) -> (Arc<Arena>, Arc<RecordingRenderer>) {
    let renderer = Arc::new(RecordingRenderer::default());
    let arena = Arena::new(test_settings(bounds), tuning, renderer.clone());
    (arena, renderer)
}

// Lets every ready actor drain its mailbox under paused time.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
