// Shared context every actor runs against: bounds, the locked occupancy grid,
// the rendering port and the simulation lifecycle channel.

use super::signal::StopSignal;
use super::types::{ArenaState, SimulationSettings};
use crate::domain::tuning::Tuning;
use crate::domain::{
    Bounds, EntityId, Faction, OccupancyGrid, Occupant, Outcome, Position, Renderer,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::info;

/// Cloneable reference to a live entity: what the grid stores and what others use to stop it.
#[derive(Debug, Clone)]
pub struct EntityHandle {
    pub id: EntityId,
    pub faction: Faction,
    stop: Arc<StopSignal>,
}

impl EntityHandle {
    pub fn new(faction: Faction) -> Self {
        Self {
            id: EntityId::next(),
            faction,
            stop: Arc::new(StopSignal::default()),
        }
    }

    /// Sends the termination signal. Returns false if it was already sent.
    pub fn terminate(&self) -> bool {
        self.stop.terminate()
    }

    pub fn is_terminated(&self) -> bool {
        self.stop.is_terminated()
    }

    pub(crate) fn stop_signal(&self) -> Arc<StopSignal> {
        self.stop.clone()
    }
}

impl Occupant for EntityHandle {
    fn id(&self) -> EntityId {
        self.id
    }
}

pub type Grid = OccupancyGrid<EntityHandle>;

pub struct Arena {
    settings: SimulationSettings,
    tuning: Tuning,
    // Every claim, release and lookup goes through this lock; it is never held across
    // anything but its own acquisition.
    grid: Mutex<Grid>,
    renderer: Arc<dyn Renderer>,
    state_tx: watch::Sender<ArenaState>,
    projectiles_in_flight: AtomicUsize,
    seed: u64,
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("bounds", &self.bounds())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Arena {
    pub fn new(
        settings: SimulationSettings,
        mut tuning: Tuning,
        renderer: Arc<dyn Renderer>,
    ) -> Arc<Self> {
        tuning.formation.fire_probability = sanitize_probability(tuning.formation.fire_probability);
        let seed = settings.seed.unwrap_or_else(rand::random);
        let (state_tx, _state_rx) = watch::channel(ArenaState::Running);
        Arc::new(Self {
            grid: Mutex::new(OccupancyGrid::new(settings.bounds)),
            settings,
            tuning,
            renderer,
            state_tx,
            projectiles_in_flight: AtomicUsize::new(0),
            seed,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.settings.bounds
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    pub(crate) async fn grid(&self) -> MutexGuard<'_, Grid> {
        self.grid.lock().await
    }

    /// Identity and faction of whoever holds `pos`.
    pub async fn occupant_at(&self, pos: Position) -> Option<(EntityId, Faction)> {
        let grid = self.grid.lock().await;
        grid.get(pos).map(|o| (o.id, o.faction))
    }

    /// Cells currently held by `id`.
    pub async fn cells_of(&self, id: EntityId) -> Vec<Position> {
        self.grid.lock().await.cells_of(id)
    }

    pub fn state(&self) -> ArenaState {
        *self.state_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ArenaState> {
        self.state_tx.subscribe()
    }

    /// Publishes the final outcome. Only the first transition out of `Running` counts.
    pub fn end(&self, outcome: Outcome) -> bool {
        let ended = self.transition(ArenaState::Finished(outcome));
        if ended {
            info!(?outcome, "simulation ended");
        }
        ended
    }

    /// Stops every actor without declaring an outcome.
    pub fn halt(&self) -> bool {
        let halted = self.transition(ArenaState::Halted);
        if halted {
            info!("simulation halted");
        }
        halted
    }

    fn transition(&self, next: ArenaState) -> bool {
        self.state_tx.send_if_modified(|state| {
            if state.is_running() {
                *state = next;
                true
            } else {
                false
            }
        })
    }

    pub fn projectiles_in_flight(&self) -> usize {
        self.projectiles_in_flight.load(Ordering::Acquire)
    }

    pub(crate) fn projectile_launched(&self) {
        self.projectiles_in_flight.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn projectile_retired(&self) {
        self.projectiles_in_flight.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random stream for the formation member placed at `ordinal` in the setup.
    /// The same seed and ordinal always yield the same stream.
    pub(crate) fn rng_for(&self, ordinal: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(ordinal);
        rng
    }
}

// NaN never fires; everything else is clamped into 0..=1.
fn sanitize_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Resolves once the simulation has left `Running`, or the arena is gone.
pub(crate) async fn stopped(state_rx: &mut watch::Receiver<ArenaState>) {
    let _ = state_rx.wait_for(|state| !state.is_running()).await;
}
