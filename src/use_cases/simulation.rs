// Simulation orchestration: spawns every actor from a layout and exposes the
// player controls, the outcome and shutdown.

use super::arena::Arena;
use super::formation::{FormationHandle, spawn_formation};
use super::ship::{ShipHandle, spawn_ship};
use super::types::{ArenaState, SimulationReport, SimulationSettings};
use crate::domain::tuning::Tuning;
use crate::domain::{Direction, Layout, Outcome, Renderer};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::info;

/// A running simulation and the handles to all of its actors.
#[derive(Debug)]
pub struct Simulation {
    arena: Arc<Arena>,
    player: ShipHandle,
    barriers: Vec<ShipHandle>,
    formation: FormationHandle,
    started: Instant,
}

impl Simulation {
    /// Spawns the player, every barrier segment and the formation with its coordinator.
    /// Must be called from within a Tokio runtime.
    pub fn start(
        settings: SimulationSettings,
        tuning: Tuning,
        layout: Layout,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let arena = Arena::new(settings, tuning, renderer);
        let Layout {
            player,
            barriers,
            formation,
        } = layout;

        info!(
            width = arena.bounds().width,
            height = arena.bounds().height,
            barriers = barriers.len(),
            formation = formation.len(),
            "simulation starting"
        );

        let barriers = barriers
            .into_iter()
            .map(|blueprint| spawn_ship(arena.clone(), blueprint, None))
            .collect();
        let formation = spawn_formation(arena.clone(), formation);
        // Spawned last so its cells win any overlap with the setup above.
        let player = spawn_ship(arena.clone(), player, None);

        Self {
            arena,
            player,
            barriers,
            formation,
            started: Instant::now(),
        }
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    pub fn player(&self) -> &ShipHandle {
        &self.player
    }

    pub fn barriers(&self) -> &[ShipHandle] {
        &self.barriers
    }

    pub fn formation(&self) -> &FormationHandle {
        &self.formation
    }

    pub fn state(&self) -> ArenaState {
        self.arena.state()
    }

    pub fn move_player_left(&self) -> bool {
        self.player.move_request(Direction::Left)
    }

    pub fn move_player_right(&self) -> bool {
        self.player.move_request(Direction::Right)
    }

    pub fn player_fire(&self) -> bool {
        self.player.fire_request()
    }

    /// Waits until the simulation leaves `Running`. Returns `None` when it was halted.
    pub async fn outcome(&self) -> Option<Outcome> {
        let mut state_rx = self.arena.subscribe();
        let state = match state_rx.wait_for(|state| !state.is_running()).await {
            Ok(state) => *state,
            Err(_) => ArenaState::Halted,
        };
        state.outcome()
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            state: self.arena.state(),
            elapsed: self.started.elapsed(),
            formation_remaining: self.formation.remaining(),
            barriers_remaining: self
                .barriers
                .iter()
                .filter(|b| !b.entity().is_terminated())
                .count(),
            projectiles_in_flight: self.arena.projectiles_in_flight(),
        }
    }

    /// Halts every actor (unless an outcome was already published) and waits for them to exit.
    pub async fn shutdown(self) -> SimulationReport {
        self.arena.halt();
        let report = self.report();

        self.player.join().await;
        for barrier in self.barriers {
            barrier.join().await;
        }
        self.formation.join().await;

        info!(state = ?report.state, elapsed_ms = report.elapsed.as_millis() as u64, "simulation shut down");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bounds, LossReason, Position, ShipBlueprint};
    use crate::use_cases::test_support::{RecordingRenderer, quiet_tuning, settle, test_settings};
    use std::time::Duration;

    fn start(layout: Layout, bounds: Bounds) -> Simulation {
        Simulation::start(
            test_settings(bounds),
            quiet_tuning(),
            layout,
            Arc::new(RecordingRenderer::default()),
        )
    }

    fn small_layout() -> Layout {
        Layout {
            player: ShipBlueprint::player(Position::new(10, 20)),
            barriers: vec![ShipBlueprint::barrier(Position::new(4, 16))],
            formation: vec![ShipBlueprint::formation_member(Position::new(10, 4))],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn when_player_commands_arrive_then_player_moves_one_cell_each() {
        let sim = start(small_layout(), Bounds::new(20, 20));
        settle().await;

        assert!(sim.move_player_left());
        assert!(sim.move_player_left());
        settle().await;
        assert_eq!(sim.player().position(), Position::new(8, 20));

        assert!(sim.move_player_right());
        settle().await;
        assert_eq!(sim.player().position(), Position::new(9, 20));
    }

    #[tokio::test(start_paused = true)]
    async fn when_shut_down_then_state_is_halted_and_every_task_exits() {
        let sim = start(small_layout(), Bounds::new(20, 20));
        settle().await;

        let report = sim.shutdown().await;

        assert_eq!(report.state, ArenaState::Halted);
        assert_eq!(report.formation_remaining, 1);
        assert_eq!(report.barriers_remaining, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn when_halted_then_outcome_is_none() {
        let sim = start(small_layout(), Bounds::new(20, 20));
        settle().await;

        sim.arena().halt();
        assert_eq!(sim.outcome().await, None);
        // A halted run cannot be decided afterwards.
        assert!(!sim.arena().end(Outcome::Win));
    }

    #[tokio::test(start_paused = true)]
    async fn when_player_fires_at_lone_member_then_simulation_is_won() {
        let layout = Layout {
            player: ShipBlueprint::player(Position::new(10, 20)),
            barriers: Vec::new(),
            formation: vec![ShipBlueprint::formation_member(Position::new(10, 8))],
        };
        let sim = start(layout, Bounds::new(20, 20));
        settle().await;

        // The formation first sweeps left at 500 ms; the shot lands before that.
        sim.player_fire();
        let outcome = tokio::time::timeout(Duration::from_secs(1), sim.outcome())
            .await
            .expect("simulation should finish");

        assert_eq!(outcome, Some(Outcome::Win));
        assert_eq!(sim.report().formation_remaining, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn when_player_is_terminated_then_simulation_is_lost() {
        let sim = start(small_layout(), Bounds::new(20, 20));
        settle().await;

        sim.player().terminate();
        let outcome = sim.outcome().await;

        assert_eq!(outcome, Some(Outcome::Loss(LossReason::PlayerDestroyed)));
        let report = sim.shutdown().await;
        assert_eq!(
            report.state,
            ArenaState::Finished(Outcome::Loss(LossReason::PlayerDestroyed))
        );
    }
}
