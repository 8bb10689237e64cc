mod support;

use arena_sim::domain::{
    Bounds, Faction, Layout, LossReason, Outcome, Position, ShipBlueprint,
};
use arena_sim::use_cases::ArenaState;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn classic_layout_renders_player_and_spawns_every_actor() {
    let bounds = Bounds::new(80, 24);
    let (sim, frame) = support::start(bounds, Layout::classic(bounds));
    support::settle().await;

    assert_eq!(frame.glyph_at(Position::new(40, 22)), Some('|'));
    assert_eq!(frame.glyph_at(Position::new(39, 23)), Some('<'));
    assert_eq!(frame.glyph_at(Position::new(41, 23)), Some('>'));

    let report = sim.report();
    assert_eq!(report.state, ArenaState::Running);
    assert_eq!(report.formation_remaining, 30);
    assert_eq!(report.barriers_remaining, 110);
}

#[tokio::test(start_paused = true)]
async fn player_shot_chips_the_barrier_in_front_of_it() {
    let bounds = Bounds::new(80, 24);
    let (sim, frame) = support::start(bounds, Layout::classic(bounds));
    support::settle().await;
    assert_eq!(
        sim.arena().occupant_at(Position::new(40, 19)).await.map(|(_, f)| f),
        Some(Faction::Barrier)
    );

    sim.player_fire();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(sim.arena().occupant_at(Position::new(40, 19)).await, None);
    assert_eq!(frame.glyph_at(Position::new(40, 19)), Some(' '));
    assert_eq!(sim.report().barriers_remaining, 109);
    assert_eq!(sim.arena().projectiles_in_flight(), 0);
    assert_eq!(sim.state(), ArenaState::Running);
}

#[tokio::test(start_paused = true)]
async fn player_cannot_leave_the_arena_sideways() {
    let bounds = Bounds::new(20, 10);
    let layout = Layout {
        player: ShipBlueprint::player(Position::new(3, 10)),
        barriers: Vec::new(),
        formation: vec![ShipBlueprint::formation_member(Position::new(10, 3))],
    };
    let (sim, _frame) = support::start(bounds, layout);
    support::settle().await;

    for _ in 0..5 {
        sim.move_player_left();
    }
    support::settle().await;
    assert_eq!(sim.player().position(), Position::new(1, 10));

    for _ in 0..25 {
        sim.move_player_right();
    }
    support::settle().await;
    assert_eq!(sim.player().position(), Position::new(18, 10));
}

#[tokio::test(start_paused = true)]
async fn destroying_the_last_member_wins_and_clears_it_from_the_frame() {
    let bounds = Bounds::new(20, 20);
    let layout = Layout {
        player: ShipBlueprint::player(Position::new(10, 20)),
        barriers: Vec::new(),
        formation: vec![ShipBlueprint::formation_member(Position::new(10, 8))],
    };
    let (sim, frame) = support::start(bounds, layout);
    support::settle().await;
    assert_eq!(frame.glyph_at(Position::new(10, 6)), Some('='));

    sim.player_fire();
    let outcome = tokio::time::timeout(Duration::from_secs(1), sim.outcome())
        .await
        .expect("run should be decided");
    assert_eq!(outcome, Some(Outcome::Win));
    support::settle().await;

    assert_eq!(frame.glyph_at(Position::new(10, 6)), Some(' '));
    let report = sim.shutdown().await;
    assert_eq!(report.state, ArenaState::Finished(Outcome::Win));
    assert_eq!(report.formation_remaining, 0);
}

#[tokio::test(start_paused = true)]
async fn formation_reaching_the_defensive_line_loses_the_run() {
    let bounds = Bounds::new(20, 10);
    let layout = Layout {
        player: ShipBlueprint::player(Position::new(15, 10)),
        barriers: Vec::new(),
        formation: vec![
            ShipBlueprint::formation_member(Position::new(1, 8)),
            ShipBlueprint::formation_member(Position::new(8, 4)),
        ],
    };
    let (sim, _frame) = support::start(bounds, layout);

    let outcome = tokio::time::timeout(Duration::from_secs(2), sim.outcome())
        .await
        .expect("run should be decided");

    assert_eq!(outcome, Some(Outcome::Loss(LossReason::FormationLanded)));
    support::settle().await;
    assert!(sim.formation().is_finished());
    assert!(
        sim.formation()
            .members()
            .iter()
            .all(|m| m.entity().is_terminated())
    );
    // The player was never touched.
    assert!(!sim.player().entity().is_terminated());
}

#[tokio::test(start_paused = true)]
async fn shutdown_halts_without_an_outcome() {
    let bounds = Bounds::new(80, 24);
    let (sim, _frame) = support::start(bounds, Layout::classic(bounds));
    support::settle().await;

    let report = sim.shutdown().await;

    assert_eq!(report.state, ArenaState::Halted);
    assert_eq!(report.state.outcome(), None);
    assert_eq!(report.formation_remaining, 30);
}
