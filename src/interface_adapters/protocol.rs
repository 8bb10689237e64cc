// Serialized outcome report written when the process exits.

use crate::domain::{LossReason, Outcome};
use crate::use_cases::{ArenaState, SimulationReport};
use serde::Serialize;

/// How a run ended, tagged by `result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum OutcomeDto {
    Win,
    Loss { reason: LossReasonDto },
    // Stopped by the operator before any outcome.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReasonDto {
    PlayerDestroyed,
    PlayerHit,
    FormationLanded,
}

impl From<LossReason> for LossReasonDto {
    fn from(reason: LossReason) -> Self {
        match reason {
            LossReason::PlayerDestroyed => LossReasonDto::PlayerDestroyed,
            LossReason::PlayerHit => LossReasonDto::PlayerHit,
            LossReason::FormationLanded => LossReasonDto::FormationLanded,
        }
    }
}

impl From<ArenaState> for OutcomeDto {
    fn from(state: ArenaState) -> Self {
        match state {
            ArenaState::Finished(Outcome::Win) => OutcomeDto::Win,
            ArenaState::Finished(Outcome::Loss(reason)) => OutcomeDto::Loss {
                reason: reason.into(),
            },
            // A report taken while still running is treated as a halt.
            ArenaState::Running | ArenaState::Halted => OutcomeDto::Halted,
        }
    }
}

/// Flattened run summary for stdout.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReportDto {
    #[serde(flatten)]
    pub outcome: OutcomeDto,
    pub elapsed_ms: u64,
    pub formation_remaining: usize,
    pub barriers_remaining: usize,
    pub projectiles_in_flight: usize,
}

impl From<SimulationReport> for OutcomeReportDto {
    fn from(report: SimulationReport) -> Self {
        Self {
            outcome: report.state.into(),
            elapsed_ms: report.elapsed.as_millis() as u64,
            formation_remaining: report.formation_remaining,
            barriers_remaining: report.barriers_remaining,
            projectiles_in_flight: report.projectiles_in_flight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn report(state: ArenaState) -> SimulationReport {
        SimulationReport {
            state,
            elapsed: Duration::from_millis(12_345),
            formation_remaining: 4,
            barriers_remaining: 90,
            projectiles_in_flight: 1,
        }
    }

    #[test]
    fn loss_report_carries_its_reason() {
        let dto = OutcomeReportDto::from(report(ArenaState::Finished(Outcome::Loss(
            LossReason::FormationLanded,
        ))));

        let value = serde_json::to_value(&dto).expect("serialize report");
        assert_eq!(
            value,
            json!({
                "result": "loss",
                "reason": "formation_landed",
                "elapsed_ms": 12345,
                "formation_remaining": 4,
                "barriers_remaining": 90,
                "projectiles_in_flight": 1,
            })
        );
    }

    #[test]
    fn win_and_halt_have_no_reason() {
        let win = serde_json::to_value(OutcomeReportDto::from(report(ArenaState::Finished(
            Outcome::Win,
        ))))
        .expect("serialize report");
        assert_eq!(win["result"], "win");
        assert!(win.get("reason").is_none());

        let halted = serde_json::to_value(OutcomeReportDto::from(report(ArenaState::Halted)))
            .expect("serialize report");
        assert_eq!(halted["result"], "halted");
    }
}
