// Framework bootstrap for the arena simulation process.

use crate::domain::{Layout, Outcome};
use crate::frameworks::config::{PLAYER_INPUT_CAPACITY, RuntimeConfig};
use crate::interface_adapters::{
    FrameBuffer, OutcomeReportDto, PlayerCommand, command_reader_task, frame_flush_task,
};
use crate::use_cases::{Simulation, SimulationReport};

use std::{io::Result, sync::Arc};
use tokio::io::BufReader;
use tokio::sync::mpsc;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            // stdout carries the frame and the final report.
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Runs one simulation with the classic layout until it is decided, the player quits,
/// or Ctrl-C arrives. Returns the outcome, `None` when the run was stopped early.
pub async fn run(config: RuntimeConfig) -> Result<Option<Outcome>> {
    let bounds = config.bounds();
    let layout = Layout::classic(bounds);
    let frame = Arc::new(FrameBuffer::new(bounds));

    let sim = Simulation::start(config.settings(), config.tuning(), layout, frame.clone());

    // Spawn the display flush unless running headless.
    let display = (!config.headless).then(|| {
        tokio::spawn(frame_flush_task(
            frame,
            tokio::io::stdout(),
            config.flush,
            sim.arena().subscribe(),
        ))
    });

    let (commands_tx, mut commands_rx) = mpsc::channel(PLAYER_INPUT_CAPACITY);
    tokio::spawn(command_reader_task(
        BufReader::new(tokio::io::stdin()),
        commands_tx,
    ));

    tracing::info!(
        width = bounds.width,
        height = bounds.height,
        seed = ?config.seed,
        headless = config.headless,
        "arena running"
    );

    // Main control loop
    {
        let outcome = sim.outcome();
        tokio::pin!(outcome);
        loop {
            tokio::select! {
                biased;
                _ = &mut outcome => break,
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "failed to listen for ctrl-c");
                    }
                    tracing::info!("interrupted; halting simulation");
                    break;
                }
                Some(command) = commands_rx.recv() => match command {
                    PlayerCommand::Left => {
                        sim.move_player_left();
                    }
                    PlayerCommand::Right => {
                        sim.move_player_right();
                    }
                    PlayerCommand::Fire => {
                        sim.player_fire();
                    }
                    PlayerCommand::Quit => {
                        tracing::info!("quit requested; halting simulation");
                        break;
                    }
                },
            }
        }
    }

    let report = sim.shutdown().await;
    if let Some(display) = display {
        if let Err(e) = display.await {
            tracing::warn!(error = %e, "display task failed");
        }
    }

    print_report(&report);
    Ok(report.state.outcome())
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = RuntimeConfig::load()
        .inspect_err(|e| {
            tracing::error!(error = %e, "failed to load configuration");
        })
        .map_err(std::io::Error::other)?;
    tracing::debug!(?config, "configuration loaded");

    let outcome = run(config).await?;
    tracing::info!(?outcome, "arena finished");
    Ok(())
}

fn print_report(report: &SimulationReport) {
    match serde_json::to_string(&OutcomeReportDto::from(report.clone())) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = ?e, "failed to serialize outcome report"),
    }
}
