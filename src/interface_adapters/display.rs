// Periodic frame flush: writes the frame buffer to a terminal-like sink.

use crate::interface_adapters::frame::FrameBuffer;
use crate::use_cases::ArenaState;
use crate::use_cases::arena;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

const CLEAR_SCREEN: &str = "\x1b[2J";

/// Writes the frame whenever it changed, once per `period`, until the simulation
/// leaves `Running`. A final frame is written on exit so the end state stays visible.
pub async fn frame_flush_task<W>(
    frame: Arc<FrameBuffer>,
    mut out: W,
    period: Duration,
    mut state_rx: watch::Receiver<ArenaState>,
) where
    W: AsyncWrite + Unpin,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    if let Err(e) = out.write_all(CLEAR_SCREEN.as_bytes()).await {
        warn!(error = %e, "display unavailable; frame flush exiting");
        return;
    }

    loop {
        tokio::select! {
            biased;
            _ = arena::stopped(&mut state_rx) => break,
            _ = ticker.tick() => {
                if !frame.take_dirty() {
                    continue;
                }
                if let Err(e) = write_frame(&frame, &mut out).await {
                    warn!(error = %e, "failed to write frame; frame flush exiting");
                    return;
                }
            }
        }
    }

    if let Err(e) = write_frame(&frame, &mut out).await {
        debug!(error = %e, "failed to write final frame");
    }
}

async fn write_frame<W>(frame: &FrameBuffer, out: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(frame.render_ansi().as_bytes()).await?;
    out.flush().await
}
