//! Async driver for the control path.
//!
//! One task owns the controller and serializes three sources: queued
//! commands, the energy timer, and a shutdown signal. Nothing inside the
//! loop blocks; it only waits for the next input.
//!
//! Operator input is read on a plain OS thread. A blocking read on stdin
//! cannot be cancelled, and the process must still exit on shutdown while
//! that read is pending.

use log::{debug, info, warn};
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use crate::control::{ControlEvent, ControllerSnapshot, FanController};
use crate::telemetry::TelemetrySample;
use crate::transport::Transport;
use crate::utils::format::format_sample;
use crate::utils::parsing::{OperatorInput, parse_operator_line};

/// Message accepted by the control loop.
#[derive(Debug)]
pub enum Command {
    /// Apply an input to the controller.
    Control(ControlEvent),
    /// Reply with the current snapshot.
    Snapshot(oneshot::Sender<ControllerSnapshot>),
    /// Reply with the recorded telemetry, oldest first.
    History(oneshot::Sender<Vec<TelemetrySample>>),
}

impl From<ControlEvent> for Command {
    fn from(event: ControlEvent) -> Self {
        Command::Control(event)
    }
}

/// Run the control loop until `shutdown` fires or every command sender is
/// dropped. The timer is dropped with the loop, so no tick fires afterwards.
pub async fn run<T: Transport>(
    controller: &mut FanController,
    transport: &mut T,
    mut commands: mpsc::Receiver<Command>,
    mut shutdown: oneshot::Receiver<()>,
    tick_every: Duration,
) {
    let mut ticker = tokio::time::interval(tick_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Control loop started (tick every {:?})", tick_every);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            command = commands.recv() => match command {
                Some(Command::Control(event)) => {
                    debug!("Event: {:?}", event);
                    controller.handle(event, transport);
                }
                Some(Command::Snapshot(reply)) => {
                    let _ = reply.send(controller.snapshot());
                }
                Some(Command::History(reply)) => {
                    let _ = reply.send(controller.telemetry().samples().cloned().collect());
                }
                None => {
                    info!("Input closed");
                    break;
                }
            },
            at = ticker.tick() => {
                controller.handle(ControlEvent::Tick(at.into_std()), transport);
            }
        }
    }

    info!("Control loop stopped");
}

// =============================================================================
// Operator Input
// =============================================================================

/// Forward operator lines from `input` to the control loop until EOF or
/// until the loop stops. Replies to `show` and `history` go to `out`.
///
/// Blocks the calling thread. Must not be called from inside the async
/// runtime.
pub fn forward_operator_lines<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    commands: &mpsc::Sender<Command>,
) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };

        let input = match parse_operator_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        let written = match input {
            OperatorInput::Control(event) => {
                if commands.blocking_send(event.into()).is_err() {
                    break;
                }
                Ok(())
            }
            OperatorInput::Show => {
                let (reply_tx, reply_rx) = oneshot::channel();
                if commands.blocking_send(Command::Snapshot(reply_tx)).is_err() {
                    break;
                }
                match reply_rx.blocking_recv() {
                    Ok(snapshot) => writeln!(out, "{}", snapshot),
                    Err(_) => break,
                }
            }
            OperatorInput::History => {
                let (reply_tx, reply_rx) = oneshot::channel();
                if commands.blocking_send(Command::History(reply_tx)).is_err() {
                    break;
                }
                match reply_rx.blocking_recv() {
                    Ok(samples) => write_history(out, &samples),
                    Err(_) => break,
                }
            }
        };

        if let Err(e) = written.and_then(|_| out.flush()) {
            warn!("Failed to write reply: {}", e);
        }
    }

    debug!("Operator input finished");
}

fn write_history<W: Write>(out: &mut W, samples: &[TelemetrySample]) -> std::io::Result<()> {
    writeln!(out, "{} samples", samples.len())?;
    for sample in samples {
        writeln!(out, "  {}", format_sample(sample))?;
    }
    Ok(())
}

/// Read operator commands from stdin on a detached thread.
///
/// The thread is never joined. Exiting the process ends it even while it
/// waits for a line.
pub fn spawn_operator_reader(commands: mpsc::Sender<Command>) -> std::io::Result<()> {
    thread::Builder::new()
        .name("operator-input".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            forward_operator_lines(stdin.lock(), &mut std::io::stdout(), &commands);
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::ClimateReading;
    use crate::config::ControllerConfig;
    use crate::control::OperatingMode;
    use crate::transport::MemoryTransport;
    use std::io::{BufReader, Cursor, Read};

    fn controller() -> FanController {
        FanController::new(&ControllerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_events_are_applied_in_order() {
        let mut c = controller();
        let mut t = MemoryTransport::default();
        let (tx, rx) = mpsc::channel(16);
        let (_stop_tx, stop_rx) = oneshot::channel();

        for event in [
            ControlEvent::ConnectionChanged(true),
            ControlEvent::SetClimate(ClimateReading::new(30.0, 50.0)),
            ControlEvent::SetMode(OperatingMode::Auto),
        ] {
            tx.send(event.into()).await.unwrap();
        }
        drop(tx);

        run(&mut c, &mut t, rx, stop_rx, Duration::from_millis(50)).await;

        assert_eq!(t.payloads(), vec!["0", "185"]);
        assert_eq!(c.mode(), OperatingMode::Auto);
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let mut c = controller();
        let mut t = MemoryTransport::default();
        let (_tx, rx) = mpsc::channel::<Command>(4);
        let (stop_tx, stop_rx) = oneshot::channel();

        stop_tx.send(()).unwrap();
        run(&mut c, &mut t, rx, stop_rx, Duration::from_secs(1)).await;

        assert!(t.messages.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_request() {
        let mut c = controller();
        let mut t = MemoryTransport::default();
        let (tx, rx) = mpsc::channel(4);
        let (_stop_tx, stop_rx) = oneshot::channel();

        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(ControlEvent::SetManualRpm(70).into()).await.unwrap();
        tx.send(Command::Snapshot(reply_tx)).await.unwrap();
        drop(tx);

        run(&mut c, &mut t, rx, stop_rx, Duration::from_secs(1)).await;

        let snapshot = reply_rx.await.unwrap();
        assert_eq!(snapshot.manual_rpm, 70);
        assert_eq!(snapshot.commanded_rpm, None);
    }

    #[tokio::test]
    async fn test_history_request() {
        let mut c = controller();
        let mut t = MemoryTransport::default();
        let (tx, rx) = mpsc::channel(4);
        let (_stop_tx, stop_rx) = oneshot::channel();

        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(ControlEvent::SetClimate(ClimateReading::new(30.0, 50.0)).into())
            .await
            .unwrap();
        tx.send(Command::History(reply_tx)).await.unwrap();
        drop(tx);

        run(&mut c, &mut t, rx, stop_rx, Duration::from_secs(1)).await;

        let history = reply_rx.await.unwrap();
        let last = history.last().unwrap();
        assert_eq!(last.comfort_c, 31.0);
        assert_eq!(last.actual_rpm, 0.0);
    }

    #[tokio::test]
    async fn test_operator_lines_reach_the_loop() {
        let mut c = controller();
        let mut t = MemoryTransport::default();
        let (tx, rx) = mpsc::channel(4);
        let (_stop_tx, stop_rx) = oneshot::channel();

        let reader = thread::spawn(move || {
            let script = "connected true\nmanual 70\nlaunch\nshow\nhistory\n";
            let mut out = Vec::new();
            forward_operator_lines(Cursor::new(script), &mut out, &tx);
            out
        });

        run(&mut c, &mut t, rx, stop_rx, Duration::from_secs(1)).await;

        let out = String::from_utf8(reader.join().unwrap()).unwrap();
        assert!(out.contains("Coolstream Controller"));
        assert!(out.contains(" samples"));
        assert_eq!(t.payloads(), vec!["0", "70"]);
        assert_eq!(c.manual_rpm(), 70);
    }

    /// Reader that blocks until its release channel is dropped, then reports EOF.
    struct StalledInput(std::sync::mpsc::Receiver<()>);

    impl Read for StalledInput {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_shutdown_with_pending_operator_read() {
        let mut c = controller();
        let mut t = MemoryTransport::default();
        let (tx, rx) = mpsc::channel(4);
        let (stop_tx, stop_rx) = oneshot::channel();
        let (release, stalled) = std::sync::mpsc::channel::<()>();

        let reader = thread::spawn(move || {
            let input = BufReader::new(StalledInput(stalled));
            forward_operator_lines(input, &mut std::io::sink(), &tx);
        });

        stop_tx.send(()).unwrap();
        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            run(&mut c, &mut t, rx, stop_rx, Duration::from_secs(1)),
        )
        .await;
        assert!(stopped.is_ok());
        assert!(!reader.is_finished());

        drop(release);
        reader.join().unwrap();
    }
}
