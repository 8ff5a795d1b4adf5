//! Line-oriented command parsing and dispatch for the simulator REPL.

use overdash_engine::OverlayHandle;
use overdash_protocol::HostCommand;
use overdash_surface::{Pos, Size, TouchEvent, TouchPhase};
use tracing::error;

/// One parsed REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCmd {
    /// A lifecycle command shared with the host bridge wire format.
    Host(HostCommand),
    /// Feed one touch event.
    Touch(TouchEvent),
    /// Report a measured window size.
    Measure(Size),
    /// Start a delivery session.
    Start {
        /// Service name; joined from the remaining words on the line.
        service: String,
    },
    /// Update the in-progress session's service.
    Service {
        /// New service name.
        name: String,
    },
    /// Finish the in-progress session.
    Finish {
        /// Reward amount (required by the engine's validation).
        reward: String,
        /// Estimated minutes; empty defaults to "0".
        estimated_minutes: String,
        /// Distance; empty defaults to "0".
        distance: String,
    },
    /// Print the controller status snapshot.
    Status,
    /// Exit the REPL.
    Quit,
}

/// Parse one input line. `Ok(None)` means an empty line.
pub fn parse(line: &str) -> Result<Option<ReplCmd>, String> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let cmd = match cmd {
        "show" => ReplCmd::Host(HostCommand::Show),
        "hide" => ReplCmd::Host(HostCommand::Hide),
        "stop" => ReplCmd::Host(HostCommand::Stop),
        "status" => ReplCmd::Status,
        "quit" | "exit" => ReplCmd::Quit,
        "move" => {
            let (x, y) = two_ints(&rest, "move X Y")?;
            ReplCmd::Host(HostCommand::Move { x, y })
        }
        "touch" => {
            let phase = match rest.first().copied() {
                Some("down") => TouchPhase::Down,
                Some("move") => TouchPhase::Move,
                Some("up") => TouchPhase::Up,
                _ => return Err("usage: touch down|move|up X Y".into()),
            };
            let (x, y) = two_ints(&rest[1..], "touch down|move|up X Y")?;
            let raw = Pos::new(x, y);
            // The simulator has no window-local coordinate space; reuse raw.
            ReplCmd::Touch(TouchEvent::new(phase, raw, raw))
        }
        "measure" => {
            let (w, h) = two_ints(&rest, "measure W H")?;
            ReplCmd::Measure(Size::new(w, h))
        }
        "start" => ReplCmd::Start {
            service: join_or(&rest, "default"),
        },
        "service" => {
            if rest.is_empty() {
                return Err("usage: service NAME".into());
            }
            ReplCmd::Service {
                name: rest.join(" "),
            }
        }
        "finish" => {
            let Some(reward) = rest.first() else {
                return Err("usage: finish REWARD [EST_MINUTES] [DISTANCE]".into());
            };
            ReplCmd::Finish {
                reward: (*reward).to_string(),
                estimated_minutes: rest.get(1).copied().unwrap_or("").to_string(),
                distance: rest.get(2).copied().unwrap_or("").to_string(),
            }
        }
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(cmd))
}

fn two_ints(words: &[&str], usage: &str) -> Result<(i32, i32), String> {
    match (words.first(), words.get(1)) {
        (Some(a), Some(b)) => {
            let a = a.parse().map_err(|_| format!("usage: {usage}"))?;
            let b = b.parse().map_err(|_| format!("usage: {usage}"))?;
            Ok((a, b))
        }
        _ => Err(format!("usage: {usage}")),
    }
}

fn join_or(words: &[&str], default: &str) -> String {
    if words.is_empty() {
        default.to_string()
    } else {
        words.join(" ")
    }
}

/// Apply a parsed command to the controller. Returns `false` to exit.
pub async fn apply(handle: &OverlayHandle, cmd: ReplCmd) -> bool {
    let outcome = match cmd {
        ReplCmd::Host(cmd) => {
            let result = match cmd {
                HostCommand::Show => handle.show().await,
                HostCommand::Hide => handle.hide().await,
                HostCommand::Stop => handle.stop().await,
                HostCommand::Move { x, y } => handle.move_to(x, y).await,
            };
            if let Err(e) = result {
                error!(cmd = cmd.as_str(), "command failed: {e}");
            }
            Ok(())
        }
        ReplCmd::Touch(event) => {
            let handled = handle.touch(event).await;
            println!("touch handled: {handled}");
            Ok(())
        }
        ReplCmd::Measure(size) => {
            handle.report_layout(size);
            Ok(())
        }
        ReplCmd::Start { service } => handle.start_session(&service).await,
        ReplCmd::Service { name } => handle.select_service(&name).await,
        ReplCmd::Finish {
            reward,
            estimated_minutes,
            distance,
        } => {
            handle
                .finish_session(&reward, &estimated_minutes, &distance)
                .await
        }
        ReplCmd::Status => match handle.status().await {
            Ok(status) => {
                println!("{status:?}");
                Ok(())
            }
            Err(e) => Err(e),
        },
        ReplCmd::Quit => return false,
    };
    if let Err(e) = outcome {
        error!("command failed: {e}");
    }
    true
}
