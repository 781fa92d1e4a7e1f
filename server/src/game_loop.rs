//! Fixed-rate main loop: each tick reads console input, advances the world
//! and flushes the player's output, with periodic autosaves.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::Context;
use gloaming_core::types::ObjectId;

use crate::config::ServerConfig;
use crate::state::State;

/// How far behind schedule the loop may fall before it stops catching up.
const MAX_LAG_SECONDS: u32 = 10;

/// Whether the loop keeps going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One tick: queued input, the world tick, then output.
///
/// # Arguments
/// * `player` - the character console input is executed as
/// * `input` - lines read from the console
/// * `output` - where the player's messages are written
pub fn step(
    state: &mut State,
    player: ObjectId,
    input: &Receiver<String>,
    output: &mut impl Write,
) -> anyhow::Result<Flow> {
    let mut flow = Flow::Continue;
    loop {
        match input.try_recv() {
            Ok(line) => {
                if line.trim().eq_ignore_ascii_case("quit") {
                    flow = Flow::Quit;
                    break;
                }
                state.execute_command(player, &line);
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                log::info!("Console input closed");
                flow = Flow::Quit;
                break;
            }
        }
    }

    state.tick();

    for text in state.network.drain_for(player) {
        writeln!(output, "{}", text).context("writing player output")?;
    }
    output.flush().context("flushing player output")?;

    let dropped = state.network.discard();
    if dropped > 0 {
        log::trace!("Discarded {} messages for characters without a session", dropped);
    }
    Ok(flow)
}

/// Runs until `quit` is raised or the player types `quit`. Autosaves every
/// `save_interval_seconds`; a failed autosave is logged and retried at the
/// next interval.
pub fn run(
    state: &mut State,
    config: &ServerConfig,
    player: ObjectId,
    input: &Receiver<String>,
    output: &mut impl Write,
    quit: &AtomicBool,
) -> anyhow::Result<()> {
    let tick = Duration::from_secs(1) / config.ticks_per_second.max(1);
    let save_every = state.seconds_to_ticks(config.save_interval_seconds);
    let mut next_tick = Instant::now();

    log::info!(
        "Entering main game loop at {} ticks per second",
        config.ticks_per_second
    );
    state.look_around(player);

    while !quit.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now < next_tick {
            std::thread::sleep(next_tick - now);
            continue;
        }
        next_tick += tick;

        if step(state, player, input, output)? == Flow::Quit {
            break;
        }

        if save_every > 0 && state.now() % save_every == 0 {
            match state.repository.save(&config.world_path) {
                Ok(()) => log::debug!("Autosaved world at tick {}", state.now()),
                Err(e) => log::error!("Autosave failed: {:#}", e),
            }
        }

        if Instant::now() > next_tick + tick * config.ticks_per_second * MAX_LAG_SECONDS {
            log::warn!("Server too slow, skipping missed ticks");
            next_tick = Instant::now();
        }
    }

    log::info!("Leaving main game loop");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populate::{ensure_player, seed_world};
    use std::sync::mpsc;

    fn setup() -> (State, ObjectId) {
        let mut repo = seed_world();
        let player = ensure_player(&mut repo, "Wanderer");
        (State::new(repo, 10, 1.0), player)
    }

    #[test]
    fn test_step_runs_input_and_writes_output() {
        let (mut state, player) = setup();
        let (tx, rx) = mpsc::channel();
        tx.send("say hello".to_string()).unwrap();

        let mut out = Vec::new();
        let flow = step(&mut state, player, &rx, &mut out).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(String::from_utf8(out).unwrap(), "You say, \"hello\"\n");
        assert_eq!(state.now(), 1);
    }

    #[test]
    fn test_quit_and_closed_input_stop_the_loop() {
        let (mut state, player) = setup();
        let (tx, rx) = mpsc::channel();
        tx.send("QUIT".to_string()).unwrap();
        let mut out = Vec::new();
        assert_eq!(step(&mut state, player, &rx, &mut out).unwrap(), Flow::Quit);

        drop(tx);
        assert_eq!(step(&mut state, player, &rx, &mut out).unwrap(), Flow::Quit);
    }

    #[test]
    fn test_run_returns_when_quit_is_raised() {
        let (mut state, player) = setup();
        let (_tx, rx) = mpsc::channel::<String>();
        let quit = AtomicBool::new(true);
        let config = ServerConfig::default();
        let mut out = Vec::new();
        run(&mut state, &config, player, &rx, &mut out, &quit).unwrap();
        assert_eq!(state.now(), 0);
    }
}
