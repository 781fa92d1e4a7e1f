use std::env;
use std::io::{self, BufRead};
use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;

use gloaming_server::config::ServerConfig;
use gloaming_server::game_loop;
use gloaming_server::populate::{ensure_player, seed_world};
use gloaming_server::repository::Repository;
use gloaming_server::state::State;

fn load_world(config: &ServerConfig) -> anyhow::Result<Repository> {
    if config.world_path.exists() {
        Repository::load(&config.world_path)
    } else {
        log::info!(
            "No world at {}, seeding a new one",
            config.world_path.display()
        );
        Ok(seed_world())
    }
}

fn run() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    gloaming_core::initialize_logger(config.log_level, config.log_file.as_deref())
        .context("initializing logger")?;

    log::info!("Starting Gloaming server v{}", env!("CARGO_PKG_VERSION"));

    let mut repository = load_world(&config)?;

    let args: Vec<String> = env::args().collect();
    if let [_, cmd, path] = args.as_slice() {
        if cmd.eq_ignore_ascii_case("export") {
            return repository.export_json(Path::new(path));
        }
    }

    if repository.globals().dirty {
        log::warn!("World was not shut down cleanly; continuing from the last save");
    }
    repository.globals_mut().dirty = true;
    let player = ensure_player(&mut repository, &config.player_name);
    repository.save(&config.world_path)?;

    let quit_flag = Arc::new(AtomicBool::new(false));
    let handler_flag = quit_flag.clone();
    ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            log::info!("Already shutting down");
        } else {
            log::info!("Got signal to terminate. Shutdown initiated...");
        }
    })
    .context("installing Ctrl-C handler")?;

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut state = State::new(repository, config.ticks_per_second, config.time_factor);
    let mut stdout = io::stdout();
    let result = game_loop::run(&mut state, &config, player, &rx, &mut stdout, &quit_flag);

    state.repository.globals_mut().dirty = false;
    state.repository.save(&config.world_path)?;
    log::info!("Server shutdown complete.");
    result
}

fn main() {
    if let Err(e) = run() {
        eprintln!("gloaming: {:#}", e);
        log::error!("Fatal: {:#}", e);
        process::exit(1);
    }
}
