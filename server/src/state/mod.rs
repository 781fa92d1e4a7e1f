//! The rules engine. `State` owns the world and everything transient around
//! it; its behaviour is split by concern across the files of this module.

use chrono::NaiveDateTime;

use gloaming_core::constants::REGEN_INTERVAL_SECONDS;
use gloaming_core::gametime::{time_and_season, GameClock, Season, TimeSlot};
use gloaming_core::types::ObjectId;

use crate::network_manager::NetworkManager;
use crate::repository::Repository;
use crate::runtime::Runtime;
use crate::scheduler::{Scheduler, Task};

mod building;
mod clothing;
mod commands;
mod communication;
mod containers;
mod inventory;
mod liquids;
mod look;
mod movement;
mod visibility;
mod vitals;

pub use commands::{parse_command, ParsedCommand};

pub struct State {
    pub repository: Repository,
    pub runtime: Runtime,
    pub scheduler: Scheduler,
    pub network: NetworkManager,
    clock: GameClock,
    ticks_per_second: u32,
}

impl State {
    pub fn new(repository: Repository, ticks_per_second: u32, time_factor: f64) -> Self {
        State {
            repository,
            runtime: Runtime::new(),
            scheduler: Scheduler::new(),
            network: NetworkManager::new(),
            clock: GameClock::new(time_factor),
            ticks_per_second: ticks_per_second.max(1),
        }
    }

    /// Current value of the world ticker.
    pub fn now(&self) -> u64 {
        self.repository.globals().ticker
    }

    pub fn seconds_to_ticks(&self, seconds: u64) -> u64 {
        seconds * u64::from(self.ticks_per_second)
    }

    /// Game calendar time derived from the ticker.
    pub fn game_time(&self) -> NaiveDateTime {
        let elapsed = self.now() as f64 / f64::from(self.ticks_per_second);
        self.clock.at(elapsed)
    }

    pub fn time_and_season(&self) -> (Season, TimeSlot) {
        time_and_season(&self.game_time())
    }

    /// Sends text to a single character.
    pub fn msg(&mut self, to: ObjectId, text: impl Into<String>) {
        self.network.send(to, text);
    }

    /// Advances the world by one tick: fires due timers, then runs periodic
    /// upkeep.
    pub fn tick(&mut self) {
        let now = {
            let globals = self.repository.globals_mut();
            globals.ticker += 1;
            globals.ticker
        };

        while let Some((handle, task)) = self.scheduler.pop_due(now) {
            match task {
                Task::Traverse { character, exit } => {
                    if self.runtime.moving.get(&character) == Some(&handle) {
                        self.finish_traverse(character, exit);
                    } else {
                        log::warn!("Dropping stale traversal timer for {}", character);
                    }
                }
            }
        }

        if now % self.seconds_to_ticks(REGEN_INTERVAL_SECONDS) == 0 {
            self.regenerate();
        }
    }

    /// Runs `ticks` ticks back to back.
    pub fn advance(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }
}
