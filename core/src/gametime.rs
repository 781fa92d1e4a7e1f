//! In-game calendar: seasons, times of day and the clock that maps server
//! uptime onto game time.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const MONTHS_PER_YEAR: f64 = 12.0;
const SEASONAL_BOUNDARIES: (f64, f64, f64) = (3.0 / 12.0, 6.0 / 12.0, 9.0 / 12.0);
const HOURS_PER_DAY: f64 = 24.0;
const DAY_BOUNDARIES: (f64, f64, f64, f64) = (0.0, 6.0 / 24.0, 12.0 / 24.0, 18.0 / 24.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        };
        f.write_str(name)
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            other => Err(format!("Unknown season '{other}'.")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSlot {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Night,
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
    ];

    fn tag(&self) -> &'static str {
        match self {
            TimeSlot::Night => "night",
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            TimeSlot::Night => &RE_NIGHT,
            TimeSlot::Morning => &RE_MORNING,
            TimeSlot::Afternoon => &RE_AFTERNOON,
            TimeSlot::Evening => &RE_EVENING,
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn slot_regex(tag: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{tag}>(.*?)</{tag}>")).expect("time slot pattern compiles")
}

static RE_NIGHT: LazyLock<Regex> = LazyLock::new(|| slot_regex("night"));
static RE_MORNING: LazyLock<Regex> = LazyLock::new(|| slot_regex("morning"));
static RE_AFTERNOON: LazyLock<Regex> = LazyLock::new(|| slot_regex("afternoon"));
static RE_EVENING: LazyLock<Regex> = LazyLock::new(|| slot_regex("evening"));

/// Season and time slot for a game date.
///
/// Months 3-5 are spring, 6-8 summer, 9-12 autumn and 1-2 winter. Hours 0-5
/// are night, 6-11 morning, 12-17 afternoon and 18-23 evening.
pub fn time_and_season(datestamp: &NaiveDateTime) -> (Season, TimeSlot) {
    let season = f64::from(datestamp.month()) / MONTHS_PER_YEAR;
    let timeslot = f64::from(datestamp.hour()) / HOURS_PER_DAY;

    let curr_season = if SEASONAL_BOUNDARIES.0 <= season && season < SEASONAL_BOUNDARIES.1 {
        Season::Spring
    } else if SEASONAL_BOUNDARIES.1 <= season && season < SEASONAL_BOUNDARIES.2 {
        Season::Summer
    } else if SEASONAL_BOUNDARIES.2 <= season && season < 1.0 + SEASONAL_BOUNDARIES.0 {
        Season::Autumn
    } else {
        Season::Winter
    };

    let curr_timeslot = if DAY_BOUNDARIES.0 <= timeslot && timeslot < DAY_BOUNDARIES.1 {
        TimeSlot::Night
    } else if DAY_BOUNDARIES.1 <= timeslot && timeslot < DAY_BOUNDARIES.2 {
        TimeSlot::Morning
    } else if DAY_BOUNDARIES.2 <= timeslot && timeslot < DAY_BOUNDARIES.3 {
        TimeSlot::Afternoon
    } else {
        TimeSlot::Evening
    };

    (curr_season, curr_timeslot)
}

/// Keeps the contents of `<slot>...</slot>` sections for the current time
/// slot and removes the sections of every other slot.
pub fn replace_timeslots(raw_desc: &str, current: TimeSlot) -> String {
    let mut desc = current.pattern().replace_all(raw_desc, "$1").into_owned();
    for slot in TimeSlot::ALL {
        if slot != current {
            desc = slot.pattern().replace_all(&desc, "").into_owned();
        }
    }
    desc
}

/// Twelve-hour clock string such as `03:45pm`.
pub fn clock_string(datestamp: &NaiveDateTime) -> String {
    format!(
        "{}{}",
        datestamp.format("%I:%M"),
        datestamp.format("%p").to_string().to_lowercase()
    )
}

/// Maps elapsed server time onto the game calendar. The calendar starts at
/// midnight on the first day of a year and runs `time_factor` times faster
/// than real time.
#[derive(Debug, Clone, Copy)]
pub struct GameClock {
    epoch: NaiveDateTime,
    time_factor: f64,
}

impl GameClock {
    pub fn new(time_factor: f64) -> Self {
        let epoch = NaiveDate::from_ymd_opt(1001, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        GameClock { epoch, time_factor }
    }

    pub fn at(&self, elapsed_real_seconds: f64) -> NaiveDateTime {
        let game_seconds = (elapsed_real_seconds * self.time_factor) as i64;
        self.epoch + Duration::seconds(game_seconds)
    }
}
