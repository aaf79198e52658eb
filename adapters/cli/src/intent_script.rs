//! Scripted direction intents for unattended runs.
//!
//! A script is a comma-separated list of `tick:direction` entries such as
//! `0:down,30:right,120:up`. Entries may appear in any order; several entries
//! for the same tick are delivered in the order written.

use maze_chase_core::Direction;
use thiserror::Error;

const ENTRY_DELIMITER: char = ',';
const FIELD_DELIMITER: char = ':';

/// Errors that can occur while parsing an intent script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum IntentScriptError {
    /// An entry lacked the `tick:direction` shape.
    #[error("intent entry '{0}' must look like <tick>:<direction>")]
    MalformedEntry(String),
    /// The tick was not a non-negative integer.
    #[error("intent tick '{0}' is not a valid tick number")]
    InvalidTick(String),
    /// The direction was not one of up, down, left, right.
    #[error("intent direction '{0}' must be up, down, left or right")]
    InvalidDirection(String),
}

/// Parsed list of intents ordered by tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct IntentScript {
    entries: Vec<(u64, Direction)>,
}

impl IntentScript {
    /// Parses a script from its textual form.
    pub(crate) fn parse(text: &str) -> Result<Self, IntentScriptError> {
        let mut entries = Vec::new();
        for entry in text
            .split(ENTRY_DELIMITER)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
        {
            let (tick, direction) = entry
                .split_once(FIELD_DELIMITER)
                .ok_or_else(|| IntentScriptError::MalformedEntry(entry.to_owned()))?;
            let tick = tick
                .trim()
                .parse::<u64>()
                .map_err(|_| IntentScriptError::InvalidTick(tick.trim().to_owned()))?;
            entries.push((tick, parse_direction(direction.trim())?));
        }
        entries.sort_by_key(|(tick, _)| *tick);
        Ok(Self { entries })
    }

    /// Intents scheduled for `tick`, in the order they were written.
    pub(crate) fn at(&self, tick: u64) -> impl Iterator<Item = Direction> + '_ {
        self.entries
            .iter()
            .filter(move |(scheduled, _)| *scheduled == tick)
            .map(|(_, direction)| *direction)
    }

    /// Number of scripted intents.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

fn parse_direction(value: &str) -> Result<Direction, IntentScriptError> {
    match value.to_ascii_lowercase().as_str() {
        "up" | "u" => Ok(Direction::Up),
        "down" | "d" => Ok(Direction::Down),
        "left" | "l" => Ok(Direction::Left),
        "right" | "r" => Ok(Direction::Right),
        _ => Err(IntentScriptError::InvalidDirection(value.to_owned())),
    }
}
