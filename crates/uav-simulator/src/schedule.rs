//! Time-ordered command schedule with exactly-once dispatch.
//!
//! Commands are loaded once, validated, and stably sorted by trigger time.
//! An advancing cursor partitions the list into applied (`..next_due`) and
//! pending (`next_due..`): once a command is handed out it is never
//! delivered again, so re-applying an already-established target cannot
//! happen at the dispatch layer.

use std::fs;
use std::path::Path;

use tracing::warn;
use uav_domain::Command;

use crate::error::{Result, SimulatorError};

/// Ordered collection of time-stamped waypoint commands.
#[derive(Debug, Clone, Default)]
pub struct CommandSchedule {
    commands: Vec<Command>,
    next_due: usize,
}

impl CommandSchedule {
    /// Build a schedule from pre-validated commands. Equal trigger times
    /// keep their arrival order (stable sort), so for the same vehicle at
    /// the same time the last record wins.
    pub fn new(mut commands: Vec<Command>) -> Self {
        commands.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { commands, next_due: 0 }
    }

    /// Load a schedule from a command file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| SimulatorError::Setup {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&contents))
    }

    /// Parse whitespace-separated `time uav_id target_x target_y` records,
    /// one per line. Records that do not parse or fail validation are
    /// dropped with a warning and the rest of the file is kept.
    pub fn parse(contents: &str) -> Self {
        let mut commands = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_record(line) {
                Some(cmd) if cmd.validate().is_ok() => commands.push(cmd),
                _ => warn!(line = index + 1, "dropping malformed command record"),
            }
        }
        Self::new(commands)
    }

    /// Commands that became due at or before `now` and have not been
    /// delivered yet. Each command is returned exactly once over the
    /// schedule's lifetime.
    pub fn take_due(&mut self, now: f64) -> &[Command] {
        let start = self.next_due;
        while self.next_due < self.commands.len() && self.commands[self.next_due].time <= now {
            self.next_due += 1;
        }
        &self.commands[start..self.next_due]
    }

    /// Number of commands not yet delivered.
    pub fn pending(&self) -> usize {
        self.commands.len() - self.next_due
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn parse_record(line: &str) -> Option<Command> {
    let mut fields = line.split_whitespace();
    let time = fields.next()?.parse().ok()?;
    let vehicle_id = fields.next()?.parse().ok()?;
    let target_x = fields.next()?.parse().ok()?;
    let target_y = fields.next()?.parse().ok()?;
    Some(Command { time, vehicle_id, target_x, target_y })
}
