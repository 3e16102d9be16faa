use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Column bucket a task occupies on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Task is waiting to be picked up.
    #[default]
    Todo,
    /// Task is actively being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

impl Status {
    /// Fixed column order of the board. Flattened views and keyboard
    /// navigation follow this sequence.
    pub const COLUMNS: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// String representation used in serialized records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Human-readable column title.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Emoji marker used by the Markdown export.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Todo => "⏳",
            Self::InProgress => "🔄",
            Self::Done => "✅",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a token that names no status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid status: {token}")]
pub struct ParseStatusError {
    /// The rejected input token.
    pub token: String,
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseStatusError { token: s.to_owned() }),
        }
    }
}

/// Priority level of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// The default for records that never declared one.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// String representation used in serialized records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Emoji marker used by the Markdown export.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Low => "🟢",
            Self::Medium => "🟡",
            Self::High => "🔴",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a token that names no priority.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid priority: {token}")]
pub struct ParsePriorityError {
    /// The rejected input token.
    pub token: String,
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError { token: s.to_owned() }),
        }
    }
}
