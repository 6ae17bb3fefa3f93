use std::fmt::{Display, Formatter};
use std::io;
use std::str::FromStr;

use crate::error::ParseError;
use crate::node::NodeKind;
use crate::position::{parse_pair, Position};
use crate::side::Sides;

/// One recorded action. Each entry renders to, and parses from, a single line:
///
/// | entry | line |
/// |---|---|
/// | [`Init`](Self::Init) | `G [4@4]` |
/// | [`CreateNode`](Self::CreateNode) | `N {P[2@2][EAST,SOUTH]}` |
/// | [`Turn`](Self::Turn) | `T [2@2]` |
/// | [`GenerationFinished`](Self::GenerationFinished) | `Gen finished` |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogEntry {
    /// A new board of the given size.
    Init {
        /// Board rows.
        rows: usize,
        /// Board columns.
        cols: usize,
    },
    /// A node placed on the board.
    CreateNode {
        /// What was placed.
        kind: NodeKind,
        /// Where.
        position: Position,
        /// Its connectors as placed.
        sides: Sides,
    },
    /// One clockwise turn.
    Turn {
        /// The turned node.
        position: Position,
    },
    /// Everything after this marker was done by the player.
    GenerationFinished,
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init { rows, cols } => write!(f, "G [{rows}@{cols}]"),
            Self::CreateNode { kind, position, sides } => write!(f, "N {{{kind}{position}[{sides}]}}"),
            Self::Turn { position } => write!(f, "T {position}"),
            Self::GenerationFinished => write!(f, "Gen finished"),
        }
    }
}

impl FromStr for LogEntry {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (tag, rest) = line.split_once(' ').unwrap_or((line, ""));

        match tag {
            "G" => {
                let (rows, cols) = parse_pair(rest)?;
                Ok(Self::Init { rows, cols })
            }
            "N" => parse_node(rest.trim()),
            "T" => Ok(Self::Turn { position: rest.parse()? }),
            // the marker's wording after the tag is free text
            "Gen" => Ok(Self::GenerationFinished),
            _ => Err(ParseError::Line(line.to_owned())),
        }
    }
}

/// `{K[row@col][SIDE,SIDE,...]}`
fn parse_node(s: &str) -> Result<LogEntry, ParseError> {
    let malformed = || ParseError::Node(s.to_owned());

    let body = s.strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(malformed)?;
    let position_start = body.find('[').ok_or_else(malformed)?;
    let position_end = body.find(']').filter(|end| *end > position_start).ok_or_else(malformed)?;

    let kind = NodeKind::parse(&body[..position_start])?;
    let position = body[position_start..=position_end].parse()?;
    let sides = body[position_end + 1..]
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(malformed)?
        .parse()?;

    Ok(LogEntry::CreateNode { kind, position, sides })
}

/// Parse a whole log, one entry per non-blank line.
///
/// Yields `(line number, result)` with 1-based line numbers, so a bad line can be reported and skipped.
pub fn parse_log(text: &str) -> impl Iterator<Item = (usize, Result<LogEntry, ParseError>)> + '_ {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line.parse()))
}

/// An ordered record of actions with a replay cursor.
///
/// Appending while the cursor is behind the tail discards everything after the cursor first, the usual
/// "a new edit drops the redo history" rule. The log only records what happened; undoing a [`LogEntry::Turn`] is up
/// to the caller (see [`Board::step_back`](crate::Board::step_back)).
#[derive(Clone, Debug)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
    cursor: usize,
    enabled: bool,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            enabled: true,
        }
    }
}

impl ActionLog {
    /// An empty, enabled log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `entry` at the cursor. Returns false, and records nothing, while disabled.
    pub fn append(&mut self, entry: LogEntry) -> bool {
        if !self.enabled {
            return false;
        }

        if self.cursor + 1 < self.entries.len() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Move the cursor one entry back. Returns false at the first entry.
    pub fn previous(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            return true;
        }
        false
    }

    /// Move the cursor one entry forward. Returns false at the last entry.
    pub fn next(&mut self) -> bool {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            return true;
        }
        false
    }

    /// Suspend recording, e.g. while replaying recorded actions.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Resume recording after [`disable`](Self::disable).
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Whether [`append`](Self::append) currently records.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Drop every entry and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&LogEntry> {
        self.entries.get(self.cursor)
    }

    /// Index of the current entry.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Every entry, oldest first, including any ahead of the cursor.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry, one per line.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{entry}")?;
        }
        writer.flush()
    }
}

impl Display for ActionLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
