use std::fmt::{Display, Formatter};

use crate::action_log::{parse_log, LogEntry};
use crate::board::Board;
use crate::error::{GridError, ParseError};

/// A problem found while loading a log. The offending line was skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number, or 0 for the final propagation pass.
    pub line: usize,
    /// What went wrong.
    pub error: GridError,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// The result of [`Board::from_log`].
#[derive(Debug)]
pub struct LoadReport {
    /// The rebuilt board, propagated and ready to play.
    pub board: Board,
    /// Skipped lines, in file order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Board {
    /// Rebuild a board by replaying a text log through the creation and turn API.
    ///
    /// The first well-formed line must be a board header; if there is none this fails with
    /// [`ParseError::MissingInit`] (or the header's own error). Every later problem, from an unparsable line to a refused
    /// placement, is collected as a [`Diagnostic`] and loading carries on.
    ///
    /// Turns before the `Gen finished` marker are replayed as generation turns, later ones as player turns. The
    /// rebuilt board records its own, equivalent log.
    pub fn from_log(text: &str) -> Result<LoadReport, GridError> {
        let mut diagnostics = Vec::new();
        let mut lines = parse_log(text);

        let mut board = loop {
            match lines.next() {
                None => return Err(ParseError::MissingInit.into()),
                Some((_, Ok(LogEntry::Init { rows, cols }))) => break Board::new(rows, cols)?,
                Some((line, Ok(_))) => {
                    log::warn!("log line {}: expected a board header", line);
                    return Err(ParseError::MissingInit.into());
                }
                Some((line, Err(error))) => diagnostics.push(Diagnostic { line, error: error.into() }),
            }
        };

        let mut generated = false;
        for (line, entry) in lines {
            let applied = entry.map_err(GridError::from).and_then(|entry| match entry {
                LogEntry::Init { rows, cols } => Err(ParseError::RepeatedInit(format!("{rows}x{cols}")).into()),
                LogEntry::CreateNode { kind, position, sides } => board.create_node(position, kind, sides).map(|_| ()),
                LogEntry::Turn { position } => board.turn(position, generated).map(|_| ()),
                LogEntry::GenerationFinished => {
                    board.mark_generation_finished();
                    generated = true;
                    Ok(())
                }
            });

            if let Err(error) = applied {
                diagnostics.push(Diagnostic { line, error });
            }
        }

        if let Err(error) = board.init() {
            diagnostics.push(Diagnostic { line: 0, error });
        }

        for diagnostic in &diagnostics {
            log::warn!("log {}", diagnostic);
        }
        log::debug!("loaded {}x{} board with {} diagnostic(s)", board.rows(), board.cols(), diagnostics.len());

        Ok(LoadReport { board, diagnostics })
    }

    /// Record the end of generation; later turns are the player's.
    pub fn mark_generation_finished(&mut self) {
        self.log.append(LogEntry::GenerationFinished);
    }

    /// Undo the turn under the log cursor and move the cursor back.
    ///
    /// Only [`LogEntry::Turn`] entries can be stepped over, so undo stops at the end of generation. Returns whether
    /// anything was undone.
    pub fn step_back(&mut self) -> bool {
        let Some(LogEntry::Turn { position }) = self.log.current().copied() else {
            return false;
        };

        self.log.disable();
        let undone = self.turn_back(position, true).is_ok();
        self.log.previous();
        self.log.enable();

        undone
    }

    /// Move the log cursor forward and redo the turn found there. Returns whether the cursor moved.
    pub fn step_forward(&mut self) -> bool {
        if !self.log.next() {
            return false;
        }

        if let Some(LogEntry::Turn { position }) = self.log.current().copied() {
            self.log.disable();
            if let Err(error) = self.turn(position, true) {
                log::warn!("cannot redo turn: {}", error);
            }
            self.log.enable();
        }

        true
    }
}
