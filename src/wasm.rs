//! Browser bindings. The display layer owns a [`Puzzle`], forwards clicks and undo/redo buttons to it and reads node
//! state back for drawing.

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::replay::Diagnostic;
use crate::generator::Generator;
use crate::position::Position;

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// A generated or loaded board, driven from JavaScript.
#[wasm_bindgen]
pub struct Puzzle {
    board: Board,
    diagnostics: Vec<Diagnostic>,
}

#[wasm_bindgen]
impl Puzzle {
    /// Generate a puzzle for the named tier. Unknown names get the default 8x8 board.
    #[wasm_bindgen(constructor)]
    pub fn new(tier: &str) -> Result<Puzzle, JsValue> {
        // f64 in [0, 1) spread over the u64 range
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let board = Generator::seeded(seed).generate(tier).map_err(to_js)?;
        Ok(Self { board, diagnostics: Vec::new() })
    }

    /// Rebuild a puzzle from a saved log. Lines that could not be replayed are skipped and listed by
    /// [`diagnostics`](Self::diagnostics).
    #[wasm_bindgen(js_name = fromLog)]
    pub fn from_log(text: &str) -> Result<Puzzle, JsValue> {
        let report = Board::from_log(text).map_err(to_js)?;
        Ok(Self { board: report.board, diagnostics: report.diagnostics })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    /// A player turn of the node at (`row`, `col`).
    pub fn turn(&mut self, row: usize, col: usize) -> Result<bool, JsValue> {
        self.board.turn(Position(row, col), true).map_err(to_js)
    }

    /// Problems found by [`from_log`](Self::from_log), as `"line N: message"` strings. Line 0 is the final
    /// propagation pass. Empty for generated puzzles.
    pub fn diagnostics(&self) -> Array {
        self.diagnostics.iter().map(|diagnostic| JsValue::from_str(&diagnostic.to_string())).collect()
    }

    /// Undo the last player turn.
    pub fn undo(&mut self) -> bool {
        self.board.step_back()
    }

    /// Redo the next player turn.
    pub fn redo(&mut self) -> bool {
        self.board.step_forward()
    }

    /// Whether every bulb is lit.
    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.board.is_complete()
    }

    /// `"P"`, `"L"`, `"B"` or `"E"`.
    pub fn kind(&self, row: usize, col: usize) -> Result<String, JsValue> {
        Ok(self.board.node(Position(row, col)).map_err(to_js)?.kind().to_string())
    }

    /// Side names the node currently connects, e.g. `["NORTH", "EAST"]`.
    pub fn sides(&self, row: usize, col: usize) -> Result<Array, JsValue> {
        let node = self.board.node(Position(row, col)).map_err(to_js)?;
        Ok(node.sides().iter().map(|side| JsValue::from_str(&side.to_string())).collect())
    }

    /// Whether the node at (`row`, `col`) is lit.
    pub fn powered(&self, row: usize, col: usize) -> Result<bool, JsValue> {
        Ok(self.board.node(Position(row, col)).map_err(to_js)?.is_powered())
    }

    /// Net player turns made on the node.
    #[wasm_bindgen(js_name = rotationCount)]
    pub fn rotation_count(&self, row: usize, col: usize) -> Result<i32, JsValue> {
        Ok(self.board.node(Position(row, col)).map_err(to_js)?.rotation_count())
    }

    /// Clockwise turns left until the node is back in its solved orientation.
    #[wasm_bindgen(js_name = turnsToInitialState)]
    pub fn turns_to_initial_state(&self, row: usize, col: usize) -> Result<u8, JsValue> {
        Ok(self.board.node(Position(row, col)).map_err(to_js)?.turns_to_initial_state())
    }

    /// The action log, one entry per line, ready to be saved.
    pub fn log(&self) -> String {
        self.board.log().to_string()
    }
}
