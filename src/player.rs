/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{Read, Write};

use anyhow::{bail, Context, Result};

use crate::{Board, Color, Move, PieceId, PieceKind, Position, Search, SearchConfig, Square};

/// Something that can take turns in a game: a person at a terminal, or the search.
pub trait Player {
    /// The color of the pieces this player moves.
    fn color(&self) -> Color;

    /// Picks a legal move for [`Player::color`] on `board`.
    ///
    /// Returns `Ok(None)` if there is no move to make.
    fn choose_move(&mut self, board: &Board) -> Result<Option<Move>>;

    /// Picks the kind that the Pawn `pawn`, which just reached its promotion rank, turns into.
    ///
    /// Must be a kind for which [`PieceKind::is_promotion`] holds.
    fn choose_promotion(&mut self, board: &Board, pawn: PieceId) -> Result<PieceKind>;

    /// Whether this player needs to see the board before moving.
    fn is_human(&self) -> bool {
        false
    }
}

/// A player whose moves are chosen by a minimax [`Search`].
///
/// Always promotes to a Queen.
#[derive(Debug, Clone, Copy)]
pub struct AiPlayer {
    color: Color,
    config: SearchConfig,
}

impl AiPlayer {
    /// Creates an automated player for `color` that looks `max_depth` plies past its own move.
    ///
    /// # Example
    /// ```
    /// # use newt::{AiPlayer, Color, Layout, Player};
    /// let mut ai = AiPlayer::new(Color::White, 1).unwrap();
    /// let board = Layout::Standard.board();
    /// let mv = ai.choose_move(&board).unwrap().unwrap();
    /// assert!(board.is_legal(&mv));
    ///
    /// assert!(AiPlayer::new(Color::Black, 0).is_err());
    /// ```
    pub fn new(color: Color, max_depth: usize) -> Result<Self> {
        let config = SearchConfig::new(max_depth)
            .with_context(|| format!("Failed to create automated {color} player"))?;
        Ok(Self { color, config })
    }

    #[inline(always)]
    pub const fn config(&self) -> SearchConfig {
        self.config
    }
}

impl Player for AiPlayer {
    #[inline(always)]
    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self, board: &Board) -> Result<Option<Move>> {
        let root = Position::new(board.clone(), self.color);
        let result = Search::new(&root, self.config).start();
        Ok(result.bestmove)
    }

    #[inline(always)]
    fn choose_promotion(&mut self, _board: &Board, _pawn: PieceId) -> Result<PieceKind> {
        Ok(PieceKind::Queen)
    }
}

/// A person, answering prompts written to `output` by typing into `input`.
///
/// Squares are entered as `<file> <rank>`, such as `4 6`.
/// Invalid answers are reported and the question is asked again. Running out of input is an error.
///
/// Input is consumed one line at a time and never read ahead, so two players may take turns on the same stream.
/// Given [`std::io::Stdin`], the lock on stdin is only held while a line is being read.
pub struct HumanPlayer<R, W> {
    color: Color,
    input: R,
    output: W,
}

impl<R: Read, W: Write> HumanPlayer<R, W> {
    /// Creates a player for `color` that reads answers from `input` and writes prompts to `output`.
    pub fn new(color: Color, input: R, output: W) -> Self {
        Self {
            color,
            input,
            output,
        }
    }

    /// Consumes this player, returning its input and output.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Writes `prompt` and reads one trimmed line of input.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}").context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush prompt")?;

        let mut line = Vec::new();
        let mut ended = true;
        for byte in self.input.by_ref().bytes() {
            let byte = byte.context("Failed to read from input")?;
            if byte == b'\n' {
                ended = false;
                break;
            }
            line.push(byte);
        }

        if ended && line.is_empty() {
            bail!("Input ended while waiting for {} to move", self.color);
        }

        let line = String::from_utf8(line).context("Input is not valid UTF-8")?;
        Ok(line.trim().to_string())
    }

    /// Tells the player what was wrong with their last answer.
    fn complain(&mut self, complaint: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{complaint}").context("Failed to write to output")
    }

    /// Asks for a square until one on the board is given.
    fn ask_square(&mut self, board: &Board, prompt: &str) -> Result<Square> {
        loop {
            let answer = self.ask(prompt)?;
            match answer.parse::<Square>() {
                Ok(square) if board.contains(square) => return Ok(square),
                Ok(square) => self.complain(format_args!(
                    "{square} is not on the board. Enter numbers between 0 and {}.",
                    board.max()
                ))?,
                Err(e) => self.complain(format_args!("{e:#}"))?,
            }
        }
    }

    /// Asks for one of our pieces that has at least one legal move.
    fn ask_piece(&mut self, board: &Board) -> Result<(PieceId, Vec<Square>)> {
        loop {
            let prompt = "Which piece would you like to move? (file rank) >> ";
            let square = self.ask_square(board, prompt)?;

            let Some(piece) = board.piece_at(square) else {
                self.complain("There's no piece there!")?;
                continue;
            };

            if piece.color() != self.color {
                self.complain("That's not yours to move!")?;
                continue;
            }

            let moves = board.legal_moves_for(piece.id());
            if moves.is_empty() {
                self.complain(format_args!("Your {} on {square} cannot move.", piece.kind()))?;
                continue;
            }

            return Ok((piece.id(), moves));
        }
    }
}

impl<R: Read, W: Write> Player for HumanPlayer<R, W> {
    #[inline(always)]
    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self, board: &Board) -> Result<Option<Move>> {
        if !board.has_legal_moves(self.color) {
            return Ok(None);
        }

        let (id, moves) = self.ask_piece(board)?;

        let mut listing = String::from("Valid destinations are:");
        for &to in &moves {
            listing.push_str(&format!(" {to}"));
            if board.is_attacked(to, self.color) {
                listing.push_str(" (under attack!)");
            }
        }
        writeln!(self.output, "{listing}").context("Failed to write to output")?;

        loop {
            let to = self.ask_square(board, "Where would you like to move it? (file rank) >> ")?;
            if moves.contains(&to) {
                return Ok(Some(Move::new(board.piece(id), to)));
            }

            self.complain("You cannot move there. Pick one of the valid destinations.")?;
        }
    }

    fn choose_promotion(&mut self, _board: &Board, _pawn: PieceId) -> Result<PieceKind> {
        loop {
            let answer = self.ask("Please select which to promote to (Q, N, R, B) >> ")?;

            let mut chars = answer.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if let Ok(kind) = PieceKind::from_char(c) {
                    if kind.is_promotion() {
                        return Ok(kind);
                    }
                }
            }

            self.complain("Please enter Q, N, R, or B.")?;
        }
    }

    #[inline(always)]
    fn is_human(&self) -> bool {
        true
    }
}
