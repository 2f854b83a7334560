/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, io::Write};

use anyhow::{ensure, Context, Result};

use crate::{Board, Color, GameStatus, Move, Player};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// `loser` was checkmated (or, from a malformed start, lost its King).
    Checkmate { loser: Color },

    /// `color` had no legal moves but was not in check.
    Stalemate { color: Color },

    /// `color`'s player could not come up with a move.
    NoMoveAvailable { color: Color },

    /// The game reached its ply limit before ending on the board.
    PlyLimit,
}

impl GameOutcome {
    /// The color that won, if any.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        match self {
            Self::Checkmate { loser } => Some(loser.opponent()),
            _ => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { loser } => {
                write!(f, "Checkmate! {} wins.", loser.opponent())
            }
            Self::Stalemate { color } => write!(f, "Stalemate! {color} cannot move."),
            Self::NoMoveAvailable { color } => write!(f, "{color} has no move to make."),
            Self::PlyLimit => write!(f, "Ply limit reached."),
        }
    }
}

/// Plays a game between two [`Player`]s on a live [`Board`].
///
/// The engine is the only thing that ever modifies the live board.
/// Players only ever see it by reference, and the search works on copies of it.
pub struct Engine<W> {
    /// The board being played on.
    board: Board,

    /// The players, indexed by [`Color::index`].
    players: [Box<dyn Player>; Color::COUNT],

    /// Whose turn it is.
    to_move: Color,

    /// Every move played so far.
    history: Vec<Move>,

    /// If set, the game ends after this many plies.
    max_plies: Option<usize>,

    /// Where the board and the outcome are printed.
    output: W,
}

impl<W: Write> Engine<W> {
    /// Sets up a game on `board`, with White to move first.
    ///
    /// Fails if `white` and `black` do not play the colors they are seated at.
    pub fn new(
        board: Board,
        white: Box<dyn Player>,
        black: Box<dyn Player>,
        output: W,
    ) -> Result<Self> {
        ensure!(
            white.color() == Color::White && black.color() == Color::Black,
            "Players are seated at the wrong colors: {} is playing White and {} is playing Black",
            white.color(),
            black.color()
        );

        Ok(Self {
            board,
            players: [white, black],
            to_move: Color::White,
            history: Vec::new(),
            max_plies: None,
            output,
        })
    }

    /// Ends the game after `max_plies` plies, if set.
    pub fn with_max_plies(mut self, max_plies: Option<usize>) -> Self {
        self.max_plies = max_plies;
        self
    }

    /// Lets `color` move first.
    pub fn starting_with(mut self, color: Color) -> Self {
        self.to_move = color;
        self
    }

    /// The live board.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Whose turn it is.
    #[inline(always)]
    pub const fn to_move(&self) -> Color {
        self.to_move
    }

    /// Every move played so far, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Consumes the engine, returning its output.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Plays one turn.
    ///
    /// Returns the outcome if the game is over instead.
    pub fn step(&mut self) -> Result<Option<GameOutcome>> {
        if self.max_plies.is_some_and(|max| self.history.len() >= max) {
            return Ok(Some(GameOutcome::PlyLimit));
        }

        let color = self.to_move;
        let player = &mut self.players[color.index()];

        if player.is_human() {
            writeln!(self.output, "{}\n", self.board).context("Failed to print board")?;
        }

        if self.board.king_of(color).is_none() {
            return Ok(Some(GameOutcome::Checkmate { loser: color }));
        }

        match self.board.status(color) {
            GameStatus::Checkmate => return Ok(Some(GameOutcome::Checkmate { loser: color })),
            GameStatus::Stalemate => return Ok(Some(GameOutcome::Stalemate { color })),
            GameStatus::Ongoing => {}
        }

        let Some(mv) = player
            .choose_move(&self.board)
            .with_context(|| format!("{color} failed to choose a move"))?
        else {
            tracing::warn!(color = %color, "Player chose no move despite having legal moves");
            return Ok(Some(GameOutcome::NoMoveAvailable { color }));
        };

        let promoted = self
            .board
            .make_move_checked(&mv)
            .with_context(|| format!("{color} chose an illegal move"))?;

        if let Some(pawn) = promoted {
            let kind = player.choose_promotion(&self.board, pawn)?;
            self.board.promote(pawn, kind)?;
            tracing::info!(color = %color, kind = %kind, "Pawn promoted");
        }

        tracing::info!(color = %color, mv = %mv, ply = self.history.len() + 1, "Move played");
        self.history.push(mv);
        self.to_move = color.opponent();

        Ok(None)
    }

    /// Plays turns until the game is over, then prints the final board and the outcome.
    pub fn run(&mut self) -> Result<GameOutcome> {
        let outcome = loop {
            if let Some(outcome) = self.step()? {
                break outcome;
            }
        };

        tracing::info!(plies = self.history.len(), outcome = %outcome, "Game over");
        writeln!(self.output, "{}\n\n{outcome}", self.board).context("Failed to print outcome")?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{AiPlayer, HumanPlayer, Layout, PieceKind, Square};

    fn ai(color: Color, depth: usize) -> Box<dyn Player> {
        Box::new(AiPlayer::new(color, depth).unwrap())
    }

    fn human(color: Color, input: &str) -> Box<dyn Player> {
        Box::new(HumanPlayer::new(
            color,
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        ))
    }

    #[test]
    fn test_players_must_match_their_seats() {
        let board = Layout::Standard.board();
        let swapped = Engine::new(board, ai(Color::Black, 1), ai(Color::White, 1), Vec::new());
        assert!(swapped.is_err());
    }

    #[test]
    fn test_checkmate_layout_ends_in_checkmate() {
        let mut engine = Engine::new(
            Layout::Checkmate.board(),
            ai(Color::White, 1),
            ai(Color::Black, 1),
            Vec::new(),
        )
        .unwrap()
        .with_max_plies(Some(10));

        let outcome = engine.run().unwrap();
        assert_eq!(outcome, GameOutcome::Checkmate { loser: Color::Black });
        assert_eq!(outcome.winner(), Some(Color::White));

        let output = String::from_utf8(engine.into_output()).unwrap();
        assert!(output.ends_with("Checkmate! white wins.\n"));
    }

    #[test]
    fn test_stalemate_is_reported() {
        let mut engine = Engine::new(
            Layout::Stalemate.board(),
            ai(Color::White, 1),
            ai(Color::Black, 1),
            Vec::new(),
        )
        .unwrap()
        .starting_with(Color::Black);

        assert_eq!(
            engine.step().unwrap(),
            Some(GameOutcome::Stalemate { color: Color::Black })
        );
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_ply_limit() {
        let mut engine = Engine::new(
            Layout::Standard.board(),
            ai(Color::White, 1),
            ai(Color::Black, 1),
            Vec::new(),
        )
        .unwrap()
        .with_max_plies(Some(2));

        assert_eq!(engine.run().unwrap(), GameOutcome::PlyLimit);
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.to_move(), Color::White);
    }

    #[test]
    fn test_humans_play_en_passant() {
        let mut engine = Engine::new(
            Layout::EnPassant.board(),
            human(Color::White, "0 6\n0 4\n"),
            human(Color::Black, "1 4\n0 5\n"),
            Vec::new(),
        )
        .unwrap()
        .with_max_plies(Some(2));

        assert_eq!(engine.run().unwrap(), GameOutcome::PlyLimit);

        let board = engine.board();
        assert!(board.piece_at(Square::new(0, 4)).is_none());
        assert_eq!(board.count(Color::White, PieceKind::Pawn), 0);
        assert_eq!(board.piece_at(Square::new(0, 5)).unwrap().color(), Color::Black);
    }

    #[test]
    fn test_human_chooses_promotion() {
        let mut engine = Engine::new(
            Layout::Promotion.board(),
            human(Color::White, "1 1\n1 0\nr\n"),
            ai(Color::Black, 1),
            Vec::new(),
        )
        .unwrap()
        .with_max_plies(Some(1));

        assert_eq!(engine.run().unwrap(), GameOutcome::PlyLimit);
        assert_eq!(
            engine.board().piece_at(Square::new(1, 0)).unwrap().kind(),
            PieceKind::Rook
        );
    }

    #[test]
    fn test_human_running_out_of_input_is_an_error() {
        let mut engine = Engine::new(
            Layout::Standard.board(),
            human(Color::White, ""),
            ai(Color::Black, 1),
            Vec::new(),
        )
        .unwrap();

        assert!(engine.run().is_err());
    }
}
