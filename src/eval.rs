/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::HashMap, fmt};

use crate::{Board, Color, PieceKind, Score, Square};

/// Value of a King, in [`Score`] units.
const KING_WEIGHT: i32 = 2000;

/// Value of a Queen, in [`Score`] units.
const QUEEN_WEIGHT: i32 = 90;

/// Value of a Rook, in [`Score`] units.
const ROOK_WEIGHT: i32 = 50;

/// Shared value of a Bishop or a Knight, in [`Score`] units.
const MINOR_WEIGHT: i32 = 30;

/// Value of a Pawn, in [`Score`] units.
const PAWN_WEIGHT: i32 = 10;

/// Penalty for every doubled or isolated Pawn, in [`Score`] units.
const WEAK_PAWN_PENALTY: i32 = 5;

/// Bonus for every square a piece could move to, in [`Score`] units.
const MOBILITY_WEIGHT: i32 = 1;

/// The raw ingredients of an evaluation, for one side.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Terms {
    pub kings: i32,
    pub queens: i32,
    pub rooks: i32,
    pub bishops: i32,
    pub knights: i32,
    pub pawns: i32,

    /// Sum, over files holding more than one of this side's Pawns, of the number of Pawns on that file.
    pub doubled: i32,

    /// Pawns with no friendly Pawn on any of the eight surrounding squares.
    pub isolated: i32,

    /// Number of candidate destinations of every living piece, before legality filtering.
    pub mobility: i32,
}

impl Terms {
    /// Weighted sum of these terms.
    #[inline(always)]
    pub const fn score(&self) -> Score {
        Score(
            KING_WEIGHT * self.kings
                + QUEEN_WEIGHT * self.queens
                + ROOK_WEIGHT * self.rooks
                + MINOR_WEIGHT * (self.bishops + self.knights)
                + PAWN_WEIGHT * self.pawns
                - WEAK_PAWN_PENALTY * (self.doubled + self.isolated)
                + MOBILITY_WEIGHT * self.mobility,
        )
    }
}

/// Encapsulates the logic of scoring a chess position.
///
/// Evaluation is always relative: a positive score is good for the side it is computed for,
/// and a negative one is good for its opponent. It does not depend on whose turn it is.
///
/// In Pawns, the score for `me` is
/// ```text
/// 200(K - K') + 9(Q - Q') + 5(R - R') + 3(B - B' + N - N') + (P - P')
///     - 0.5(D - D' + I - I') + 0.1(M - M')
/// ```
/// where `D`, `I` and `M` are doubled Pawns, isolated Pawns and mobility.
/// [`Score`] counts in tenths, so every term is exact.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    /// The board to evaluate.
    board: &'a Board,
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`] for `board`.
    #[inline(always)]
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Evaluate this board from `color`'s perspective.
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Evaluator, Layout, Score};
    /// let board = Layout::Standard.board();
    /// let eval = Evaluator::new(&board);
    /// assert_eq!(eval.eval_for(Color::White), Score::DRAW);
    /// ```
    #[inline(always)]
    pub fn eval_for(&self, color: Color) -> Score {
        self.terms(color).score() - self.terms(color.opponent()).score()
    }

    /// Collects the evaluation terms of `color`'s living pieces.
    pub fn terms(&self, color: Color) -> Terms {
        let mut terms = Terms::default();
        let mut pawns_per_file = HashMap::<i8, i32>::new();

        for piece in self.board.pieces_of(color) {
            match piece.kind() {
                PieceKind::King => terms.kings += 1,
                PieceKind::Queen => terms.queens += 1,
                PieceKind::Rook => terms.rooks += 1,
                PieceKind::Bishop => terms.bishops += 1,
                PieceKind::Knight => terms.knights += 1,
                PieceKind::Pawn => {
                    terms.pawns += 1;
                    *pawns_per_file.entry(piece.square().file()).or_default() += 1;

                    if self.is_isolated(piece.square(), color) {
                        terms.isolated += 1;
                    }
                }
            }

            terms.mobility += piece.pseudo_legal_moves(self.board).len() as i32;
        }

        terms.doubled = pawns_per_file.values().filter(|&&count| count > 1).sum();

        terms
    }

    /// Returns `true` if none of the eight squares around `square` holds a Pawn of `color`.
    fn is_isolated(&self, square: Square, color: Color) -> bool {
        !(-1..=1)
            .flat_map(|df| (-1..=1).map(move |dr| (df, dr)))
            .filter(|&offset| offset != (0, 0))
            .filter_map(|(df, dr)| self.board.piece_at(square.offset(df, dr)))
            .any(|neighbour| neighbour.is_pawn() && neighbour.color() == color)
    }
}

impl fmt::Display for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10} {:>6} {:>6}", "", Color::White, Color::Black)?;

        let white = self.terms(Color::White);
        let black = self.terms(Color::Black);
        let rows = [
            ("kings", white.kings, black.kings),
            ("queens", white.queens, black.queens),
            ("rooks", white.rooks, black.rooks),
            ("bishops", white.bishops, black.bishops),
            ("knights", white.knights, black.knights),
            ("pawns", white.pawns, black.pawns),
            ("doubled", white.doubled, black.doubled),
            ("isolated", white.isolated, black.isolated),
            ("mobility", white.mobility, black.mobility),
        ];

        for (name, w, b) in rows {
            writeln!(f, "{name:>10} {w:>6} {b:>6}")?;
        }

        write!(f, "Score (white): {}", self.eval_for(Color::White))
    }
}
