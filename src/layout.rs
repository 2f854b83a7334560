/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Board, Color, PieceKind, Square};

/// Order of the pieces on a back rank, from file 0.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Starting positions a game can be played from.
///
/// Besides the standard setup, there are a few small positions that get to a special rule in a move or two.
/// All of them are on an `8x8` board, and White always moves first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// The standard chess setup.
    #[default]
    Standard,

    /// Black's King, already mated by a Queen guarded by White's King.
    ///
    /// Meant to be played from Black's turn. With White to move, the Black King can simply be taken.
    Checkmate,

    /// Black's King in a corner with no moves, while not in check.
    Stalemate,

    /// A White Pawn that can double-step past a Black Pawn.
    EnPassant,

    /// A Pawn of each color, one step from promoting.
    Promotion,
}

impl Layout {
    /// All layouts.
    #[inline(always)]
    pub const fn all() -> [Self; 5] {
        [
            Self::Standard,
            Self::Checkmate,
            Self::Stalemate,
            Self::EnPassant,
            Self::Promotion,
        ]
    }

    /// Sets up a fresh board in this layout.
    ///
    /// Pieces are placed in a fixed order, which fixes the order moves are generated in.
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Layout, PieceKind, Square};
    /// let board = Layout::Standard.board();
    /// assert_eq!(board.pieces().count(), 32);
    /// assert_eq!(board.piece_at(Square::new(4, 7)).unwrap().kind(), PieceKind::King);
    /// assert_eq!(board.piece_at(Square::new(3, 0)).unwrap().color(), Color::Black);
    /// ```
    pub fn board(&self) -> Board {
        let mut board = Board::default();
        let mut place = |kind, color, file, rank| {
            board.place(kind, color, Square::new(file, rank));
        };

        match self {
            Self::Standard => {
                for (color, pawn_rank, back_rank) in [(Color::White, 6, 7), (Color::Black, 1, 0)] {
                    for file in 0..8 {
                        place(PieceKind::Pawn, color, file, pawn_rank);
                    }
                    for (file, kind) in (0..).zip(BACK_RANK) {
                        place(kind, color, file, back_rank);
                    }
                }
            }

            Self::Checkmate => {
                place(PieceKind::King, Color::White, 2, 2);
                place(PieceKind::Queen, Color::White, 2, 1);
                place(PieceKind::King, Color::Black, 2, 0);
            }

            Self::Stalemate => {
                place(PieceKind::King, Color::White, 4, 1);
                place(PieceKind::Queen, Color::White, 6, 2);
                place(PieceKind::King, Color::Black, 7, 0);
            }

            Self::EnPassant => {
                place(PieceKind::Pawn, Color::White, 0, 6);
                place(PieceKind::Pawn, Color::Black, 1, 4);
                place(PieceKind::King, Color::White, 7, 7);
                place(PieceKind::King, Color::Black, 0, 0);
            }

            Self::Promotion => {
                place(PieceKind::King, Color::White, 3, 3);
                place(PieceKind::King, Color::Black, 1, 5);
                place(PieceKind::Pawn, Color::White, 1, 1);
                place(PieceKind::Pawn, Color::Black, 6, 6);
            }
        }

        board
    }

    /// A short, lowercase name for this layout.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
            Self::EnPassant => "en-passant",
            Self::Promotion => "promotion",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
