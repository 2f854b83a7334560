/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Piece, PieceId, Square};

/// Represents a move made on a chess board: a piece, where it stood, and where it goes.
///
/// A [`Move`] names its piece by [`PieceId`], so a move generated on one copy of a [`crate::Board`]
/// can be applied to any other copy of it.
///
/// Special moves are not encoded; they are implied by the piece and its displacement.
/// A King moving two files is castling, and a Pawn moving diagonally onto an empty square is capturing en passant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    piece: PieceId,
    from: Square,
    to: Square,
}

impl Move {
    /// Creates a new [`Move`] of `piece`, from its current square to `to`.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Color, Move, PieceKind, Square};
    /// let mut board = Board::new(8).unwrap();
    /// let id = board.add_piece(PieceKind::Pawn, Color::White, Square::new(4, 6)).unwrap();
    /// let mv = Move::new(board.piece(id), Square::new(4, 4));
    /// assert_eq!(mv.piece(), id);
    /// assert_eq!(mv.from(), Square::new(4, 6));
    /// assert_eq!(mv.file_diff(), 0);
    /// assert_eq!(mv.rank_diff(), -2);
    /// ```
    #[inline(always)]
    pub const fn new(piece: &Piece, to: Square) -> Self {
        Self {
            piece: piece.id(),
            from: piece.square(),
            to,
        }
    }

    /// The piece being moved.
    #[inline(always)]
    pub const fn piece(&self) -> PieceId {
        self.piece
    }

    /// Where the piece stood when this move was generated.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Where the piece ends up.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Signed number of files travelled.
    #[inline(always)]
    pub const fn file_diff(&self) -> i8 {
        self.to.file() - self.from.file()
    }

    /// Signed number of ranks travelled.
    #[inline(always)]
    pub const fn rank_diff(&self) -> i8 {
        self.to.rank() - self.from.rank()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
