/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, ensure, Result};

use super::{Board, Color, Move, Piece, PieceId, Square};

/// Whether a side can keep playing, from that side's point of view.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GameStatus {
    /// The side has at least one legal move.
    Ongoing,

    /// The side is in check and has no legal moves.
    Checkmate,

    /// The side is not in check and has no legal moves.
    Stalemate,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Ongoing => "ongoing",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
        };
        write!(f, "{status}")
    }
}

impl Board {
    /// Returns `true` if moving `piece` to `to` does not leave its own King attacked.
    ///
    /// The move is tried on a throwaway copy of this board.
    ///
    /// # Panics
    /// If `piece`'s side has no King after the move. Every side must always have a King during play.
    fn keeps_king_safe(&self, piece: &Piece, to: Square) -> bool {
        let color = piece.color();
        let after = self.with_move_made(Move::new(piece, to));

        let Some(king) = after.king_of(color) else {
            tracing::error!(
                color = %color,
                piece = %piece,
                to = %to,
                "No King found while filtering moves for legality"
            );
            panic!("{color} has no King on the board; cannot filter its moves for legality");
        };

        !after.is_attacked(king.square(), color)
    }

    /// Every square the piece `id` may legally move to: its aggressive moves, then its quiet moves,
    /// without those that leave its King attacked.
    ///
    /// A captured piece has no legal moves.
    pub fn legal_moves_for(&self, id: PieceId) -> Vec<Square> {
        let piece = self.piece(id);
        piece
            .pseudo_legal_moves(self)
            .into_iter()
            .filter(|&to| self.keeps_king_safe(piece, to))
            .collect()
    }

    /// All legal moves of `color`, piece by piece in the order the pieces were added.
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Layout};
    /// let board = Layout::Standard.board();
    /// assert_eq!(board.legal_moves(Color::White).len(), 20);
    /// ```
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.pieces_of(color)
            .flat_map(|piece| {
                self.legal_moves_for(piece.id())
                    .into_iter()
                    .map(move |to| Move::new(piece, to))
            })
            .collect()
    }

    /// Returns `true` if `color` has at least one legal move.
    ///
    /// Stops at the first one found.
    pub fn has_legal_moves(&self, color: Color) -> bool {
        self.pieces_of(color).any(|piece| {
            piece
                .pseudo_legal_moves(self)
                .into_iter()
                .any(|to| self.keeps_king_safe(piece, to))
        })
    }

    /// Returns `true` if `color`'s King is attacked.
    ///
    /// A side without a King is never in check.
    #[inline(always)]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_of(color)
            .is_some_and(|king| self.is_attacked(king.square(), color))
    }

    /// Returns `true` if `mv` can be played on this board.
    ///
    /// The piece must be alive and still on `mv.from()`, and `mv.to()` must be one of its legal moves.
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.get_piece(mv.piece()).is_some_and(|piece| {
            piece.is_alive()
                && piece.square() == mv.from()
                && self.legal_moves_for(piece.id()).contains(&mv.to())
        })
    }

    /// Returns `true` if `color` is in check and has no legal moves.
    #[inline(always)]
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_moves(color)
    }

    /// Returns `true` if `color` is not in check but has no legal moves.
    #[inline(always)]
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.has_legal_moves(color) && !self.is_in_check(color)
    }

    /// Classifies the game from `color`'s point of view.
    pub fn status(&self, color: Color) -> GameStatus {
        if self.has_legal_moves(color) {
            GameStatus::Ongoing
        } else if self.is_in_check(color) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    }

    /// Applies `mv` if it is legal, otherwise returns an error and leaves the board untouched.
    ///
    /// On success, returns the id of a Pawn awaiting promotion, exactly like [`Board::make_move`].
    ///
    /// # Example
    /// ```
    /// # use newt::{Layout, Move, Square};
    /// let mut board = Layout::Standard.board();
    /// let knight = *board.piece_at(Square::new(1, 7)).unwrap();
    ///
    /// let illegal = Move::new(&knight, Square::new(1, 5));
    /// assert!(board.make_move_checked(&illegal).is_err());
    ///
    /// let legal = Move::new(&knight, Square::new(2, 5));
    /// assert_eq!(board.make_move_checked(&legal).unwrap(), None);
    /// ```
    pub fn make_move_checked(&mut self, mv: &Move) -> Result<Option<PieceId>> {
        let Some(piece) = self.get_piece(mv.piece()) else {
            bail!("Cannot play {mv}: there is no piece {} on this board", mv.piece());
        };
        ensure!(
            piece.is_alive(),
            "Cannot play {mv}: the {} {} has been captured",
            piece.color(),
            piece.kind()
        );
        ensure!(
            piece.square() == mv.from(),
            "Cannot play {mv}: the piece is on {}, not {}",
            piece.square(),
            mv.from()
        );
        ensure!(
            self.legal_moves_for(piece.id()).contains(&mv.to()),
            "Illegal move {mv} for {piece}"
        );

        Ok(self.make_move(*mv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    fn board(diagram: &str) -> Board {
        diagram.parse().unwrap()
    }

    #[test]
    fn test_pinned_piece_cannot_move_off_the_pin() {
        let board = board(
            "\
            ....r...\n\
            ........\n\
            ........\n\
            ........\n\
            ....N...\n\
            ........\n\
            ........\n\
            k...K...\n",
        );
        let knight = board.piece_at(Square::new(4, 4)).unwrap();
        assert!(!knight.pseudo_legal_moves(&board).is_empty());
        assert!(board.legal_moves_for(knight.id()).is_empty());
    }

    #[test]
    fn test_king_may_not_step_into_attack() {
        let board = board(
            "\
            k..\n\
            ...\n\
            K.r\n",
        );
        let king = board.king_of(Color::White).unwrap();
        assert_eq!(king.pseudo_legal_moves(&board).len(), 3);
        assert!(board.legal_moves_for(king.id()).is_empty());
        assert!(board.is_checkmate(Color::White));
    }

    #[test]
    fn test_no_legal_move_leaves_the_king_attacked() {
        let board = board(
            "\
            r...k..r\n\
            ppp..ppp\n\
            ..n.....\n\
            ...qp...\n\
            ..B.P...\n\
            .....N..\n\
            PPP..PPP\n\
            R..QK..R\n",
        );

        for color in Color::all() {
            for mv in board.legal_moves(color) {
                let after = board.with_move_made(mv);
                let king = after.king_of(color).unwrap();
                assert!(
                    !after.is_attacked(king.square(), color),
                    "{mv} leaves the {color} King attacked"
                );
            }
        }
    }

    #[test]
    fn test_queen_checkmate() {
        let board = board(
            "\
            ....k...\n\
            ....Q...\n\
            ....K...\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n",
        );
        assert!(board.is_in_check(Color::Black));
        assert!(!board.has_legal_moves(Color::Black));
        assert!(board.is_checkmate(Color::Black));
        assert!(!board.is_stalemate(Color::Black));
        assert_eq!(board.status(Color::Black), GameStatus::Checkmate);
        assert_eq!(board.status(Color::White), GameStatus::Ongoing);
    }

    #[test]
    fn test_stalemate() {
        let board = board(
            "\
            k.......\n\
            ..Q.....\n\
            .K......\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n",
        );
        assert!(!board.is_in_check(Color::Black));
        assert!(board.is_stalemate(Color::Black));
        assert!(!board.is_checkmate(Color::Black));
        assert_eq!(board.status(Color::Black), GameStatus::Stalemate);
    }

    #[test]
    fn test_checkmate_and_stalemate_are_exclusive() {
        let boards = [
            "k.......\n..Q.....\n.K......\n........\n........\n........\n........\n........\n",
            "....k...\n....Q...\n....K...\n........\n........\n........\n........\n........\n",
            "....k...\n........\n........\n........\n........\n........\n........\n....K...\n",
        ];

        for diagram in boards {
            let board = board(diagram);
            for color in Color::all() {
                assert!(
                    !(board.is_checkmate(color) && board.is_stalemate(color)),
                    "{color} is both mated and stalemated on\n{board}"
                );
            }
        }
    }

    #[test]
    fn test_make_move_checked_rejects_and_leaves_board_untouched() {
        let mut board = board(
            "\
            ..k\n\
            ...\n\
            K.R\n",
        );
        let before = board.clone();
        let rook = *board.piece_at(Square::new(2, 2)).unwrap();

        // Rooks do not move diagonally
        let diagonal = Move::new(&rook, Square::new(1, 1));
        assert!(board.make_move_checked(&diagonal).is_err());
        assert_eq!(board, before);

        let capture = Move::new(&rook, Square::new(2, 0));
        assert!(board.is_legal(&capture));
        board.make_move_checked(&capture).unwrap();
        assert_eq!(board.count(Color::Black, PieceKind::King), 0);

        // Replaying a move for a piece that has since left `from` is rejected
        assert!(board.make_move_checked(&capture).is_err());
    }

    #[test]
    #[should_panic]
    fn test_missing_king_is_fatal() {
        let board = board(
            "\
            k..\n\
            ...\n\
            ..R\n",
        );
        board.legal_moves(Color::White);
    }
}
