/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, Piece, PieceKind, Square};

/// `(file, rank)` deltas of the orthogonal rays: up, down, right, left.
pub const ROOK_DELTAS: [(i8, i8); 4] = [(0, -1), (0, 1), (1, 0), (-1, 0)];

/// `(file, rank)` deltas of the diagonal rays: up-left, up-right, down-left, down-right.
pub const BISHOP_DELTAS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// `(file, rank)` deltas of all 8 Knight jumps, clockwise from "one right, two up".
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

/// `(file, rank)` deltas of all 8 neighbouring squares, clockwise from the upper left.
pub const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Returns `true` if `piece` could land on `square`: it is in bounds, and not held by one of `piece`'s allies.
#[inline(always)]
fn is_enterable(board: &Board, piece: &Piece, square: Square) -> bool {
    board.contains(square)
        && board
            .piece_at(square)
            .map_or(true, |other| other.color() != piece.color())
}

/// Returns `true` if `square` holds a piece belonging to `color`'s opponent.
#[inline(always)]
fn is_enemy_of(board: &Board, color: Color, square: Square) -> bool {
    board
        .piece_at(square)
        .is_some_and(|other| other.color() != color)
}

/// Walks every ray in `deltas` from `piece`'s square.
///
/// Empty squares are collected and the ray continues.
/// The first occupied square ends the ray, and is collected only if it holds an enemy.
fn slide(board: &Board, piece: &Piece, deltas: &[(i8, i8)]) -> Vec<Square> {
    let mut moves = Vec::new();

    for &(df, dr) in deltas {
        let mut square = piece.square().offset(df, dr);

        while board.contains(square) {
            match board.piece_at(square) {
                None => moves.push(square),
                Some(other) => {
                    if other.color() != piece.color() {
                        moves.push(square);
                    }
                    break;
                }
            }

            square = square.offset(df, dr);
        }
    }

    moves
}

/// Collects every square a fixed offset away from `piece` that it may land on.
fn leap(board: &Board, piece: &Piece, deltas: &[(i8, i8)]) -> Vec<Square> {
    deltas
        .iter()
        .map(|&(df, dr)| piece.square().offset(df, dr))
        .filter(|&square| is_enterable(board, piece, square))
        .collect()
}

/// Aggressive moves of a Rook: the four orthogonal rays.
pub fn rook_attacks(board: &Board, piece: &Piece) -> Vec<Square> {
    slide(board, piece, &ROOK_DELTAS)
}

/// Aggressive moves of a Bishop: the four diagonal rays.
pub fn bishop_attacks(board: &Board, piece: &Piece) -> Vec<Square> {
    slide(board, piece, &BISHOP_DELTAS)
}

/// Aggressive moves of a Queen: the union of a Rook's and a Bishop's.
pub fn queen_attacks(board: &Board, piece: &Piece) -> Vec<Square> {
    let mut moves = rook_attacks(board, piece);
    moves.extend(bishop_attacks(board, piece));
    moves
}

/// Aggressive moves of a Knight.
pub fn knight_attacks(board: &Board, piece: &Piece) -> Vec<Square> {
    leap(board, piece, &KNIGHT_DELTAS)
}

/// Aggressive moves of a King. Castling is a quiet move; see [`king_castles`].
pub fn king_attacks(board: &Board, piece: &Piece) -> Vec<Square> {
    leap(board, piece, &KING_DELTAS)
}

/// Aggressive moves of a Pawn.
///
/// These are the two forward diagonals, only when an enemy stands on them,
/// plus the square behind any adjacent enemy Pawn that may be captured en passant.
pub fn pawn_attacks(board: &Board, piece: &Piece) -> Vec<Square> {
    let color = piece.color();
    let forward = color.forward();
    let square = piece.square();
    let mut moves = Vec::with_capacity(2);

    for side in [-1, 1] {
        let diagonal = square.offset(side, forward);
        if board.contains(diagonal) && is_enemy_of(board, color, diagonal) {
            moves.push(diagonal);
        }
    }

    for side in [-1, 1] {
        let beside = square.offset(side, 0);
        let Some(other) = board.piece_at(beside) else {
            continue;
        };

        if other.is_pawn() && other.color() != color && other.is_en_passant_target() {
            let behind = beside.offset(0, forward);
            if board.contains(behind) && !moves.contains(&behind) {
                moves.push(behind);
            }
        }
    }

    moves
}

/// Quiet moves of a Pawn: one square forward, or two if it has never moved and both squares are empty.
pub fn pawn_pushes(board: &Board, piece: &Piece) -> Vec<Square> {
    let forward = piece.color().forward();
    let mut moves = Vec::with_capacity(2);

    let single = piece.square().offset(0, forward);
    if board.contains(single) && board.piece_at(single).is_none() {
        moves.push(single);

        let double = single.offset(0, forward);
        if piece.is_unmoved() && board.contains(double) && board.piece_at(double).is_none() {
            moves.push(double);
        }
    }

    moves
}

/// Quiet moves of a King: castling, to the right first and then to the left.
///
/// Castling requires that the King has never moved, stands on the first or last rank, and is not in check.
/// In the chosen direction, the two squares beside the King must be empty and neither may be attacked,
/// and the first piece found beyond them must be an unmoved Rook of the King's color.
pub fn king_castles(board: &Board, king: &Piece) -> Vec<Square> {
    let mut moves = Vec::new();
    let square = king.square();
    let color = king.color();

    let on_home_rank = square.rank() == 0 || square.rank() == board.max();
    if !king.is_unmoved() || !on_home_rank || board.is_attacked(square, color) {
        return moves;
    }

    for direction in [1, -1] {
        let beside = square.offset(direction, 0);
        let landing = square.offset(2 * direction, 0);
        if !board.contains(landing)
            || board.piece_at(beside).is_some()
            || board.piece_at(landing).is_some()
        {
            continue;
        }

        let mut rook = None;
        let mut current = beside;
        let mut steps = 0;
        while board.contains(current) {
            steps += 1;
            // Only the squares the King passes over need to be safe
            if steps <= 2 && board.is_attacked(current, color) {
                break;
            }

            if let Some(piece) = board.piece_at(current) {
                rook = Some(piece);
                break;
            }

            current = current.offset(direction, 0);
        }

        if rook.is_some_and(|rook| {
            rook.kind() == PieceKind::Rook && rook.color() == color && rook.is_unmoved()
        }) {
            moves.push(landing);
        }
    }

    moves
}

/// Finds the first piece met when walking from `from` (exclusively) in the horizontal `direction`.
///
/// When a King castles, this is the Rook that jumps over it.
pub fn first_piece_along(board: &Board, from: Square, direction: i8) -> Option<&Piece> {
    let mut current = from.offset(direction, 0);
    while board.contains(current) {
        if let Some(piece) = board.piece_at(current) {
            return Some(piece);
        }
        current = current.offset(direction, 0);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut squares: Vec<Square>) -> Vec<Square> {
        squares.sort();
        squares
    }

    fn moves_at(board: &Board, file: i8, rank: i8) -> (Vec<Square>, Vec<Square>) {
        let piece = board.piece_at(Square::new(file, rank)).unwrap();
        (piece.aggressive_moves(board), piece.quiet_moves(board))
    }

    #[test]
    fn test_rook_stops_at_first_blocker() {
        let board: Board = "\
            ....\n\
            .R.p\n\
            ....\n\
            .P..\n"
            .parse()
            .unwrap();

        let (aggressive, quiet) = moves_at(&board, 1, 1);
        assert_eq!(
            sorted(aggressive),
            sorted(vec![
                Square::new(1, 0),
                Square::new(1, 2),
                Square::new(0, 1),
                Square::new(2, 1),
                Square::new(3, 1),
            ])
        );
        assert!(quiet.is_empty());
    }

    #[test]
    fn test_bishop_rays_on_small_board() {
        let board: Board = "\
            ...\n\
            .b.\n\
            P..\n"
            .parse()
            .unwrap();

        let (aggressive, _) = moves_at(&board, 1, 1);
        assert_eq!(
            sorted(aggressive),
            sorted(vec![
                Square::new(0, 0),
                Square::new(2, 0),
                Square::new(0, 2),
                Square::new(2, 2),
            ])
        );
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        let board: Board = "\
            ........\n\
            ........\n\
            ...Q....\n\
            ........\n\
            .....p..\n\
            ........\n\
            ........\n\
            ...P....\n"
            .parse()
            .unwrap();

        let queen = board.piece_at(Square::new(3, 2)).unwrap();
        let mut expected = rook_attacks(&board, queen);
        expected.extend(bishop_attacks(&board, queen));
        assert_eq!(queen.aggressive_moves(&board), expected);
        assert!(queen.aggressive_moves(&board).contains(&Square::new(5, 4)));
        assert!(!queen.aggressive_moves(&board).contains(&Square::new(3, 7)));
    }

    #[test]
    fn test_knight_jumps_from_corner() {
        let board: Board = "\
            N...\n\
            ..P.\n\
            .p..\n\
            ....\n"
            .parse()
            .unwrap();

        let (aggressive, _) = moves_at(&board, 0, 0);
        assert_eq!(aggressive, vec![Square::new(1, 2)]);
    }

    #[test]
    fn test_pawn_pushes_and_captures() {
        let board: Board = "\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ...r.b..\n\
            ....P...\n\
            ........\n"
            .parse()
            .unwrap();

        let (aggressive, quiet) = moves_at(&board, 4, 6);
        assert_eq!(aggressive, vec![Square::new(3, 5), Square::new(5, 5)]);
        assert_eq!(quiet, vec![Square::new(4, 5), Square::new(4, 4)]);
    }

    #[test]
    fn test_blocked_pawn_has_no_double_push() {
        let board: Board = "\
            ....\n\
            p...\n\
            ....\n\
            P...\n"
            .parse()
            .unwrap();

        let (_, quiet) = moves_at(&board, 0, 3);
        assert_eq!(quiet, vec![Square::new(0, 2)]);

        let (_, quiet) = moves_at(&board, 0, 1);
        assert_eq!(quiet, vec![Square::new(0, 2)]);
    }

    #[test]
    fn test_pawn_does_not_attack_empty_diagonals() {
        let board: Board = "\
            ...\n\
            ...\n\
            .P.\n"
            .parse()
            .unwrap();

        let (aggressive, _) = moves_at(&board, 1, 2);
        assert!(aggressive.is_empty());
    }

    #[test]
    fn test_castling_both_ways() {
        let board: Board = "\
            ....k...\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            R...K..R\n"
            .parse()
            .unwrap();

        let (_, quiet) = moves_at(&board, 4, 7);
        assert_eq!(quiet, vec![Square::new(6, 7), Square::new(2, 7)]);
    }

    #[test]
    fn test_castling_through_attacked_square() {
        // The Black Rook attacks (5, 7), which the King would pass over going right
        let board: Board = "\
            ....k...\n\
            .....r..\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            R...K..R\n"
            .parse()
            .unwrap();

        let (_, quiet) = moves_at(&board, 4, 7);
        assert_eq!(quiet, vec![Square::new(2, 7)]);
    }

    #[test]
    fn test_no_castling_out_of_check_or_with_blockers() {
        let in_check: Board = "\
            ....k...\n\
            ....r...\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            R...K..R\n"
            .parse()
            .unwrap();
        assert!(moves_at(&in_check, 4, 7).1.is_empty());

        // A Knight between the King and the left Rook stops the scan before the Rook is found
        let blocked: Board = "\
            ....k...\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            RN..K...\n"
            .parse()
            .unwrap();
        assert!(moves_at(&blocked, 4, 7).1.is_empty());
    }

    #[test]
    fn test_first_piece_along() {
        let board: Board = "\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            R...K..R\n"
            .parse()
            .unwrap();

        let king = Square::new(4, 7);
        assert_eq!(
            first_piece_along(&board, king, 1).map(|p| p.square()),
            Some(Square::new(7, 7))
        );
        assert_eq!(
            first_piece_along(&board, king, -1).map(|p| p.square()),
            Some(Square::new(0, 7))
        );
        assert!(first_piece_along(&board, Square::new(7, 7), 1).is_none());
    }
}
