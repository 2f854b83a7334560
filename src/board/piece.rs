/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use super::{
    bishop_attacks, king_attacks, king_castles, knight_attacks, pawn_attacks, pawn_pushes,
    queen_attacks, rook_attacks, Board, Square,
};

/// Represents the color of a player or a piece.
///
/// In Western chess, White traditionally moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns `true` if this [`Color`] is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Returns this [`Color`]'s opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use newt::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns this [`Color`] as a `usize`.
    ///
    /// Will be `0` for White, `1` for Black.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The direction, in ranks, that this color's pawns advance in.
    ///
    /// White advances towards rank `0`, Black away from it.
    ///
    /// # Example
    /// ```
    /// # use newt::Color;
    /// assert_eq!(Color::White.forward(), -1);
    /// assert_eq!(Color::Black.forward(), 1);
    /// ```
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// The rank on which this color's pawns promote, on a board with `size` ranks.
    ///
    /// # Example
    /// ```
    /// # use newt::Color;
    /// assert_eq!(Color::White.promotion_rank(8), 0);
    /// assert_eq!(Color::Black.promotion_rank(8), 7);
    /// ```
    #[inline(always)]
    pub const fn promotion_rank(&self, size: u8) -> i8 {
        match self {
            Self::White => 0,
            Self::Black => size as i8 - 1,
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    ///
    /// # Example
    /// ```
    /// # use newt::Color;
    /// assert_eq!(Color::Black.name(), "black");
    /// ```
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Returns `true` if a Pawn may promote to this kind.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        matches!(self, Self::Queen | Self::Rook | Self::Bishop | Self::Knight)
    }

    /// Creates a new [`PieceKind`] from a character.
    ///
    /// Case is ignored.
    ///
    /// # Example
    /// ```
    /// # use newt::PieceKind;
    /// assert_eq!(PieceKind::from_char('q').unwrap(), PieceKind::Queen);
    /// assert_eq!(PieceKind::from_char('N').unwrap(), PieceKind::Knight);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_char(kind: char) -> Result<Self> {
        match kind {
            'K' | 'k' => Ok(Self::King),
            'Q' | 'q' => Ok(Self::Queen),
            'R' | 'r' => Ok(Self::Rook),
            'B' | 'b' => Ok(Self::Bishop),
            'N' | 'n' => Ok(Self::Knight),
            'P' | 'p' => Ok(Self::Pawn),
            _ => bail!("Invalid char for PieceKind: Got {kind:?}."),
        }
    }

    /// Converts this [`PieceKind`] to a character.
    ///
    /// Will always be an uppercase letter.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Pawn => 'P',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::King => "king",
            Self::Queen => "queen",
            Self::Rook => "rook",
            Self::Bishop => "bishop",
            Self::Knight => "knight",
            Self::Pawn => "pawn",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Stable identity of a piece.
///
/// Minted by [`Board::add_piece`] and preserved by cloning, so a [`crate::Move`] made against one copy of a board
/// can be applied to any other copy of it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(transparent)]
pub struct PieceId(pub(crate) u32);

impl PieceId {
    /// Position of the piece inside its board's arena.
    #[inline(always)]
    pub(crate) const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A chess piece, as stored in a [`Board`].
///
/// Pieces are never removed from their board. A captured piece is relocated to [`Square::OFF_BOARD`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    pub(crate) id: PieceId,
    pub(crate) kind: PieceKind,
    pub(crate) color: Color,
    pub(crate) square: Square,

    /// Whether this piece has yet to move. Governs castling and the Pawn's double push.
    pub(crate) unmoved: bool,

    /// Set on a Pawn that has just advanced two squares, making it capturable en passant.
    pub(crate) en_passant: bool,
}

impl Piece {
    /// Constructs a new, unmoved, [`Piece`].
    #[inline(always)]
    pub(crate) const fn new(id: PieceId, kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            id,
            kind,
            color,
            square,
            unmoved: true,
            en_passant: false,
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Current location of the piece, or [`Square::OFF_BOARD`] if it was captured.
    #[inline(always)]
    pub const fn square(&self) -> Square {
        self.square
    }

    /// Returns `true` if this piece has never been moved.
    #[inline(always)]
    pub const fn is_unmoved(&self) -> bool {
        self.unmoved
    }

    /// Returns `true` if this piece is a Pawn that may be captured en passant on the coming ply.
    #[inline(always)]
    pub const fn is_en_passant_target(&self) -> bool {
        self.en_passant
    }

    /// Returns `true` if this piece has not been captured.
    #[inline(always)]
    pub const fn is_alive(&self) -> bool {
        !self.square.is_off_board()
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    /// Every square this piece threatens on `board`.
    ///
    /// A piece "attacks" a square if and only if that square is in this set.
    /// Captures are drawn from this set, and so is every check.
    pub fn aggressive_moves(&self, board: &Board) -> Vec<Square> {
        if !self.is_alive() {
            return Vec::new();
        }

        match self.kind {
            PieceKind::King => king_attacks(board, self),
            PieceKind::Queen => queen_attacks(board, self),
            PieceKind::Rook => rook_attacks(board, self),
            PieceKind::Bishop => bishop_attacks(board, self),
            PieceKind::Knight => knight_attacks(board, self),
            PieceKind::Pawn => pawn_attacks(board, self),
        }
    }

    /// Every square this piece may move to without capturing.
    ///
    /// Only Pawns (forward pushes) and Kings (castling) have any.
    pub fn quiet_moves(&self, board: &Board) -> Vec<Square> {
        if !self.is_alive() {
            return Vec::new();
        }

        match self.kind {
            PieceKind::King => king_castles(board, self),
            PieceKind::Pawn => pawn_pushes(board, self),
            _ => Vec::new(),
        }
    }

    /// Every pseudo-legal destination of this piece: its aggressive moves followed by its quiet moves.
    ///
    /// These have not been checked for leaving the King in check.
    pub fn pseudo_legal_moves(&self, board: &Board) -> Vec<Square> {
        let mut moves = self.aggressive_moves(board);
        moves.extend(self.quiet_moves(board));
        moves
    }

    /// Converts this [`Piece`] to a character, uppercase for White and lowercase for Black.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Color, PieceKind, Square};
    /// let mut board = Board::new(8).unwrap();
    /// let id = board.add_piece(PieceKind::Knight, Color::Black, Square::new(1, 0)).unwrap();
    /// assert_eq!(board.piece(id).char(), 'n');
    /// ```
    #[inline(always)]
    pub fn char(&self) -> char {
        let c = self.kind.char();
        if self.color.is_white() {
            c
        } else {
            c.to_ascii_lowercase()
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.color, self.kind, self.square)
    }
}
