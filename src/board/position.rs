/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, ensure, Context, Result};

use super::{first_piece_along, Color, Move, Piece, PieceId, PieceKind, Square};

/// A square chess board and every piece that has ever stood on it.
///
/// Pieces live in an arena indexed by their [`PieceId`]. Captured pieces stay in the arena at [`Square::OFF_BOARD`],
/// so an id handed out by a board is valid for the whole game, and for every clone of the board.
///
/// A square-indexed grid mirrors the arena so that looking up the occupant of a square is cheap.
/// At most one living piece occupies any square.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    /// Number of files (and ranks).
    size: u8,

    /// Every piece added to this board, in the order they were added.
    pieces: Vec<Piece>,

    /// Occupant of every in-bounds square, indexed by `file + rank * size`.
    grid: Vec<Option<PieceId>>,
}

impl Board {
    /// Size of a standard chess board.
    pub const DEFAULT_SIZE: u8 = 8;

    /// Smallest supported board size.
    pub const MIN_SIZE: u8 = 3;

    /// Largest supported board size.
    pub const MAX_SIZE: u8 = 64;

    /// Creates an empty `size x size` board.
    ///
    /// # Example
    /// ```
    /// # use newt::Board;
    /// let board = Board::new(5).unwrap();
    /// assert_eq!(board.size(), 5);
    /// assert_eq!(board.pieces().count(), 0);
    ///
    /// assert!(Board::new(2).is_err());
    /// ```
    pub fn new(size: u8) -> Result<Self> {
        ensure!(
            (Self::MIN_SIZE..=Self::MAX_SIZE).contains(&size),
            "Board size must be between [{}, {}]. Got {size}",
            Self::MIN_SIZE,
            Self::MAX_SIZE
        );

        let squares = size as usize * size as usize;
        Ok(Self {
            size,
            pieces: Vec::with_capacity(32),
            grid: vec![None; squares],
        })
    }

    /// Number of files (and ranks) on this board.
    #[inline(always)]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// The highest co-ordinate on this board.
    #[inline(always)]
    pub const fn max(&self) -> i8 {
        self.size as i8 - 1
    }

    /// Returns `true` if `square` lies on this board.
    ///
    /// [`Square::OFF_BOARD`] is never contained.
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        let max = self.max();
        square.file() >= 0 && square.file() <= max && square.rank() >= 0 && square.rank() <= max
    }

    /// Index of an in-bounds `square` within the grid.
    #[inline(always)]
    fn grid_index(&self, square: Square) -> usize {
        square.file() as usize + square.rank() as usize * self.size as usize
    }

    /// Places a new, unmoved, piece on this board, returning its freshly minted id.
    ///
    /// Fails if `square` is out of bounds or already occupied.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Color, PieceKind, Square};
    /// let mut board = Board::new(8).unwrap();
    /// let id = board.add_piece(PieceKind::Rook, Color::White, Square::new(0, 7)).unwrap();
    /// assert_eq!(board.piece_at(Square::new(0, 7)).unwrap().id(), id);
    ///
    /// assert!(board.add_piece(PieceKind::Pawn, Color::Black, Square::new(0, 7)).is_err());
    /// assert!(board.add_piece(PieceKind::Pawn, Color::Black, Square::new(8, 0)).is_err());
    /// ```
    pub fn add_piece(&mut self, kind: PieceKind, color: Color, square: Square) -> Result<PieceId> {
        ensure!(
            self.contains(square),
            "Cannot place a {color} {kind} on {square}: it is not on a {0}x{0} board",
            self.size
        );
        if let Some(occupant) = self.piece_at(square) {
            bail!("Cannot place a {color} {kind} on {square}: it is occupied by a {occupant}");
        }

        Ok(self.place(kind, color, square))
    }

    /// Places a new piece on `square` without checking that it is in bounds and empty.
    pub(crate) fn place(&mut self, kind: PieceKind, color: Color, square: Square) -> PieceId {
        let id = PieceId(self.pieces.len() as u32);
        self.pieces.push(Piece::new(id, kind, color, square));
        let index = self.grid_index(square);
        self.grid[index] = Some(id);
        id
    }

    /// Fetches the piece with the provided id.
    ///
    /// # Panics
    /// If `id` was not minted by this board (or a board this one was cloned from).
    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Fetches the piece with the provided id, if this board knows of it.
    #[inline(always)]
    pub fn get_piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    /// Fetches the living piece on `square`, if there is one.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        if !self.contains(square) {
            return None;
        }

        self.grid[self.grid_index(square)].map(|id| self.piece(id))
    }

    /// An iterator over every piece ever placed on this board, including captured ones, in the order they were added.
    #[inline(always)]
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    /// An iterator over the living pieces of `color`, in the order they were added.
    #[inline(always)]
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces
            .iter()
            .filter(move |piece| piece.is_alive() && piece.color() == color)
    }

    /// Fetches `color`'s King, if it is on the board.
    #[inline(always)]
    pub fn king_of(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color).find(|piece| piece.is_king())
    }

    /// Number of living pieces of the given color and kind.
    #[inline(always)]
    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.pieces_of(color)
            .filter(|piece| piece.kind() == kind)
            .count()
    }

    /// Returns `true` if any of `defender`'s opponent's pieces has `square` in its aggressive move set.
    ///
    /// `square` does not need to be occupied.
    pub fn is_attacked(&self, square: Square, defender: Color) -> bool {
        self.pieces_of(defender.opponent())
            .any(|piece| piece.aggressive_moves(self).contains(&square))
    }

    /// Moves the piece `id` onto `to`, keeping the grid in sync.
    ///
    /// Does not capture; `to` must be empty or [`Square::OFF_BOARD`].
    fn relocate(&mut self, id: PieceId, to: Square) {
        let from = self.piece(id).square();
        if self.contains(from) {
            let index = self.grid_index(from);
            self.grid[index] = None;
        }

        if self.contains(to) {
            let index = self.grid_index(to);
            self.grid[index] = Some(id);
        }

        self.pieces[id.index()].square = to;
    }

    /// Removes whatever piece stands on `square` from play.
    fn capture(&mut self, square: Square) {
        if let Some(id) = self.piece_at(square).map(|piece| piece.id()) {
            self.relocate(id, Square::OFF_BOARD);
        }
    }

    /// Applies `mv` to this board without checking that it is legal.
    ///
    /// Beyond moving the piece itself, this:
    /// - clears every Pawn's en passant flag, then sets it on the mover if it is a Pawn advancing two squares,
    /// - captures the piece on the destination square,
    /// - captures the bypassed Pawn of an en passant capture,
    /// - moves the Rook of a castling King next to the King, on the side the King came from.
    ///
    /// If the mover is a Pawn that reached its promotion rank, its id is returned.
    /// It stays a Pawn until [`Board::promote`] is called.
    pub fn make_move(&mut self, mv: Move) -> Option<PieceId> {
        for piece in &mut self.pieces {
            piece.en_passant = false;
        }

        let piece = *self.piece(mv.piece());
        let from = piece.square();
        let to = mv.to();
        let is_diagonal_step = from.distance_files(to) == 1 && from.distance_ranks(to) == 1;

        if piece.is_pawn() && is_diagonal_step && self.piece_at(to).is_none() {
            // En passant; the captured Pawn is beside us, not on `to`
            self.capture(Square::new(to.file(), from.rank()));
        } else {
            self.capture(to);
        }

        if piece.is_king() && from.distance_files(to) == 2 {
            let direction = (to.file() - from.file()).signum();
            if let Some(rook) = first_piece_along(self, from, direction).map(|rook| rook.id()) {
                self.relocate(rook, to.offset(-direction, 0));
                self.pieces[rook.index()].unmoved = false;
            }
        }

        self.relocate(piece.id(), to);

        let promotion_rank = piece.color().promotion_rank(self.size);
        let moved = &mut self.pieces[piece.id().index()];
        moved.unmoved = false;
        moved.en_passant = moved.is_pawn() && from.distance_ranks(to) == 2;

        (moved.is_pawn() && to.rank() == promotion_rank).then_some(moved.id())
    }

    /// Copies `self` and returns a [`Board`] after having applied the provided [`Move`].
    ///
    /// A Pawn reaching its promotion rank is left as a Pawn.
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = self.clone();
        copied.make_move(mv);
        copied
    }

    /// Replaces the Pawn `id` with a piece of `kind`, in place.
    ///
    /// The piece keeps its id, color and square, and from now on moves (and is counted) as `kind`.
    pub fn promote(&mut self, id: PieceId, kind: PieceKind) -> Result<()> {
        let Some(piece) = self.get_piece(id) else {
            bail!("Cannot promote piece {id}: no such piece on this board");
        };
        ensure!(piece.is_pawn(), "Only Pawns can be promoted. Got a {piece}");
        ensure!(
            kind.is_promotion(),
            "A Pawn may only promote to a Queen, Rook, Bishop, or Knight. Got {kind}"
        );

        let piece = &mut self.pieces[id.index()];
        piece.kind = kind;
        piece.en_passant = false;
        Ok(())
    }

    /// Renders this board as a diagram that can be parsed back with [`Board::from_str`].
    ///
    /// One line per rank, starting at rank `0`, one character per file.
    /// Empty squares are `.`, White pieces are uppercase, and Black pieces are lowercase.
    ///
    /// # Example
    /// ```
    /// # use newt::Board;
    /// let diagram = "k..\n...\n..K\n";
    /// let board: Board = diagram.parse().unwrap();
    /// assert_eq!(board.to_diagram(), diagram);
    /// ```
    pub fn to_diagram(&self) -> String {
        let mut diagram = String::with_capacity((self.size as usize + 1) * self.size as usize);

        for rank in 0..=self.max() {
            for file in 0..=self.max() {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', |piece| piece.char());
                diagram.push(c);
            }
            diagram.push('\n');
        }

        diagram
    }
}

impl Default for Board {
    /// An empty `8x8` board.
    fn default() -> Self {
        let squares = Self::DEFAULT_SIZE as usize * Self::DEFAULT_SIZE as usize;
        Self {
            size: Self::DEFAULT_SIZE,
            pieces: Vec::with_capacity(32),
            grid: vec![None; squares],
        }
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    /// Parses a diagram in the format produced by [`Board::to_diagram`].
    ///
    /// Leading and trailing whitespace on each line is ignored, as are blank lines.
    /// `-` is accepted as an empty square as well as `.`.
    /// Pieces are added rank by rank, file by file, which fixes the order they are searched in.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect::<Vec<_>>();

        let size = u8::try_from(rows.len())
            .with_context(|| format!("Diagram has too many ranks ({})", rows.len()))?;
        let mut board = Self::new(size).context("Invalid diagram")?;

        for (rank, row) in rows.iter().enumerate() {
            let squares = row.chars().collect::<Vec<_>>();
            ensure!(
                squares.len() == rows.len(),
                "Rank {rank} of the diagram has {} squares, but the board has {} ranks: {row:?}",
                squares.len(),
                rows.len()
            );

            for (file, c) in squares.into_iter().enumerate() {
                if c == '.' || c == '-' {
                    continue;
                }

                let kind = PieceKind::from_char(c).with_context(|| {
                    format!("Invalid square {c:?} in rank {rank} of the diagram")
                })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };

                board.add_piece(kind, color, Square::new(file as i8, rank as i8))?;
            }
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    /// Prints the board with rank numbers down the left and file numbers along the bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..=self.max() {
            write!(f, "{rank:>2} ")?;
            for file in 0..=self.max() {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('-', |piece| piece.char());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }

        write!(f, "   ")?;
        for file in 0..=self.max() {
            write!(f, "{:>2}", file % 10)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;
        for piece in self.pieces() {
            writeln!(
                f,
                "{} {piece}{}{}",
                piece.id(),
                if piece.is_unmoved() { " (unmoved)" } else { "" },
                if piece.is_en_passant_target() { " (en passant)" } else { "" },
            )?;
        }
        Ok(())
    }
}

/// A hypothetical state of the game: a [`Board`] and the color that acts next on it.
///
/// Positions are built while searching, by copying a board and applying one move to it.
/// They never touch the board of the game being played.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Position {
    board: Board,
    to_act: Color,
}

impl Position {
    /// Wraps `board` in a [`Position`] where `to_act` is about to move.
    #[inline(always)]
    pub fn new(board: Board, to_act: Color) -> Self {
        Self { board, to_act }
    }

    /// The board of this position.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The color to act next.
    #[inline(always)]
    pub const fn to_act(&self) -> Color {
        self.to_act
    }

    /// All legal moves of the color to act, in generation order.
    #[inline(always)]
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves(self.to_act)
    }

    /// Copies this position and applies `mv` to the copy, passing the turn to the opponent.
    ///
    /// A Pawn reaching its promotion rank becomes a Queen.
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut board = self.board.clone();
        if let Some(pawn) = board.make_move(mv) {
            let piece = &mut board.pieces[pawn.index()];
            piece.kind = PieceKind::Queen;
        }

        Self {
            board,
            to_act: self.to_act.opponent(),
        }
    }
}
