/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

/// Represents a single square on an `N x N` chess board.
///
/// A square is a `(file, rank)` pair. Files grow from left to right and ranks grow from the top of the board to the bottom,
/// so White's pieces start on the highest ranks and advance towards rank `0`:
/// ```text
///     0 1 2 3 4 5 6 7   <- file
///  0  r n b q k b n r
///  1  p p p p p p p p
///  2  . . . . . . . .
///  .        ...
///  6  P P P P P P P P
///  7  R N B Q K B N R
///  ^
///  rank
/// ```
///
/// A [`Square`] knows nothing about the size of the board it lives on.
/// Use [`crate::Board::contains`] to find out whether a square is in bounds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: i8,
    rank: i8,
}

impl Square {
    /// The location of every piece that has been captured.
    ///
    /// Captured pieces are never removed from a [`crate::Board`], they are moved here instead.
    /// This square is out of bounds for every board size.
    pub const OFF_BOARD: Self = Self::new(-1, -1);

    /// Creates a new [`Square`] from the provided file and rank.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// let sq = Square::new(3, 4);
    /// assert_eq!(sq.file(), 3);
    /// assert_eq!(sq.rank(), 4);
    /// ```
    #[inline(always)]
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// Returns the file (horizontal co-ordinate) of this [`Square`].
    #[inline(always)]
    pub const fn file(&self) -> i8 {
        self.file
    }

    /// Returns the rank (vertical co-ordinate) of this [`Square`].
    #[inline(always)]
    pub const fn rank(&self) -> i8 {
        self.rank
    }

    /// Returns `true` if this is [`Square::OFF_BOARD`].
    #[inline(always)]
    pub const fn is_off_board(&self) -> bool {
        self.file == Self::OFF_BOARD.file && self.rank == Self::OFF_BOARD.rank
    }

    /// Shifts this [`Square`] by `df` files and `dr` ranks.
    ///
    /// The result may be out of bounds; callers are responsible for checking.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::new(2, 2).offset(1, -2), Square::new(3, 0));
    /// ```
    #[inline(always)]
    pub const fn offset(&self, df: i8, dr: i8) -> Self {
        Self::new(self.file + df, self.rank + dr)
    }

    /// Number of files between `self` and `other`.
    #[inline(always)]
    pub const fn distance_files(&self, other: Self) -> u8 {
        self.file.abs_diff(other.file)
    }

    /// Number of ranks between `self` and `other`.
    #[inline(always)]
    pub const fn distance_ranks(&self, other: Self) -> u8 {
        self.rank.abs_diff(other.rank)
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;

    /// Parses a [`Square`] from two integers separated by whitespace and/or a comma, optionally in parentheses.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!("3 4".parse::<Square>().unwrap(), Square::new(3, 4));
    /// assert_eq!("(3, 4)".parse::<Square>().unwrap(), Square::new(3, 4));
    /// assert!("3".parse::<Square>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let mut parts = trimmed
            .split(|c: char| c == ',' || c.is_ascii_whitespace())
            .filter(|part| !part.is_empty());

        let (Some(file), Some(rank), None) = (parts.next(), parts.next(), parts.next()) else {
            bail!("Square must be two numbers: \"<file> <rank>\". Got {s:?}");
        };

        let file = file
            .parse()
            .with_context(|| format!("Invalid file {file:?} in square {s:?}"))?;
        let rank = rank
            .parse()
            .with_context(|| format!("Invalid rank {rank:?} in square {s:?}"))?;

        Ok(Self::new(file, rank))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_off_board() {
            write!(f, "(off board)")
        } else {
            write!(f, "({}, {})", self.file, self.rank)
        }
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}
