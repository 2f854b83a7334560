/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

/// A numerical representation of the evaluation of a position, in tenths of a Pawn.
///
/// Keeping tenths as integers makes every term of the evaluation exact,
/// including the half-Pawn pawn-structure penalty and the tenth-of-a-Pawn mobility bonus.
///
/// # Example
/// ```
/// # use newt::Score;
/// let score = Score::from_pawns(3) - Score(5);
/// assert_eq!(score, 25);
/// assert_eq!(score.normalize(), 2.5);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    /// Larger than any score an evaluation can produce.
    ///
    /// `-Score::INF` is the smallest.
    pub const INF: Self = Self(i32::MAX);

    /// Score of an even position.
    pub const DRAW: Self = Self(0);

    /// Number of [`Score`] units in one Pawn.
    pub const PER_PAWN: i32 = 10;

    /// Converts a whole number of Pawns to a [`Score`].
    #[inline(always)]
    pub const fn from_pawns(pawns: i32) -> Self {
        Self(pawns * Self::PER_PAWN)
    }

    /// This score in Pawns, for printing.
    #[inline(always)]
    pub fn normalize(&self) -> f32 {
        self.0 as f32 / Self::PER_PAWN as f32
    }
}

macro_rules! impl_binary_op {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: Self) -> Self::Output {
                Self(self.0.$fn(rhs.0))
            }
        }

        impl std::ops::$trait<i32> for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: i32) -> Self::Output {
                Self(self.0.$fn(rhs))
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);

impl std::ops::Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(self.0.neg())
    }
}

impl PartialEq<i32> for Score {
    fn eq(&self, other: &i32) -> bool {
        self.0.eq(other)
    }
}

impl fmt::Display for Score {
    /// Prints the score in Pawns, with one decimal place.
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-")?;
        }
        let tenths = self.0.unsigned_abs();
        write!(f, "{}.{}", tenths / 10, tenths % 10)
    }
}

impl fmt::Debug for Score {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinity_bounds_every_score() {
        assert!(-Score::INF <= Score(i32::MIN + 1));
        assert!(Score::INF > Score(i32::MAX - 1));
        assert_eq!(-(-Score::INF), Score::INF);
    }

    #[test]
    fn test_display_in_pawns() {
        assert_eq!(Score(25).to_string(), "2.5");
        assert_eq!(Score(-5).to_string(), "-0.5");
        assert_eq!(Score(-20).to_string(), "-2.0");
        assert_eq!(Score::DRAW.to_string(), "0.0");
    }
}
