/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Per-kind movement rules, and the castling scan.
mod movegen;

/// The [`Move`] type.
mod moves;

/// Counting the leaves of the legal move tree.
mod perft;

/// Colors, kinds, and pieces.
mod piece;

/// The [`Board`] arena, and the hypothetical [`Position`]s built from it.
mod position;

/// Legality, check, checkmate, and stalemate.
mod rules;

/// Co-ordinates on the board.
mod square;

pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use rules::*;
pub use square::*;
