/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The board, its pieces, and the rules of the game.
mod board;

/// Command-line interface.
mod cli;

/// The game loop, which plays a game between two players.
mod engine;

/// Evaluation of chess positions.
mod eval;

/// Starting positions.
mod layout;

/// People and programs that take turns.
mod player;

/// The [`Score`] type used by evaluation and search.
mod score;

/// Main engine logic; all search related code.
mod search;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use eval::*;
pub use layout::*;
pub use player::*;
pub use score::*;
pub use search::*;
