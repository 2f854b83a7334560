/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{self, Write};

use anyhow::{ensure, Context, Result};
use clap::{builder::PossibleValue, Parser, Subcommand, ValueEnum};

use crate::{
    perft, splitperft, AiPlayer, Color, Engine, HumanPlayer, Layout, Player, Position,
    DEFAULT_DEPTH,
};

/// Command-line interface of the engine.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Filter for log messages, such as `info` or `newt=debug`. Overrides `RUST_LOG`.
    ///
    /// Logs are written to stderr.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Something to do from the command line.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Play a game in the terminal.
    Play {
        /// Number of human players. With 1, the human plays White.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=2))]
        humans: u8,

        /// Number of plies the automated player(s) look past their own move.
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,

        /// Starting position.
        #[arg(short, long, value_enum, default_value_t = Layout::Standard)]
        layout: Layout,

        /// End the game after this many plies.
        #[arg(long)]
        max_plies: Option<usize>,
    },

    /// Count the leaf nodes of the legal move tree, to check move generation.
    Perft {
        /// Depth of the tree.
        #[arg(short, long)]
        depth: usize,

        /// Starting position.
        #[arg(short, long, value_enum, default_value_t = Layout::Standard)]
        layout: Layout,

        /// Color to move at the root.
        #[arg(short, long, value_enum, default_value_t = Color::White)]
        color: Color,

        /// Print the number of nodes below each root move.
        #[arg(short, long, default_value = "false")]
        split: bool,
    },
}

impl Command {
    /// Executes this command, using stdin and stdout for the game transcript.
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Play {
                humans,
                depth,
                layout,
                max_plies,
            } => {
                let white = seat(Color::White, humans >= 1, depth)?;
                let black = seat(Color::Black, humans >= 2, depth)?;

                let mut out = io::stdout();
                writeln!(out, "Let's play chess!").context("Failed to write to stdout")?;

                let mut engine = Engine::new(layout.board(), white, black, out)?
                    .with_max_plies(max_plies);
                engine.run()?;
            }

            Self::Perft {
                depth,
                layout,
                color,
                split,
            } => {
                ensure!(depth > 0 || !split, "A splitperft needs a depth of at least 1");

                let position = Position::new(layout.board(), color);
                let nodes = if split {
                    splitperft(&position, depth)
                } else {
                    perft(&position, depth)
                };

                println!("{nodes}");
            }
        }

        Ok(())
    }
}

/// Creates the player sitting at `color`.
///
/// Human players share stdin, locking it only while reading an answer.
fn seat(color: Color, human: bool, depth: usize) -> Result<Box<dyn Player>> {
    if human {
        Ok(Box::new(HumanPlayer::new(color, io::stdin(), io::stdout())))
    } else {
        Ok(Box::new(AiPlayer::new(color, depth)?))
    }
}

impl ValueEnum for Layout {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Layout::Standard,
            Layout::Checkmate,
            Layout::Stalemate,
            Layout::EnPassant,
            Layout::Promotion,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        // By default, possible values are the layout's name
        let mut value = PossibleValue::new(self.name());

        // Some layouts have additional aliases
        match self {
            Layout::Standard => value = value.aliases(["default", "startpos"]),
            Layout::Checkmate => value = value.alias("mate"),
            Layout::Stalemate => {}
            Layout::EnPassant => value = value.aliases(["enpassant", "ep"]),
            Layout::Promotion => value = value.alias("promo"),
        }

        Some(value)
    }
}

impl ValueEnum for Color {
    fn value_variants<'a>() -> &'a [Self] {
        &[Color::White, Color::Black]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = PossibleValue::new(self.name());

        Some(match self {
            Color::White => value.alias("w"),
            Color::Black => value.alias("b"),
        })
    }
}
