/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use newt::{perft, perft_generic, Color, Layout, Position};

fn test_perft_layout_nodes(depth: usize, layout: Layout, color: Color, expected: u64) {
    let position = Position::new(layout.board(), color);
    let res = perft(&position, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on the {layout} layout");
}

/// https://www.chessprogramming.org/Perft_Results#Initial_Position
#[cfg(test)]
mod standard_perfts {
    use super::*;

    #[test]
    fn test_standard_perft_1() {
        test_perft_layout_nodes(1, Layout::Standard, Color::White, 20);
    }

    #[test]
    fn test_standard_perft_2() {
        test_perft_layout_nodes(2, Layout::Standard, Color::White, 400);
    }

    #[test]
    fn test_standard_perft_3() {
        test_perft_layout_nodes(3, Layout::Standard, Color::White, 8902);
    }

    #[test]
    fn test_standard_perft_black_first() {
        // The position is symmetric, so it does not matter who moves first
        test_perft_layout_nodes(2, Layout::Standard, Color::Black, 400);
    }
}

#[cfg(test)]
mod layout_perfts {
    use super::*;

    #[test]
    fn test_promotion_perft_1() {
        // Seven King moves (one square is guarded by the other King) and one push onto the last rank
        test_perft_layout_nodes(1, Layout::Promotion, Color::White, 8);
    }

    #[test]
    fn test_stalemate_perft() {
        test_perft_layout_nodes(1, Layout::Stalemate, Color::Black, 0);
        test_perft_layout_nodes(3, Layout::Stalemate, Color::Black, 0);
    }

    #[test]
    fn test_full_expansion_agrees_with_bulk_counting() {
        // Black starts in check on the checkmate layout, so White could take its King
        for layout in Layout::all().into_iter().filter(|&l| l != Layout::Checkmate) {
            let position = Position::new(layout.board(), Color::White);
            assert_eq!(
                perft_generic::<false, false>(&position, 2),
                perft(&position, 2),
                "bulk counting disagrees with full expansion on the {layout} layout"
            );
        }
    }
}
