/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{ensure, Result};

use crate::{Color, Evaluator, Move, Position, Score};

/// Depth used when none is requested.
pub const DEFAULT_DEPTH: usize = 2;

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Number of times a node stopped iterating its moves early.
    pub cutoffs: u64,

    /// Best move found during the search.
    ///
    /// `None` if the root had no legal moves.
    pub bestmove: Option<Move>,

    /// Minimax value of `bestmove`, from the searching side's perspective.
    pub score: Score,
}

impl Default for SearchResult {
    /// A default search result should initialize to a *very bad* value,
    /// since there isn't a move to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            cutoffs: 0,
            bestmove: None,
            score: -Score::INF,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of plies below the root's children at which lines are cut off and evaluated.
    max_depth: usize,
}

impl SearchConfig {
    /// Constructs a new [`SearchConfig`]. `max_depth` must be at least `1`.
    ///
    /// # Example
    /// ```
    /// # use newt::SearchConfig;
    /// assert_eq!(SearchConfig::new(3).unwrap().max_depth(), 3);
    /// assert!(SearchConfig::new(0).is_err());
    /// ```
    pub fn new(max_depth: usize) -> Result<Self> {
        ensure!(max_depth >= 1, "Search depth must be at least 1. Got {max_depth}");
        Ok(Self { max_depth })
    }

    #[inline(always)]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
        }
    }
}

/// Executes a depth-limited minimax search, with alpha-beta pruning, for the side to act at the root.
///
/// Every node of the tree owns its own copy of the board. The root position is never modified.
pub struct Search<'a> {
    /// The position to search on.
    ///
    /// Its board will be copied when moves are applied to it.
    root: &'a Position,

    /// The side the search is choosing a move for; every score is from its perspective.
    me: Color,

    /// The result of the search, updated as-needed during search.
    result: SearchResult,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,
}

impl<'a> Search<'a> {
    /// Construct a new [`Search`] instance to execute on the provided [`Position`].
    #[inline(always)]
    pub fn new(root: &'a Position, config: SearchConfig) -> Self {
        Self {
            root,
            me: root.to_act(),
            result: SearchResult::default(),
            config,
        }
    }

    /// Start the search, returning its results.
    ///
    /// Every legal move at the root is scored by a minimizing search of the position it leads to,
    /// and the first move with the strictly greatest score is kept.
    pub fn start(mut self) -> SearchResult {
        let moves = self.root.legal_moves();
        tracing::debug!(
            color = %self.me,
            moves = moves.len(),
            max_depth = self.config.max_depth,
            "Starting search"
        );

        for mv in moves {
            let child = self.root.with_move_made(mv);
            let score = self.min_value(&child, -Score::INF, Score::INF, 0);
            tracing::trace!(mv = %mv, score = %score, "Root move searched");

            if score > self.result.score {
                self.result.score = score;
                self.result.bestmove = Some(mv);
            }
        }

        match self.result.bestmove {
            Some(mv) => tracing::debug!(
                color = %self.me,
                bestmove = %mv,
                score = %self.result.score,
                nodes = self.result.nodes,
                cutoffs = self.result.cutoffs,
                "Search finished"
            ),
            None => tracing::warn!(color = %self.me, "No legal moves at the root"),
        }

        self.result
    }

    /// Returns `true` if the line leading to `position` should be evaluated instead of expanded.
    ///
    /// That is the case at the maximum depth, and whenever either side is mated or stalemated,
    /// regardless of whose turn it is. A side whose King was captured ends the line too.
    fn cutoff(&self, position: &Position, depth: usize) -> bool {
        if depth >= self.config.max_depth {
            return true;
        }

        let board = position.board();
        Color::all()
            .into_iter()
            .any(|color| board.king_of(color).is_none() || !board.has_legal_moves(color))
    }

    /// Static evaluation of `position` for the searching side.
    #[inline(always)]
    fn evaluate(&self, position: &Position) -> Score {
        Evaluator::new(position.board()).eval_for(self.me)
    }

    /// Value of `position` when the searching side is to act.
    fn max_value(
        &mut self,
        position: &Position,
        mut alpha: Score,
        beta: Score,
        depth: usize,
    ) -> Score {
        self.result.nodes += 1;

        if self.cutoff(position, depth) {
            return self.evaluate(position);
        }

        let mut value = -Score::INF;
        for mv in position.legal_moves() {
            let child = position.with_move_made(mv);
            value = value.max(self.min_value(&child, alpha, beta, depth + 1));

            if value >= beta {
                self.refuted_by(mv, depth);
                return value;
            }

            alpha = alpha.max(value);
        }

        value
    }

    /// Value of `position` when the opponent is to act.
    fn min_value(
        &mut self,
        position: &Position,
        alpha: Score,
        mut beta: Score,
        depth: usize,
    ) -> Score {
        self.result.nodes += 1;

        if self.cutoff(position, depth) {
            return self.evaluate(position);
        }

        let mut value = Score::INF;
        for mv in position.legal_moves() {
            let child = position.with_move_made(mv);
            value = value.min(self.max_value(&child, alpha, beta, depth + 1));

            if value <= alpha {
                self.refuted_by(mv, depth);
                return value;
            }

            beta = beta.min(value);
        }

        value
    }

    #[inline(always)]
    fn refuted_by(&mut self, mv: Move, depth: usize) {
        self.result.cutoffs += 1;
        tracing::trace!(mv = %mv, depth, "Line refuted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Layout, PieceKind, Square};

    fn search(diagram: &str, to_act: Color, max_depth: usize) -> SearchResult {
        let board: Board = diagram.parse().unwrap();
        let position = Position::new(board, to_act);
        Search::new(&position, SearchConfig::new(max_depth).unwrap()).start()
    }

    /// Plain minimax, with the same cutoff and evaluation as the real search.
    fn minimax(search: &Search, position: &Position, depth: usize, maximizing: bool) -> Score {
        if search.cutoff(position, depth) {
            return search.evaluate(position);
        }

        let values = position
            .legal_moves()
            .into_iter()
            .map(|mv| minimax(search, &position.with_move_made(mv), depth + 1, !maximizing));

        if maximizing {
            values.max().unwrap_or(-Score::INF)
        } else {
            values.min().unwrap_or(Score::INF)
        }
    }

    fn unpruned(position: &Position, max_depth: usize) -> (Option<Move>, Score) {
        let search = Search::new(position, SearchConfig::new(max_depth).unwrap());
        let mut best = (None, -Score::INF);

        for mv in position.legal_moves() {
            let score = minimax(&search, &position.with_move_made(mv), 0, false);
            if score > best.1 {
                best = (Some(mv), score);
            }
        }

        best
    }

    #[test]
    fn test_pruning_does_not_change_the_result() {
        let cases = [
            (Layout::Standard.board(), Color::White, 1),
            (
                "....k\n.pp..\n..n..\n.P.P.\nK.Q..\n".parse().unwrap(),
                Color::White,
                2,
            ),
            (
                "r...k\n.p...\n..B..\n.p.P.\n....K\n".parse().unwrap(),
                Color::Black,
                2,
            ),
        ];

        for (board, to_act, max_depth) in cases {
            let position = Position::new(board, to_act);
            let pruned = Search::new(&position, SearchConfig::new(max_depth).unwrap()).start();
            let (bestmove, score) = unpruned(&position, max_depth);

            assert_eq!(pruned.bestmove, bestmove, "different move on\n{}", position.board());
            assert_eq!(pruned.score, score, "different score on\n{}", position.board());
        }
    }

    #[test]
    fn test_kings_only_finds_a_king_move() {
        let diagram = "\
            ....k...\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ....K...\n";
        let board: Board = diagram.parse().unwrap();
        assert!(!board.is_stalemate(Color::White));

        let result = search(diagram, Color::White, 1);
        let mv = result.bestmove.unwrap();
        assert_eq!(board.piece(mv.piece()).kind(), PieceKind::King);
        assert!(board.is_legal(&mv));
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_no_legal_moves_yields_no_move() {
        let result = search(
            "\
            k..\n\
            ..Q\n\
            .K.\n",
            Color::Black,
            2,
        );
        assert_eq!(result.bestmove, None);
        assert_eq!(result.score, -Score::INF);
    }

    #[test]
    fn test_takes_a_free_queen() {
        let diagram = "\
            k....\n\
            .....\n\
            ..q..\n\
            ....K\n\
            ..R..\n";
        let result = search(diagram, Color::White, 1);
        let mv = result.bestmove.unwrap();
        assert_eq!(mv.from(), Square::new(2, 4));
        assert_eq!(mv.to(), Square::new(2, 2));
    }

    #[test]
    fn test_promotes_a_pawn() {
        let diagram = "\
            ....k\n\
            P....\n\
            .....\n\
            .....\n\
            K....\n";
        let result = search(diagram, Color::White, 1);
        let mv = result.bestmove.unwrap();
        assert_eq!(mv.from(), Square::new(0, 1));
        assert_eq!(mv.to(), Square::new(0, 0));
    }

    #[test]
    fn test_ties_keep_the_earliest_move() {
        // Mirror-symmetric about the middle file, so moves to either side score the same
        let board: Board = "\
            ..k..\n\
            .....\n\
            .....\n\
            .....\n\
            ..K..\n"
            .parse()
            .unwrap();
        let position = Position::new(board, Color::White);
        let config = SearchConfig::new(1).unwrap();

        let moves = position.legal_moves();
        let scores = moves
            .iter()
            .map(|&mv| {
                let mut search = Search::new(&position, config);
                search.min_value(&position.with_move_made(mv), -Score::INF, Score::INF, 0)
            })
            .collect::<Vec<_>>();

        let best = scores.iter().copied().max().unwrap();
        let tied = moves
            .iter()
            .zip(&scores)
            .filter(|&(_, &score)| score == best)
            .map(|(&mv, _)| mv)
            .collect::<Vec<_>>();
        assert!(tied.len() > 1, "expected several best moves, got {tied:?}");

        let result = Search::new(&position, config).start();
        assert_eq!(result.bestmove, Some(tied[0]));
        assert_eq!(result.score, best);

        // Up and to the left comes first among the King's moves
        assert_eq!(tied[0].to(), Square::new(1, 3));
    }

    #[test]
    fn test_search_does_not_touch_the_root() {
        let board = Layout::Standard.board();
        let position = Position::new(board.clone(), Color::White);
        let result = Search::new(&position, SearchConfig::new(1).unwrap()).start();

        assert!(result.bestmove.is_some());
        assert_eq!(position.board(), &board);
    }
}
