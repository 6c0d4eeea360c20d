//! Fail-hard negamax with quiescence, iterative deepening, and a book
//! short-circuit.

use std::time::Instant;

use rand::rngs::ThreadRng;

use crate::board::{algebraic_notation, Color, Move, Position, NULL_MOVE};
use crate::book::{self, Book};
use crate::eval::evaluate_position;
use crate::tt::{TranspositionTable, TtEntry};
use crate::types::{CHECKMATE_LOWER, CHECKMATE_UPPER, QSEARCH_DELTA_MARGIN};
use crate::zobrist::zobrist_hash;

/// Owns everything one `go` command's search needs: the transposition
/// table (which persists and grows across searches, per spec), node
/// counter, and the wall-clock budget polled from inside the recursion.
pub struct Search<'a> {
    tt: &'a mut TranspositionTable,
    nodes: u64,
    start_time: Instant,
    time_limit_secs: f64,
    timeout: bool,
    max_depth: i32,
}

impl<'a> Search<'a> {
    pub fn new(tt: &'a mut TranspositionTable, time_limit_secs: f64) -> Self {
        Search {
            tt,
            nodes: 0,
            start_time: Instant::now(),
            time_limit_secs,
            timeout: false,
            max_depth: 0,
        }
    }

    fn elapsed_exceeds_budget(&mut self) -> bool {
        if self.start_time.elapsed().as_secs_f64() > self.time_limit_secs {
            self.timeout = true;
            true
        } else {
            false
        }
    }

    /// Fail-hard quiescence search over captures only, with delta
    /// pruning. No TT probe/store, matching the original.
    fn quiesce(&mut self, pos: &Position, mut alpha: i32, beta: i32) -> i32 {
        if self.elapsed_exceeds_budget() {
            return 0;
        }
        self.nodes += 1;

        let stand_pat = evaluate_position(pos);
        if stand_pat >= beta {
            return stand_pat;
        }
        if alpha < stand_pat {
            alpha = stand_pat;
        }

        for mv in pos.generate_pseudo_legal_moves() {
            let Some(captured) = mv.captured else {
                continue;
            };
            let new_pos = pos.make_move(&mv).rotate();
            if new_pos.king_in_check() {
                continue;
            }

            let promotion_gain = mv
                .promotion
                .map(|p| crate::types::endgame_value(p))
                .unwrap_or(0);
            if stand_pat + crate::types::endgame_value(captured) + promotion_gain + QSEARCH_DELTA_MARGIN < alpha {
                continue;
            }

            let score = -self.quiesce(&new_pos, -beta, -alpha);
            if self.timeout {
                return 0;
            }
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    /// Fail-hard negamax with alpha-beta pruning, TT probe/store, and
    /// TT-move-first ordering on top of `generate_pseudo_legal_moves`'s
    /// own descending-`evaluate_move` order.
    fn nega_max(&mut self, pos: &Position, depth: i32, mut alpha: i32, beta: i32, color: Color) -> (i32, Move) {
        if self.elapsed_exceeds_budget() {
            return (0, NULL_MOVE);
        }
        if depth == 0 {
            return (self.quiesce(pos, alpha, beta), NULL_MOVE);
        }

        let key = zobrist_hash(pos, color);
        let tt_entry = self.tt.get(key).copied();
        if let Some(entry) = tt_entry {
            if entry.depth >= depth || entry.score >= CHECKMATE_LOWER {
                return (entry.score, entry.best_move);
            }
        }

        self.nodes += 1;
        let mut moves = pos.generate_pseudo_legal_moves();
        if let Some(entry) = tt_entry {
            if let Some(i) = moves.iter().position(|m| *m == entry.best_move) {
                let mv = moves.remove(i);
                moves.insert(0, mv);
            }
        }

        let mut legal_move_found = false;
        let mut best_move = NULL_MOVE;
        for mv in moves {
            let new_pos = pos.make_move(&mv).rotate();
            if new_pos.king_in_check() {
                continue;
            }
            legal_move_found = true;

            let (child_score, _) = self.nega_max(&new_pos, depth - 1, -beta, -alpha, color.opposite());
            let score = -child_score;
            if self.timeout {
                return (0, NULL_MOVE);
            }

            if score >= beta {
                return (beta, best_move);
            }
            if score > alpha {
                alpha = score;
                best_move = mv;
            }
        }

        if !legal_move_found {
            let mut rotated = pos.rotate();
            rotated.king_passant = 0;
            return if rotated.king_in_check() {
                (-CHECKMATE_LOWER + self.max_depth - depth, NULL_MOVE)
            } else {
                (0, NULL_MOVE)
            };
        }

        if best_move != NULL_MOVE {
            self.tt.insert(
                key,
                TtEntry {
                    best_move,
                    depth,
                    score: alpha,
                },
            );
        }
        (alpha, best_move)
    }

    /// Reconstructs the principal variation from the transposition
    /// table, alternating `color` at each ply.
    fn principal_variation(&self, length: i32, pos: &Position, color: Color) -> Vec<Move> {
        if length <= 0 {
            return Vec::new();
        }
        let key = zobrist_hash(pos, color);
        let Some(entry) = self.tt.get(key) else {
            return Vec::new();
        };
        let best_move = entry.best_move;
        let new_pos = pos.make_move(&best_move).rotate();
        let mut pv = vec![best_move];
        pv.extend(self.principal_variation(length - 1, &new_pos, color.opposite()));
        pv
    }

    /// Runs iterative deepening from depth 1 up to `max_depth`, emitting
    /// an `info` line per completed iteration and falling back to the
    /// previous iteration's move if the time budget is exhausted
    /// mid-search. Returns `(None, 0)` if there are no legal moves and
    /// no book move is available (checkmate/stalemate at the root).
    pub fn iteratively_deepen(
        &mut self,
        pos: &Position,
        color: Color,
        max_depth: i32,
        books: &[Book],
        rng: &mut ThreadRng,
    ) -> Option<Move> {
        let book_entries = book::aggregate_entries(books, pos, color);
        if let Some(mv) = book::weighted_entry(&book_entries, rng) {
            println!("info string weighted bookmove");
            return Some(mv);
        }

        let mut best_move = NULL_MOVE;
        let mut previous_best_move = NULL_MOVE;
        self.start_time = Instant::now();
        self.timeout = false;

        for depth in 1..=max_depth {
            self.nodes = 0;
            self.max_depth = depth;
            let (score, mv) = self.nega_max(pos, depth, -CHECKMATE_UPPER, CHECKMATE_UPPER, color);
            if self.timeout {
                best_move = previous_best_move;
                break;
            }
            best_move = mv;

            let pv = self.principal_variation(depth, pos, color);
            let pv_string = pv
                .iter()
                .enumerate()
                .map(|(i, mv)| {
                    let mv_color = if i % 2 == 0 { color } else { color.opposite() };
                    algebraic_notation(mv, mv_color)
                })
                .collect::<Vec<_>>()
                .join(" ");
            let display_score = if color == Color::Black { -score } else { score };
            let elapsed_ms = (self.start_time.elapsed().as_secs_f64() * 1000.0).round() as u64;
            println!(
                "info depth {depth} score cp {display_score} nodes {} time {elapsed_ms} pv {pv_string}",
                self.nodes
            );

            if best_move == NULL_MOVE {
                break;
            }
            previous_best_move = best_move;
        }

        if best_move == NULL_MOVE {
            None
        } else {
            Some(best_move)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_in_one_is_found_at_shallow_depth() {
        // White to move: Qh5-f7 is mate (fool's mate position after 1.f3 e5 2.g4).
        let (pos, color) = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p2q/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2").unwrap();
        let mut tt = TranspositionTable::new();
        let mut search = Search::new(&mut tt, 10.0);
        let mut rng = rand::thread_rng();
        let best = search
            .iteratively_deepen(&pos, color, 2, &[], &mut rng)
            .expect("a mating move should be found");
        assert_eq!(crate::board::render_coordinates(best.to), "f7");
    }

    #[test]
    fn stalemate_position_returns_no_move() {
        // Classic stalemate: black king a8, white king b6, white queen c7 erased
        // for a clean stalemate: black to move, no legal moves, not in check.
        let (pos, color) = Position::from_fen("k7/1K6/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
        let mut tt = TranspositionTable::new();
        let mut search = Search::new(&mut tt, 10.0);
        let mut rng = rand::thread_rng();
        assert_eq!(search.iteratively_deepen(&pos, color, 2, &[], &mut rng), None);
    }

    #[test]
    fn search_from_start_position_returns_a_move() {
        let pos = Position::start();
        let mut tt = TranspositionTable::new();
        let mut search = Search::new(&mut tt, 10.0);
        let mut rng = rand::thread_rng();
        assert!(search
            .iteratively_deepen(&pos, Color::White, 2, &[], &mut rng)
            .is_some());
    }
}
