//! Static evaluation: material + piece-square tables + king tropism +
//! mop-up, tapered between midgame and endgame scores by game phase.

use crate::board::{Cell, Move, PieceKind, Position};
use crate::types::*;

/// Manhattan distance between two cells on the flat 120-cell grid. Since
/// the grid's row/column deltas equal real rank/file deltas, this works
/// directly on cell indices without converting to file/rank first.
pub fn manhattan_distance(a: i32, b: i32) -> i32 {
    (a % 10 - b % 10).abs() + (a / 10 - b / 10).abs()
}

/// Maps an on-board cell index to its 0..63 index into a piece-square
/// table (row 0 = rank 1, as the tables are laid out top-to-bottom from
/// rank 8 in source but read bottom-to-top here after the `(row - 2)`
/// shift cancels the board's two sentinel rows).
fn pst_index(square: i32) -> usize {
    let row = square / 10 - 2;
    let col = square % 10 - 1;
    (row * 8 + col) as usize
}

/// Mirrors a cell vertically (rank 8 <-> rank 1, same file), used to look
/// up an opponent piece's PST value as if it were our own piece on the
/// mirrored rank.
fn mirror_square(square: i32) -> i32 {
    (11 - square / 10) * 10 + square % 10
}

/// Python's `//` floors toward negative infinity for a positive divisor;
/// Rust's `/` truncates toward zero. `div_euclid` matches Python here
/// since all our divisors are positive.
fn floor_div(a: i32, b: i32) -> i32 {
    a.div_euclid(b)
}

fn find_king(pos: &Position, mover: bool) -> i32 {
    pos.find_piece(PieceKind::King, mover).unwrap_or(0)
}

/// Remaining "phase" of the game in the 0..256 range: near 0 at the
/// start (favoring the midgame score) and approaching 256 as major and
/// minor pieces come off the board (favoring the endgame score).
pub fn game_phase(pos: &Position) -> i32 {
    let mut phase = TOTAL_PHASE;
    for cell in pos.cells.iter() {
        if let Cell::Occupied(p) = cell {
            phase -= match p.kind {
                PieceKind::Knight => KNIGHT_PHASE,
                PieceKind::Bishop => BISHOP_PHASE,
                PieceKind::Rook => ROOK_PHASE,
                PieceKind::Queen => QUEEN_PHASE,
                _ => 0,
            };
        }
    }
    floor_div(phase * 256 + TOTAL_PHASE / 2, TOTAL_PHASE)
}

pub fn interpolate(midgame_score: i32, endgame_score: i32, phase: i32) -> i32 {
    floor_div(midgame_score * (256 - phase) + endgame_score * phase, 256)
}

/// Evaluates the position for the side to move: material, PST, king
/// tropism, and mop-up bonus, tapered by game phase.
pub fn evaluate_position(pos: &Position) -> i32 {
    let mut midgame_score = 0;
    let mut endgame_score = 0;
    let king_square = find_king(pos, true);
    let opponent_king_square = find_king(pos, false);

    for (square, cell) in pos.cells.iter().enumerate() {
        let square = square as i32;
        let p = match cell {
            Cell::Occupied(p) => *p,
            _ => continue,
        };
        if p.mover {
            midgame_score += midgame_value(p.kind) + midgame_pst(p.kind)[pst_index(square)];
            midgame_score += midgame_tropism(p.kind) / manhattan_distance(square, opponent_king_square);
            endgame_score += endgame_value(p.kind) + endgame_pst(p.kind)[pst_index(square)];
            endgame_score += endgame_tropism(p.kind) / manhattan_distance(square, opponent_king_square);
        } else {
            let mirrored = pst_index(mirror_square(square));
            midgame_score -= midgame_value(p.kind) + midgame_pst(p.kind)[mirrored];
            midgame_score -= midgame_tropism(p.kind) / manhattan_distance(square, king_square);
            endgame_score -= endgame_value(p.kind) + endgame_pst(p.kind)[mirrored];
            endgame_score -= endgame_tropism(p.kind) / manhattan_distance(square, king_square);
        }
    }

    let mop_up = MOP_UP_SCORE * (14 - manhattan_distance(king_square, opponent_king_square)) / 14;
    if endgame_score > 0 {
        endgame_score += mop_up;
    } else if endgame_score < 0 {
        endgame_score -= mop_up;
    }
    interpolate(midgame_score, endgame_score, game_phase(pos))
}

/// Evaluates a single move by the delta it makes to the tapered PST
/// score, used purely for move ordering (search's TT-move-first swap
/// aside, this descending sort is the engine's entire ordering scheme).
pub fn evaluate_move(mv: &Move, pos: &Position) -> i32 {
    let piece_moved = match pos.cells[mv.from as usize] {
        Cell::Occupied(p) => p.kind,
        _ => return 0,
    };
    let mut midgame_score = midgame_pst(piece_moved)[pst_index(mv.to)] - midgame_pst(piece_moved)[pst_index(mv.from)];
    let mut endgame_score = endgame_pst(piece_moved)[pst_index(mv.to)] - endgame_pst(piece_moved)[pst_index(mv.from)];

    if let Some(captured_kind) = mv.captured {
        let mirrored = pst_index(mirror_square(mv.to));
        midgame_score += midgame_value(captured_kind) + midgame_pst(captured_kind)[mirrored];
        endgame_score += endgame_value(captured_kind) + endgame_pst(captured_kind)[mirrored];
    }

    if piece_moved == PieceKind::King && (mv.from - mv.to).abs() == 2 {
        let rook_to = pst_index((mv.from + mv.to) / 2);
        let rook_from = pst_index(if mv.to < mv.from {
            crate::board::A1
        } else {
            crate::board::H1
        });
        midgame_score += midgame_pst(PieceKind::Rook)[rook_to] - midgame_pst(PieceKind::Rook)[rook_from];
        endgame_score += endgame_pst(PieceKind::Rook)[rook_to] - endgame_pst(PieceKind::Rook)[rook_from];
    }

    if piece_moved == PieceKind::Pawn {
        if let Some(promotion) = mv.promotion {
            let to = pst_index(mv.to);
            midgame_score += midgame_pst(promotion)[to] - midgame_pst(PieceKind::Pawn)[to] + midgame_value(promotion)
                - MIDGAME_PAWN_VALUE;
            endgame_score += endgame_pst(promotion)[to] - endgame_pst(PieceKind::Pawn)[to] + endgame_value(promotion)
                - ENDGAME_PAWN_VALUE;
        }
        if mv.to + crate::board::SOUTH == pos.en_passant {
            let captured_sq = mv.to + crate::board::SOUTH;
            let mirrored = pst_index(mirror_square(captured_sq));
            midgame_score += midgame_pst(PieceKind::Pawn)[mirrored];
            endgame_score += endgame_pst(PieceKind::Pawn)[mirrored];
        }
    }

    interpolate(midgame_score, endgame_score, game_phase(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn start_position_is_balanced() {
        assert_eq!(evaluate_position(&Position::start()), 0);
    }

    #[test]
    fn missing_a_queen_scores_clearly_negative() {
        let fen = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let (pos, _) = Position::from_fen(fen).unwrap();
        assert!(evaluate_position(&pos) < -500);
    }

    #[test]
    fn capturing_move_scores_higher_than_a_quiet_move() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let (pos, _) = Position::from_fen(fen).unwrap();
        let moves = pos.generate_pseudo_legal_moves();
        let capture = moves
            .iter()
            .find(|m| m.captured.is_some())
            .expect("exd6 en passant should be pseudo-legal");
        let quiet = moves
            .iter()
            .find(|m| m.captured.is_none())
            .expect("some quiet move should exist");
        assert!(evaluate_move(capture, &pos) > evaluate_move(quiet, &pos));
    }
}
