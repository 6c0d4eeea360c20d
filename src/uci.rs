//! UCI protocol driver. Single-threaded, synchronous command loop: no
//! `stop` handling, no pondering, no worker threads. Search runs to
//! completion or to its time/depth budget before the next command is
//! read.

use std::io::BufRead;

use rand::rngs::ThreadRng;

use crate::board::{parse_coordinates, Color, Move, Position};
use crate::book::Book;
use crate::eval::evaluate_position;
use crate::search::Search;
use crate::tt::TranspositionTable;
use crate::types::{AUTHOR, DEFAULT_DEPTH, DEFAULT_TIME_LIMIT_SECS, NAME, VERSION};
use crate::zobrist::zobrist_hash;

pub struct Engine {
    tt: TranspositionTable,
    books: Vec<Book>,
    rng: ThreadRng,
    position: Position,
    color: Color,
    initialized: bool,
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            tt: TranspositionTable::new(),
            books: Vec::new(),
            rng: rand::thread_rng(),
            position: Position::start(),
            color: Color::White,
            initialized: false,
        }
    }

    /// Reads UCI commands from `input` until `quit` or end-of-stream.
    pub fn run<R: BufRead>(&mut self, input: R) {
        for line in input.lines() {
            let Ok(line) = line else { break };
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            match tokens[0] {
                "uci" => {
                    println!("id name {NAME} {VERSION}");
                    println!("id author {AUTHOR}");
                    println!("uciok");
                }
                "quit" => return,
                "isready" => self.handle_isready(),
                _ if !self.initialized => continue,
                "position" => self.handle_position(&tokens),
                "go" => self.handle_go(&tokens),
                "eval" => self.handle_eval(),
                "board" => self.handle_board(&tokens),
                "flip" => self.handle_flip(),
                _ => {}
            }
        }
    }

    fn handle_isready(&mut self) {
        if !self.initialized {
            self.initialized = true;
            self.books = Book::load_default_books();
            self.tt.clear();
        }
        println!("readyok");
    }

    fn handle_position(&mut self, tokens: &[&str]) {
        if tokens.len() >= 2 && tokens[1] == "startpos" {
            self.position = Position::start();
            self.color = Color::White;
        } else if tokens.len() >= 8 && tokens[1] == "fen" {
            let fen = tokens[2..8].join(" ");
            match Position::from_fen(&fen) {
                Ok((pos, color)) => {
                    self.position = pos;
                    self.color = color;
                }
                Err(err) => {
                    log::warn!("ignoring position command: {err}");
                    return;
                }
            }
        }

        if let Some(moves_index) = tokens.iter().position(|t| *t == "moves") {
            let moves_index = moves_index + 1;
            if moves_index < 3 {
                // Unreachable in practice ("position" always precedes
                // "startpos"/"fen moves", so this never fires), kept to
                // mirror the original's bounds check exactly.
                return;
            }
            let moves = &tokens[moves_index..];
            let mut ply = 0usize;
            for (i, mv_str) in moves.iter().enumerate() {
                ply = i;
                let Some((mut start, mut end, promotion)) = self.parse_raw_move(mv_str) else {
                    continue;
                };
                // Coordinates arrive in White's frame; flip into the
                // mover's frame if Black is to move, then flip again
                // (independently) if this ply belongs to the opponent.
                if self.color == Color::Black {
                    start = 119 - start;
                    end = 119 - end;
                }
                let mv = Move {
                    from: start,
                    to: end,
                    captured: None,
                    promotion,
                };
                if ply % 2 == 1 {
                    let mv = Move {
                        from: 119 - mv.from,
                        to: 119 - mv.to,
                        captured: None,
                        promotion,
                    };
                    self.position = self.position.rotate();
                    self.position = self.position.make_move(&mv);
                    self.position = self.position.rotate();
                } else {
                    self.position = self.position.make_move(&mv);
                }
            }
            if !moves.is_empty() && ply % 2 == 0 {
                self.position = self.position.rotate();
                self.color = self.color.opposite();
            }
        }
        self.position.king_passant = 0;
    }

    /// Parses a long-algebraic UCI move (e.g. `e2e4`, `e7e8q`) into raw
    /// `(start, end, promotion)` coordinates in White's frame, before any
    /// mover/ply-relative flipping.
    fn parse_raw_move(&self, mv_str: &str) -> Option<(i32, i32, Option<crate::board::PieceKind>)> {
        if mv_str.len() < 4 {
            return None;
        }
        let start = parse_coordinates(&mv_str[0..2])?;
        let end = parse_coordinates(&mv_str[2..4])?;
        let promotion = if mv_str.len() > 4 {
            crate::board::PieceKind::from_char(mv_str[4..].chars().next()?.to_ascii_uppercase())
        } else {
            None
        };
        Some((start, end, promotion))
    }

    fn handle_go(&mut self, tokens: &[&str]) {
        let mut depth = DEFAULT_DEPTH;
        let mut time_limit = DEFAULT_TIME_LIMIT_SECS;

        if let Some(i) = tokens.iter().position(|t| *t == "movetime") {
            if let Some(v) = tokens.get(i + 1).and_then(|s| s.parse::<f64>().ok()) {
                time_limit = v / 1000.0;
            }
        }
        if let Some(i) = tokens.iter().position(|t| *t == "depth") {
            if let Some(v) = tokens.get(i + 1).and_then(|s| s.parse::<i32>().ok()) {
                depth = v;
            }
        }
        if tokens.contains(&"wtime") || tokens.contains(&"btime") || tokens.contains(&"winc") || tokens.contains(&"binc") {
            let parse_ms = |tokens: &[&str], name: &str, default: f64| -> f64 {
                tokens
                    .iter()
                    .position(|t| *t == name)
                    .and_then(|i| tokens.get(i + 1))
                    .and_then(|s| s.parse::<f64>().ok())
                    .map(|v| v / 1000.0)
                    .unwrap_or(default)
            };
            let mut white_time = parse_ms(tokens, "wtime", 400.0);
            let mut black_time = parse_ms(tokens, "btime", 400.0);
            let mut white_inc = parse_ms(tokens, "winc", 0.0);
            let mut black_inc = parse_ms(tokens, "binc", 0.0);
            if self.color == Color::Black {
                std::mem::swap(&mut white_time, &mut black_time);
                std::mem::swap(&mut white_inc, &mut black_inc);
            }
            time_limit = if white_time <= 60.0 { 1.0 } else { white_time / 40.0 + white_inc };
        }

        let mut search = Search::new(&mut self.tt, time_limit);
        let best_move = search.iteratively_deepen(&self.position, self.color, depth, &self.books, &mut self.rng);
        let notation = crate::board::algebraic_notation(&best_move.unwrap_or(crate::board::NULL_MOVE), self.color);
        println!("bestmove {notation}");
    }

    fn handle_eval(&self) {
        let mut score = evaluate_position(&self.position) as f64 / 100.0;
        if self.color == Color::Black {
            score = -score;
        }
        let sign = if score < 0.0 { "" } else { "+" };
        println!("static eval: {sign}{}", format_like_python_float(score));
    }

    fn handle_board(&self, tokens: &[&str]) {
        let unicode = tokens.get(1) == Some(&"unicode");
        for line in self.position.display(self.color, unicode) {
            println!("{line}");
        }
        println!("FEN: {}", self.position.to_fen(self.color));
        println!("HASH: {:#X}", zobrist_hash(&self.position, self.color));
    }

    fn handle_flip(&mut self) {
        self.position = self.position.rotate();
        self.color = self.color.opposite();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

/// Renders a float the way Python's `str()` does: the shortest
/// round-tripping decimal, but always with a fractional part (`0.0`, not
/// `0`). Rust's `f64` `Display` already gives the shortest round-trip
/// digits, so only the missing-`.0` case needs patching.
fn format_like_python_float(value: f64) -> String {
    let rendered = format!("{value}");
    if rendered.contains('.') {
        rendered
    } else {
        format!("{rendered}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn isready_initializes_the_engine_once() {
        let mut engine = Engine::new();
        assert!(!engine.initialized);
        engine.run(Cursor::new(b"isready\nquit\n".to_vec()));
        assert!(engine.initialized);
    }

    #[test]
    fn commands_before_isready_are_ignored() {
        let mut engine = Engine::new();
        engine.run(Cursor::new(b"flip\nquit\n".to_vec()));
        // "flip" was ignored: still the unrotated start position, White to move.
        assert_eq!(engine.color, Color::White);
        assert_eq!(engine.position.cells, Position::start().cells);
    }

    #[test]
    fn flip_after_isready_rotates_the_position_and_color() {
        let mut engine = Engine::new();
        engine.run(Cursor::new(b"isready\nflip\nquit\n".to_vec()));
        assert_eq!(engine.color, Color::Black);
        assert_eq!(engine.position.cells, Position::start().rotate().cells);
    }

    #[test]
    fn position_startpos_with_moves_advances_the_position() {
        let mut engine = Engine::new();
        engine.run(Cursor::new(
            b"isready\nposition startpos moves e2e4\nquit\n".to_vec(),
        ));
        assert_eq!(engine.color, Color::Black);
        // After White's e2e4 and the trailing rotate, it's Black to move
        // looking at a board with a mover pawn on e4 (e5 in Black's frame).
        let legal_targets: Vec<i32> = engine
            .position
            .generate_pseudo_legal_moves()
            .iter()
            .map(|m| m.to)
            .collect();
        assert!(!legal_targets.is_empty());
    }

    #[test]
    fn parse_raw_move_rejects_short_strings() {
        let engine = Engine::new();
        assert!(engine.parse_raw_move("e2").is_none());
    }

    #[test]
    fn float_formatting_always_keeps_a_decimal_point() {
        assert_eq!(format_like_python_float(0.0), "0.0");
        assert_eq!(format_like_python_float(-1.0), "-1.0");
        assert_eq!(format_like_python_float(1.23), "1.23");
    }

    #[test]
    fn eval_on_the_start_position_prints_a_decimal_point() {
        let mut engine = Engine::new();
        engine.run(Cursor::new(b"isready\neval\nquit\n".to_vec()));
        // Can't capture stdout here; just exercise the formatter directly
        // for the value `eval` would print.
        let score = evaluate_position(&engine.position) as f64 / 100.0;
        assert!(format_like_python_float(score).contains('.'));
    }
}
