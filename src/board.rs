//! Board representation, pseudo-legal move generation, and the handful of
//! pure transforms (`make_move`, `rotate`, `king_in_check`) the search
//! builds on.
//!
//! The board is a 10x12 grid (120 cells): files a-h live in columns 1-8,
//! rank 1 is row 9 and rank 8 is row 2. Rows 0-1, rows 10-11, and columns 0
//! and 9 are sentinels, which turns "did this move run off the edge of the
//! board" into a single cell test instead of a range check. The board is
//! always stored from the mover's point of view: a piece belonging to
//! whoever is to move is a "mover" piece, everything else is the
//! opponent's, and `rotate` flips between the two views.

use crate::eval;
use crate::error::EngineError;

/// Corner squares, in the mover's frame.
pub const A1: i32 = 91;
pub const H1: i32 = 98;
pub const A8: i32 = 21;
pub const H8: i32 = 28;

/// Cardinal directions as offsets on the flat 120-cell grid.
pub const NORTH: i32 = -10;
pub const EAST: i32 = 1;
pub const SOUTH: i32 = 10;
pub const WEST: i32 = -1;

pub const BOARD_CELLS: usize = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    fn directions(self) -> &'static [i32] {
        const DIAGONALS: [i32; 4] = [NORTH + EAST, SOUTH + EAST, SOUTH + WEST, NORTH + WEST];
        const ORTHOGONALS: [i32; 4] = [NORTH, EAST, SOUTH, WEST];
        const QUEEN_KING: [i32; 8] = [
            NORTH,
            EAST,
            SOUTH,
            WEST,
            NORTH + EAST,
            SOUTH + EAST,
            SOUTH + WEST,
            NORTH + WEST,
        ];
        const KNIGHT: [i32; 8] = [
            NORTH + NORTH + EAST,
            NORTH + NORTH + WEST,
            EAST + EAST + NORTH,
            EAST + EAST + SOUTH,
            SOUTH + SOUTH + EAST,
            SOUTH + SOUTH + WEST,
            WEST + WEST + SOUTH,
            WEST + WEST + NORTH,
        ];
        const PAWN: [i32; 4] = [NORTH, NORTH + NORTH, NORTH + WEST, NORTH + EAST];
        match self {
            PieceKind::Pawn => &PAWN,
            PieceKind::Knight => &KNIGHT,
            PieceKind::Bishop => &DIAGONALS,
            PieceKind::Rook => &ORTHOGONALS,
            PieceKind::Queen | PieceKind::King => &QUEEN_KING,
        }
    }

    fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    /// True if this piece belongs to the side to move.
    pub mover: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Sentinel,
    Empty,
    Occupied(Piece),
}

impl Cell {
    fn is_sentinel(self) -> bool {
        matches!(self, Cell::Sentinel)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::White => "w",
            Color::Black => "b",
        }
    }
}

/// A pseudo-legal move: `captured` and `promotion` are opponent/own piece
/// kinds respectively, not full `Piece`s, since a move can only capture an
/// opponent piece and can only promote its own pawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: i32,
    pub to: i32,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
}

/// Sentinel "no move" value, printed as `(none)` in UCI output.
pub const NULL_MOVE: Move = Move {
    from: 0,
    to: 0,
    captured: None,
    promotion: None,
};

#[derive(Clone, Copy)]
pub struct Position {
    pub cells: [Cell; BOARD_CELLS],
    /// (queenside, kingside) castling rights for the side to move.
    pub own_castling: (bool, bool),
    /// (queenside, kingside) castling rights for the opponent.
    pub opp_castling: (bool, bool),
    /// Cell the mover could capture en passant next move, 0 if none.
    pub en_passant: i32,
    /// Cell a king passed through while castling last ply, 0 if none.
    pub king_passant: i32,
}

impl Position {
    pub fn start() -> Position {
        let mut cells = [Cell::Sentinel; BOARD_CELLS];
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for file in 0..8 {
            // Rank 8: opponent's pieces (lowercase in the original source).
            cells[(A8 + file) as usize] = Cell::Occupied(Piece {
                kind: back_rank[file as usize],
                mover: false,
            });
            cells[(A8 + 10 + file) as usize] = Cell::Occupied(Piece {
                kind: PieceKind::Pawn,
                mover: false,
            });
            for rank_row in 4..=7 {
                cells[(A8 + 10 * rank_row + file) as usize] = Cell::Empty;
            }
            // Rank 1: the mover's own pieces.
            cells[(A1 - 10 + file) as usize] = Cell::Occupied(Piece {
                kind: PieceKind::Pawn,
                mover: true,
            });
            cells[(A1 + file) as usize] = Cell::Occupied(Piece {
                kind: back_rank[file as usize],
                mover: true,
            });
        }
        Position {
            cells,
            own_castling: (true, true),
            opp_castling: (true, true),
            en_passant: 0,
            king_passant: 0,
        }
    }

    pub fn find_piece(&self, kind: PieceKind, mover: bool) -> Option<i32> {
        for (idx, cell) in self.cells.iter().enumerate() {
            if let Cell::Occupied(p) = cell {
                if p.kind == kind && p.mover == mover {
                    return Some(idx as i32);
                }
            }
        }
        None
    }

    /// Pseudo-legal moves for the side to move, sorted by descending
    /// `evaluate_move` score (the only ordering besides the search's
    /// TT-move-first swap).
    pub fn generate_pseudo_legal_moves(&self) -> Vec<Move> {
        self.generate_moves_with_en_passant(self.en_passant)
    }

    /// Used internally by `king_in_check`, which deliberately disables
    /// en passant pseudo-moves during the attack scan (an en passant
    /// capture can never land on the king's square, so it cannot be a
    /// check-delivering move and including it only wastes work).
    fn generate_moves_with_en_passant(&self, en_passant: i32) -> Vec<Move> {
        let mut moves = Vec::new();
        for start in 0..BOARD_CELLS as i32 {
            let piece = match self.cells[start as usize] {
                Cell::Occupied(p) if p.mover => p,
                _ => continue,
            };
            for &dir in piece.kind.directions() {
                let mut end = start + dir;
                loop {
                    let end_cell = self.cells[end as usize];
                    if end_cell.is_sentinel() {
                        break;
                    }
                    if let Cell::Occupied(p) = end_cell {
                        if p.mover {
                            break; // blocked by our own piece
                        }
                    }
                    let captured = match end_cell {
                        Cell::Occupied(p) => Some(p.kind),
                        _ => None,
                    };

                    if piece.kind == PieceKind::Pawn {
                        if (dir == NORTH || dir == NORTH + NORTH) && captured.is_some() {
                            break; // pawn push onto an occupied square
                        }
                        if dir == NORTH + NORTH
                            && (start < A1 + NORTH
                                || !matches!(self.cells[(start + NORTH) as usize], Cell::Empty))
                        {
                            break; // double push only from the second rank, through an empty cell
                        }
                        if (dir == NORTH + WEST || dir == NORTH + EAST)
                            && captured.is_none()
                            && end + SOUTH != en_passant
                        {
                            break; // diagonal pawn move must capture or be en passant
                        }
                        if (A8..=H8).contains(&end) {
                            for &promo in &[
                                PieceKind::Queen,
                                PieceKind::Rook,
                                PieceKind::Bishop,
                                PieceKind::Knight,
                            ] {
                                moves.push(Move {
                                    from: start,
                                    to: end,
                                    captured,
                                    promotion: Some(promo),
                                });
                            }
                            break;
                        }
                    }

                    moves.push(Move {
                        from: start,
                        to: end,
                        captured,
                        promotion: None,
                    });

                    if !piece.kind.is_slider() || captured.is_some() {
                        break;
                    }

                    if start == A1 && self.own_castling.0 {
                        if let Cell::Occupied(k) = self.cells[(end + EAST) as usize] {
                            if k.kind == PieceKind::King && k.mover {
                                moves.push(Move {
                                    from: end + EAST,
                                    to: end + WEST,
                                    captured: None,
                                    promotion: None,
                                });
                            }
                        }
                    }
                    if start == H1 && self.own_castling.1 {
                        if let Cell::Occupied(k) = self.cells[(end + WEST) as usize] {
                            if k.kind == PieceKind::King && k.mover {
                                moves.push(Move {
                                    from: end + WEST,
                                    to: end + EAST,
                                    captured: None,
                                    promotion: None,
                                });
                            }
                        }
                    }

                    end += dir;
                }
            }
        }
        moves.sort_by(|a, b| eval::evaluate_move(b, self).cmp(&eval::evaluate_move(a, self)));
        moves
    }

    /// Applies a pseudo-legal move, returning the resulting position. Does
    /// not rotate the board; callers rotate afterward to hand the position
    /// to the opponent.
    pub fn make_move(&self, mv: &Move) -> Position {
        let mut new_pos = *self;
        let piece = match self.cells[mv.from as usize] {
            Cell::Occupied(p) => p,
            // No piece on the from-square (a replayed UCI move can name one
            // freely): leave the position untouched rather than crash.
            _ => return new_pos,
        };
        new_pos.king_passant = 0;
        new_pos.cells[mv.from as usize] = Cell::Empty;
        new_pos.cells[mv.to as usize] = Cell::Occupied(piece);

        if mv.from == A1 {
            new_pos.own_castling.0 = false;
        }
        if mv.from == H1 {
            new_pos.own_castling.1 = false;
        }
        if mv.to == A8 {
            new_pos.opp_castling.0 = false;
        }
        if mv.to == H8 {
            new_pos.opp_castling.1 = false;
        }

        if piece.kind == PieceKind::King {
            new_pos.own_castling = (false, false);
            if mv.from - mv.to == 2 {
                // queenside castling
                let passed = (mv.from + mv.to) / 2;
                new_pos.king_passant = passed;
                new_pos.cells[A1 as usize] = Cell::Empty;
                new_pos.cells[passed as usize] = Cell::Occupied(Piece {
                    kind: PieceKind::Rook,
                    mover: true,
                });
            } else if mv.to - mv.from == 2 {
                // kingside castling
                let passed = (mv.from + mv.to) / 2;
                new_pos.king_passant = passed;
                new_pos.cells[H1 as usize] = Cell::Empty;
                new_pos.cells[passed as usize] = Cell::Occupied(Piece {
                    kind: PieceKind::Rook,
                    mover: true,
                });
            }
        } else if piece.kind == PieceKind::Pawn {
            if mv.to == self.en_passant {
                new_pos.cells[(mv.to + SOUTH) as usize] = Cell::Empty;
            }
            if (A8..=H8).contains(&mv.to) {
                // A move reaching the last rank with no promotion letter
                // (malformed UCI input) defaults to queening rather than
                // leaving a pawn stranded on the back rank.
                new_pos.cells[mv.to as usize] = Cell::Occupied(Piece {
                    kind: mv.promotion.unwrap_or(PieceKind::Queen),
                    mover: true,
                });
            }
            if mv.to - mv.from == NORTH + NORTH {
                new_pos.en_passant = mv.to + SOUTH;
            } else {
                new_pos.en_passant = 0;
            }
        }
        // Non-king, non-pawn moves leave en_passant untouched, exactly as
        // the reference engine does: the square stays "live" until either
        // captured or overwritten by the next double push.
        new_pos
    }

    /// Rotates the board 180 degrees and swaps the mover bit on every
    /// piece, producing the position from the opponent's point of view.
    pub fn rotate(&self) -> Position {
        let mut new_pos = *self;
        new_pos.en_passant = 119 - self.en_passant;
        new_pos.king_passant = 119 - self.king_passant;
        new_pos.own_castling = self.opp_castling;
        new_pos.opp_castling = self.own_castling;
        for i in 0..60usize {
            let j = 119 - i;
            new_pos.cells[j] = swap_mover(self.cells[i]);
            new_pos.cells[i] = swap_mover(self.cells[j]);
        }
        new_pos
    }

    /// True if the side that just moved left its own king capturable.
    /// Called after `make_move` + `rotate`, so the king we're checking is
    /// now the lowercase (opponent, from this position's viewpoint) king.
    pub fn king_in_check(&self) -> bool {
        let king_sq = match self.find_piece(PieceKind::King, false) {
            Some(sq) => sq,
            None => return true,
        };
        let (castled, original_king_sq) = if self.king_passant == 23 || self.king_passant == 25 {
            (true, 24)
        } else if self.king_passant == 24 || self.king_passant == 26 {
            (true, 25)
        } else {
            (false, 0)
        };
        for mv in self.generate_moves_with_en_passant(0) {
            if mv.to == king_sq || mv.to == self.king_passant {
                return true;
            }
            if castled && mv.to == original_king_sq {
                return true;
            }
        }
        false
    }

    pub fn from_fen(fen: &str) -> Result<(Position, Color), EngineError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(EngineError::InvalidFen(fen.to_string()));
        }
        let rows: Vec<&str> = fields[0].split('/').collect();
        if rows.len() != 8 {
            return Err(EngineError::InvalidFen(fen.to_string()));
        }
        let mut cells = [Cell::Sentinel; BOARD_CELLS];
        for (row, row_str) in rows.iter().enumerate() {
            let mut idx = A8 + 10 * row as i32;
            for ch in row_str.chars() {
                if idx > A8 + 10 * row as i32 + 7 {
                    return Err(EngineError::InvalidFen(fen.to_string()));
                }
                if let Some(kind) = PieceKind::from_char(ch) {
                    cells[idx as usize] = Cell::Occupied(Piece {
                        kind,
                        mover: ch.is_ascii_uppercase(),
                    });
                    idx += 1;
                } else if let Some(n) = ch.to_digit(10) {
                    for _ in 0..n {
                        cells[idx as usize] = Cell::Empty;
                        idx += 1;
                    }
                } else {
                    return Err(EngineError::InvalidFen(fen.to_string()));
                }
            }
        }
        let color = match fields[1] {
            "b" => Color::Black,
            _ => Color::White,
        };
        let castling_field = fields[2];
        let own_castling = (castling_field.contains('Q'), castling_field.contains('K'));
        let opp_castling = (castling_field.contains('q'), castling_field.contains('k'));
        let en_passant = if fields.len() > 3 && fields[3] != "-" {
            parse_coordinates(fields[3]).ok_or_else(|| EngineError::InvalidFen(fen.to_string()))?
        } else {
            0
        };
        let mut pos = Position {
            cells,
            own_castling,
            opp_castling,
            en_passant,
            king_passant: 0,
        };
        // The FEN board is always White-at-bottom; rotate into the
        // mover-relative frame when it's Black to move.
        if color == Color::Black {
            pos = pos.rotate();
        }
        Ok((pos, color))
    }

    /// Inverse of `from_fen`: a 6-field FEN string (halfmove clock and
    /// fullmove number are not tracked, so they're always emitted as `0 1`,
    /// matching the reference engine).
    pub fn to_fen(&self, color: Color) -> String {
        let white_view = if color == Color::Black {
            self.rotate()
        } else {
            *self
        };
        let mut fen = String::new();
        for rank in 0..8 {
            let mut empty_run = 0;
            for file in 0..8 {
                let sq = 10 * (rank + 2) + file + 1;
                match white_view.cells[sq as usize] {
                    Cell::Occupied(p) => {
                        if empty_run > 0 {
                            fen.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        let ch = p.kind.to_char();
                        fen.push(if p.mover {
                            ch
                        } else {
                            ch.to_ascii_lowercase()
                        });
                    }
                    _ => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push_str(&empty_run.to_string());
            }
            if rank < 7 {
                fen.push('/');
            }
        }
        fen.push(' ');
        fen.push_str(color.as_str());
        let (own, opp) = (white_view.own_castling, white_view.opp_castling);
        if own.0 || own.1 || opp.0 || opp.1 {
            fen.push(' ');
            if own.1 {
                fen.push('K');
            }
            if own.0 {
                fen.push('Q');
            }
            if opp.1 {
                fen.push('k');
            }
            if opp.0 {
                fen.push('q');
            }
        } else {
            fen.push_str(" -");
        }
        if white_view.en_passant == 0 || white_view.en_passant == 119 {
            fen.push_str(" -");
        } else {
            fen.push(' ');
            fen.push_str(&render_coordinates(white_view.en_passant));
        }
        fen.push_str(" 0 1");
        fen
    }

    /// Renders the board as a list of display lines (one per printed row),
    /// the way `board [unicode]` does.
    pub fn display(&self, color: Color, unicode: bool) -> Vec<String> {
        let white_view = if color == Color::Black {
            self.rotate()
        } else {
            *self
        };
        let border = "+---+---+---+---+---+---+---+---+".to_string();
        let mut lines = Vec::new();
        for rank in 0..8 {
            lines.push(border.clone());
            let mut row = String::from("|");
            for file in 0..8 {
                let sq = 10 * (rank + 2) + file + 1;
                let glyph = match white_view.cells[sq as usize] {
                    Cell::Occupied(p) => piece_glyph(p, unicode),
                    _ => ' ',
                };
                row.push_str(&format!(" {} |", glyph));
            }
            row.push_str(&format!(" {}", 8 - rank));
            lines.push(row);
        }
        lines.push(border);
        lines.push("  a   b   c   d   e   f   g   h".to_string());
        lines
    }
}

fn swap_mover(cell: Cell) -> Cell {
    match cell {
        Cell::Occupied(p) => Cell::Occupied(Piece {
            kind: p.kind,
            mover: !p.mover,
        }),
        other => other,
    }
}

fn piece_glyph(p: Piece, unicode: bool) -> char {
    if !unicode {
        let ch = p.kind.to_char();
        return if p.mover { ch } else { ch.to_ascii_lowercase() };
    }
    match (p.kind, p.mover) {
        (PieceKind::King, true) => '♔',
        (PieceKind::King, false) => '♚',
        (PieceKind::Queen, true) => '♕',
        (PieceKind::Queen, false) => '♛',
        (PieceKind::Rook, true) => '♖',
        (PieceKind::Rook, false) => '♜',
        (PieceKind::Bishop, true) => '♗',
        (PieceKind::Bishop, false) => '♝',
        (PieceKind::Knight, true) => '♘',
        (PieceKind::Knight, false) => '♞',
        (PieceKind::Pawn, true) => '♙',
        (PieceKind::Pawn, false) => '♟',
    }
}

/// Converts a coordinate string (e.g. "e4") into a 10x12 cell index.
pub fn parse_coordinates(coord: &str) -> Option<i32> {
    let bytes = coord.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    if !(b'a'..=b'h').contains(&bytes[0]) || !(b'1'..=b'8').contains(&bytes[1]) {
        return None;
    }
    let file = (bytes[0] - b'a') as i32;
    let rank = (bytes[1] - b'0') as i32 - 1;
    Some(A1 + file - 10 * rank)
}

/// Converts a 10x12 cell index back into a coordinate string.
pub fn render_coordinates(index: i32) -> String {
    let rank = (index - A1) / 10;
    let file = (index - A1) % 10;
    format!("{}{}", (b'a' + file as u8) as char, 1 - rank)
}

/// Long algebraic notation for a move, e.g. `e2e4`, `e7e8q`. Castling is
/// always rendered as the king's own two-square move (`e1g1`), never as
/// the rook-capture form PolyGlot books use on disk.
pub fn algebraic_notation(mv: &Move, color: Color) -> String {
    if *mv == NULL_MOVE {
        return "(none)".to_string();
    }
    let (mut from, mut to) = (mv.from, mv.to);
    if color == Color::Black {
        from = 119 - from;
        to = 119 - to;
    }
    let promo = mv
        .promotion
        .map(|p| p.to_char().to_ascii_lowercase().to_string())
        .unwrap_or_default();
    format!("{}{}{}", render_coordinates(from), render_coordinates(to), promo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_has_twenty_legal_moves() {
        let pos = Position::start();
        let legal: Vec<_> = pos
            .generate_pseudo_legal_moves()
            .into_iter()
            .filter(|mv| !pos.make_move(mv).rotate().king_in_check())
            .collect();
        assert_eq!(legal.len(), 20);
    }

    #[test]
    fn rotate_is_an_involution() {
        let pos = Position::start();
        let back = pos.rotate().rotate();
        for i in 0..BOARD_CELLS {
            assert_eq!(pos.cells[i], back.cells[i]);
        }
        assert_eq!(pos.en_passant, back.en_passant);
        assert_eq!(pos.king_passant, back.king_passant);
        assert_eq!(pos.own_castling, back.own_castling);
        assert_eq!(pos.opp_castling, back.opp_castling);
    }

    #[test]
    fn fen_round_trips_through_start_position() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let (pos, color) = Position::from_fen(fen).unwrap();
        assert_eq!(color, Color::White);
        assert_eq!(pos.to_fen(color), fen);
    }

    #[test]
    fn parse_and_render_coordinates_round_trip() {
        for coord in ["a1", "h8", "e4", "d5"] {
            let idx = parse_coordinates(coord).unwrap();
            assert_eq!(render_coordinates(idx), coord);
        }
    }

    #[test]
    fn castling_move_is_generated_when_path_is_clear() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let (pos, _) = Position::from_fen(fen).unwrap();
        let moves = pos.generate_pseudo_legal_moves();
        let king_home = A1 + 4; // e1
        assert!(moves
            .iter()
            .any(|m| m.from == king_home && m.to == king_home + 2));
        assert!(moves
            .iter()
            .any(|m| m.from == king_home && m.to == king_home - 2));
    }

    #[test]
    fn en_passant_capture_is_pseudo_legal() {
        // White pawn on e5, black just played d7d5, so e5 can take d6 en passant.
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let (pos, _) = Position::from_fen(fen).unwrap();
        let moves = pos.generate_pseudo_legal_moves();
        let e5 = parse_coordinates("e5").unwrap();
        let d6 = parse_coordinates("d6").unwrap();
        assert!(moves.iter().any(|m| m.from == e5 && m.to == d6));
    }

    #[test]
    fn make_move_from_an_empty_square_is_a_noop() {
        // "e3e4" on the start position: e3 is empty, so a replayed UCI
        // move naming it must not panic.
        let pos = Position::start();
        let e3 = parse_coordinates("e3").unwrap();
        let e4 = parse_coordinates("e4").unwrap();
        let mv = Move {
            from: e3,
            to: e4,
            captured: None,
            promotion: None,
        };
        let after = pos.make_move(&mv);
        for i in 0..BOARD_CELLS {
            assert_eq!(pos.cells[i], after.cells[i]);
        }
    }

    #[test]
    fn make_move_promotion_without_a_letter_defaults_to_queen() {
        let fen = "4k3/4P3/8/8/8/8/8/4K3 w - - 0 1";
        let (pos, _) = Position::from_fen(fen).unwrap();
        let e7 = parse_coordinates("e7").unwrap();
        let e8 = parse_coordinates("e8").unwrap();
        let mv = Move {
            from: e7,
            to: e8,
            captured: None,
            promotion: None,
        };
        let after = pos.make_move(&mv);
        match after.cells[e8 as usize] {
            Cell::Occupied(p) => assert_eq!(p.kind, PieceKind::Queen),
            other => panic!("expected a piece on e8, found {other:?}"),
        }
    }
}
