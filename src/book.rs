//! PolyGlot opening book reading and move selection.

use std::io::Read;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::board::{Cell, Color, Move, PieceKind, Position, A1, H1};
use crate::error::EngineError;
use crate::zobrist::zobrist_hash;

/// One 16-byte PolyGlot record: key, packed move, weight, learn (unused).
#[derive(Clone, Copy, Debug)]
struct RawRecord {
    key: u64,
    raw_move: u16,
    weight: u16,
}

pub struct Book {
    records: Vec<RawRecord>,
}

impl Book {
    /// Loads a PolyGlot `.bin` book from `path`. Every record is
    /// 16 bytes: an 8-byte big-endian key, 2-byte move, 2-byte weight,
    /// and a 4-byte learn counter we never read.
    pub fn load(path: &Path) -> Result<Book, EngineError> {
        let mut file = std::fs::File::open(path).map_err(|e| EngineError::BookIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| EngineError::BookIo {
            path: path.display().to_string(),
            source: e,
        })?;
        if bytes.len() % 16 != 0 {
            return Err(EngineError::BookFormat(path.display().to_string()));
        }
        let records = bytes
            .chunks_exact(16)
            .map(|chunk| RawRecord {
                key: u64::from_be_bytes(chunk[0..8].try_into().unwrap()),
                raw_move: u16::from_be_bytes(chunk[8..10].try_into().unwrap()),
                weight: u16::from_be_bytes(chunk[10..12].try_into().unwrap()),
            })
            .collect();
        Ok(Book { records })
    }

    /// Resolves the `opening-books/main{1..7}.bin` files next to the
    /// running executable. Missing files are skipped (logged by the
    /// caller), not fatal.
    pub fn load_default_books() -> Vec<Book> {
        let dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let mut books = Vec::new();
        for num in 1..=7 {
            let path = dir.join("opening-books").join(format!("main{num}.bin"));
            match Book::load(&path) {
                Ok(book) => {
                    log::info!("loaded opening book {}", path.display());
                    books.push(book);
                }
                Err(err) => {
                    log::warn!("skipping opening book {}: {err}", path.display());
                }
            }
        }
        books
    }
}

fn decoded_promotion_piece(code: u16) -> Option<PieceKind> {
    match code {
        1 => Some(PieceKind::Knight),
        2 => Some(PieceKind::Bishop),
        3 => Some(PieceKind::Rook),
        4 => Some(PieceKind::Queen),
        _ => None,
    }
}

/// Converts a PolyGlot move (endian square numbering, `e1h1`/`e1a1`
/// castling encoding) into our `Move`, in the mover's point of view.
fn decode_move(raw_move: u16, pos: &Position, color: Color) -> Move {
    let endian_start = ((raw_move >> 6) & 0x3f) as i32;
    let endian_end = (raw_move & 0x3f) as i32;
    let promotion_code = (raw_move >> 12) & 0x7;

    let mut start_square = 10 * (9 - (endian_start / 8)) + (endian_start % 8) + 1;
    let mut end_square = 10 * (9 - (endian_end / 8)) + (endian_end % 8) + 1;

    if color == Color::Black {
        start_square = 119 - start_square;
        end_square = 119 - end_square;
    }

    // PolyGlot represents castling as king-captures-own-rook (e1h1/e1a1).
    if start_square == 95 || start_square == 94 {
        if end_square == H1 {
            end_square = start_square + 2;
        } else if end_square == A1 {
            end_square = start_square - 2;
        }
    }

    let captured = match pos.cells[end_square as usize] {
        Cell::Occupied(p) => Some(p.kind),
        _ => None,
    };

    Move {
        from: start_square,
        to: end_square,
        captured,
        promotion: decoded_promotion_piece(promotion_code),
    }
}

/// All book entries (move, weight) matching `pos`'s Zobrist key in a
/// single book.
fn all_entries(book: &Book, pos: &Position, color: Color) -> Vec<(Move, u32)> {
    let key = zobrist_hash(pos, color);
    book.records
        .iter()
        .filter(|r| r.key == key)
        .map(|r| (decode_move(r.raw_move, pos, color), r.weight as u32))
        .collect()
}

/// Aggregates entries across every loaded book, summing weights for
/// moves that appear in more than one.
pub fn aggregate_entries(books: &[Book], pos: &Position, color: Color) -> Vec<(Move, u32)> {
    let mut total: Vec<(Move, u32)> = Vec::new();
    for book in books {
        for (mv, weight) in all_entries(book, pos, color) {
            if let Some(existing) = total.iter_mut().find(|(m, _)| *m == mv) {
                existing.1 += weight;
            } else {
                total.push((mv, weight));
            }
        }
    }
    total
}

/// The highest-weight entry, original-position PST delta breaking ties
/// (kept public and tested per the original's API; `Search` does not
/// call this — see DESIGN.md).
pub fn max_entry(entries: &[(Move, u32)], pos: &Position) -> Option<Move> {
    entries
        .iter()
        .max_by_key(|(mv, weight)| (*weight, crate::eval::evaluate_move(mv, pos)))
        .map(|(mv, _)| *mv)
}

/// Picks one entry at random, proportional to its weight. Mirrors the
/// original's `random.shuffle` + cumulative-sum-against-a-random-target
/// scheme, including its inclusive `randint(0, weight_sum)` upper bound
/// (so the final entry can be skipped and none picked).
pub fn weighted_entry(entries: &[(Move, u32)], rng: &mut impl Rng) -> Option<Move> {
    if entries.is_empty() {
        return None;
    }
    let weight_sum: u32 = entries.iter().map(|(_, w)| *w).sum();
    let target = rng.gen_range(0..=weight_sum);
    let mut shuffled: Vec<(Move, u32)> = entries.to_vec();
    // Fisher-Yates, matching random.shuffle's uniform permutation.
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    let mut running = 0u32;
    for (mv, weight) in shuffled {
        running += weight;
        if running >= target {
            return Some(mv);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Move, PieceKind};

    fn mv(from: i32, to: i32) -> Move {
        Move {
            from,
            to,
            captured: None,
            promotion: None,
        }
    }

    #[test]
    fn max_entry_prefers_highest_weight() {
        let pos = Position::start();
        let entries = vec![(mv(85, 65), 1), (mv(84, 64), 10)];
        assert_eq!(max_entry(&entries, &pos), Some(mv(84, 64)));
    }

    #[test]
    fn weighted_entry_on_empty_list_returns_none() {
        let mut rng = rand::thread_rng();
        assert_eq!(weighted_entry(&[], &mut rng), None);
    }

    #[test]
    fn weighted_entry_with_one_entry_always_returns_it() {
        let mut rng = rand::thread_rng();
        let entries = vec![(mv(85, 65), 5)];
        assert_eq!(weighted_entry(&entries, &mut rng), Some(mv(85, 65)));
    }

    #[test]
    fn decode_move_translates_kingside_castling_encoding() {
        let pos = Position::start();
        // e1h1 in PolyGlot's own square numbering (e1 = 4, h1 = 7).
        let raw_move: u16 = (4u16 << 6) | 7u16;
        let decoded = decode_move(raw_move, &pos, Color::White);
        // g1, the king's post-castling square; occupied by the mover's own
        // knight in the start position (the book encodes castling as
        // king-captures-rook, but the real move is king-to-g1).
        assert_eq!(decoded.to, crate::board::A1 + 6);
        assert_eq!(decoded.captured, Some(PieceKind::Knight));
    }
}
