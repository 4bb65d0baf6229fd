//! FEN codec for xiangqi positions.
//!
//! A position string lists the ranks from black's back rank (rank 9) down to
//! red's back rank (rank 0), separated by `/`. Uppercase letters are red
//! pieces, lowercase letters are black pieces and digits are runs of empty
//! intersections. The fields after the first space carry the side to move
//! followed by placeholders kept for compatibility with stored records.
//!
//! ```
//! use xiangqi::fen;
//! use xiangqi::Color;
//!
//! let pieces = fen::decode("start").unwrap();
//! assert_eq!(32, pieces.len());
//!
//! let s = fen::encode(&pieces, Color::Red);
//! assert_eq!(format!("{} w - - 0 1", fen::INITIAL_FEN), s);
//! ```

use itertools::Itertools;

use crate::error::FenError;
use crate::square::{Square, NUM_FILES, NUM_RANKS};
use crate::{Color, Piece, Pieces};

/// Placement of the initial position.
pub const INITIAL_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR";

/// Alias accepted by [`decode`] for [`INITIAL_FEN`].
pub const START_ALIAS: &str = "start";

/// Parses the placement part of a FEN string.
///
/// Everything after the first space is ignored. A placement of `"start"`
/// stands for the initial position. Malformed input never yields a partial map.
///
/// # Examples
///
/// ```
/// use xiangqi::fen::decode;
/// use xiangqi::error::FenError;
/// use xiangqi::square::consts::*;
///
/// let pieces = decode("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1").unwrap();
/// assert_eq!(2, pieces.len());
/// assert_eq!("K", pieces[&SQ_E0].to_string());
///
/// assert_eq!(Err(FenError::RankUnderflow { rank: 9 }), decode("4k3/9/9/9/9/9/9/9/9/4K4"));
/// ```
pub fn decode(fen: &str) -> Result<Pieces, FenError> {
    let placement = match fen.split(' ').next().unwrap_or_default() {
        START_ALIAS => INITIAL_FEN,
        placement => placement,
    };

    if placement.is_empty() {
        return Err(FenError::Empty);
    }

    let mut pieces = Pieces::default();
    let mut ranks = placement.split('/');

    for rank in (0..NUM_RANKS).rev() {
        let row = ranks.next().ok_or(FenError::TooFewRanks)?;
        let mut file = 0u8;

        for c in row.chars() {
            match c {
                '1'..='9' => {
                    file += c as u8 - b'0';
                }
                _ => {
                    let pc = Piece::from_fen(c).ok_or(FenError::IllegalPiece(c))?;
                    let sq = Square::new(file, rank).ok_or(FenError::RankOverflow { rank })?;
                    pieces.insert(sq, pc);
                    file += 1;
                }
            }

            if file > NUM_FILES {
                return Err(FenError::RankOverflow { rank });
            }
        }

        if file < NUM_FILES {
            return Err(FenError::RankUnderflow { rank });
        }
    }

    if ranks.next().is_some() {
        return Err(FenError::TooManyRanks);
    }

    Ok(pieces)
}

/// Serializes the placement part of a position.
pub fn board_fen(pieces: &Pieces) -> String {
    (0..NUM_RANKS)
        .rev()
        .map(|rank| {
            let mut s = String::new();
            let mut empty = 0;

            for file in 0..NUM_FILES {
                match Square::new(file, rank).and_then(|sq| pieces.get(&sq)) {
                    Some(pc) => {
                        if empty > 0 {
                            s.push_str(&empty.to_string());
                            empty = 0;
                        }
                        s.push(pc.to_fen());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                s.push_str(&empty.to_string());
            }

            s
        })
        .join("/")
}

/// Serializes a position, appending the fixed `" <w|b> - - 0 1"` suffix.
pub fn encode(pieces: &Pieces, side_to_move: Color) -> String {
    format!("{} {} - - 0 1", board_fen(pieces), side_to_move.to_fen())
}

/// Reads the side to move from the second field of a FEN string.
///
/// `"w"` is red, anything else (including a missing field) is black.
///
/// # Examples
///
/// ```
/// use xiangqi::{fen, Color};
///
/// assert_eq!(Color::Red, fen::side_to_move("9/9/9/9/9/9/9/9/9/9 w - - 0 1"));
/// assert_eq!(Color::Black, fen::side_to_move("9/9/9/9/9/9/9/9/9/9 b - - 0 1"));
/// ```
pub fn side_to_move(fen: &str) -> Color {
    Color::from_fen(fen.split(' ').nth(1).unwrap_or_default())
}

/// Rotates a position 180 degrees and swaps the colors of all pieces.
///
/// When the string carries a side to move, it is flipped as well; a
/// placement-only string yields a placement-only result.
///
/// # Examples
///
/// ```
/// use xiangqi::fen::mirror_fen;
///
/// assert_eq!(
///     "3k5/9/9/9/9/9/9/9/9/4K4 b - - 0 1",
///     mirror_fen("4k4/9/9/9/9/9/9/9/9/5K3 w - - 0 1").unwrap(),
/// );
/// assert_eq!(
///     "3k5/9/9/9/9/9/9/9/9/4K4",
///     mirror_fen("4k4/9/9/9/9/9/9/9/9/5K3").unwrap(),
/// );
/// ```
pub fn mirror_fen(fen: &str) -> Result<String, FenError> {
    let pieces = decode(fen)?;

    let mirrored: Pieces = pieces
        .into_iter()
        .filter_map(|(sq, pc)| {
            Square::new(NUM_FILES - 1 - sq.file(), NUM_RANKS - 1 - sq.rank())
                .map(|mirrored| (mirrored, pc.flip()))
        })
        .collect();

    match fen.split_whitespace().nth(1) {
        Some(side) => Ok(encode(&mirrored, Color::from_fen(side).flip())),
        None => Ok(board_fen(&mirrored)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::consts::*;
    use crate::PieceType;

    #[test]
    fn decode_initial() {
        let pieces = decode(INITIAL_FEN).unwrap();
        assert_eq!(32, pieces.len());
        assert_eq!(Piece::new(PieceType::Rook, Color::Red), pieces[&SQ_A0]);
        assert_eq!(Piece::new(PieceType::King, Color::Red), pieces[&SQ_E0]);
        assert_eq!(Piece::new(PieceType::Cannon, Color::Red), pieces[&SQ_B2]);
        assert_eq!(Piece::new(PieceType::Pawn, Color::Red), pieces[&SQ_I3]);
        assert_eq!(Piece::new(PieceType::King, Color::Black), pieces[&SQ_E9]);
        assert_eq!(Piece::new(PieceType::Cannon, Color::Black), pieces[&SQ_H7]);
        assert_eq!(Piece::new(PieceType::Pawn, Color::Black), pieces[&SQ_A6]);

        assert_eq!(pieces, decode("start").unwrap());
    }

    #[test]
    fn decode_ignores_trailing_fields() {
        let a = decode("4k4/9/9/9/9/9/9/9/9/4K4").unwrap();
        let b = decode("4k4/9/9/9/9/9/9/9/9/4K4 b - - 12 40").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn decode_errors() {
        let cases = [
            ("", FenError::Empty),
            (" w - - 0 1", FenError::Empty),
            ("9/9/9/9/9/9/9/9/9", FenError::TooFewRanks),
            ("9/9/9/9/9/9/9/9/9/9/9", FenError::TooManyRanks),
            ("9/9/9/9/9/9/9/9/9/91", FenError::RankOverflow { rank: 0 }),
            ("rnbakabnrr/9/9/9/9/9/9/9/9/9", FenError::RankOverflow { rank: 9 }),
            ("9/9/9/9/9/8/9/9/9/9", FenError::RankUnderflow { rank: 4 }),
            ("9/9/9/9/4x4/9/9/9/9/9", FenError::IllegalPiece('x')),
            ("9/9/9/9/4k04/9/9/9/9/9", FenError::IllegalPiece('0')),
        ];

        for (fen, err) in cases.iter() {
            assert_eq!(Err(err.clone()), decode(fen), "{fen}");
        }
    }

    #[test]
    fn encode_collapses_runs() {
        let mut pieces = Pieces::default();
        pieces.insert(SQ_E0, Piece::new(PieceType::King, Color::Red));
        pieces.insert(SQ_D9, Piece::new(PieceType::King, Color::Black));
        pieces.insert(SQ_I5, Piece::new(PieceType::Pawn, Color::Red));

        assert_eq!(
            "3k5/9/9/9/8P/9/9/9/9/4K4 b - - 0 1",
            encode(&pieces, Color::Black)
        );
    }

    #[test]
    fn roundtrip() {
        let fens = [
            INITIAL_FEN,
            "4k4/9/9/9/9/9/9/3rr4/9/4K4",
            "rnbak1bnr/4c4/1c5c1/9/4P4/9/P1P3P1P/1C5C1/9/RNBAK1BNR",
            "9/9/9/9/9/9/9/9/9/9",
        ];

        for fen in fens.iter() {
            let pieces = decode(fen).unwrap();
            assert_eq!(*fen, board_fen(&pieces));
            assert_eq!(pieces, decode(&encode(&pieces, Color::Red)).unwrap());
        }
    }

    #[test]
    fn side_to_move_field() {
        assert_eq!(Color::Red, side_to_move("start w"));
        assert_eq!(Color::Black, side_to_move("start"));
        assert_eq!(Color::Black, side_to_move("9/9/9/9/9/9/9/9/9/9 r - - 0 1"));
    }

    #[test]
    fn mirror_initial_is_symmetric() {
        assert_eq!(
            format!("{INITIAL_FEN} b - - 0 1"),
            mirror_fen(&format!("{INITIAL_FEN} w - - 0 1")).unwrap()
        );
        assert!(mirror_fen("9/9").is_err());
    }
}
