mod common;

use xiangqi::movegen::pseudo_legal_destinations;
use xiangqi::rules::{self, is_checkmate, would_be_in_check};
use xiangqi::square::consts::*;
use xiangqi::{fen, Color, GameStatus, Move, Piece, PieceType, Position, Square};

use common::{enable_logging, pieces};

#[test]
fn cannon_needs_exactly_one_screen() {
    enable_logging();
    let p = pieces("4k4/4p4/4P4/9/4C4/9/9/9/9/3K5");
    let dests = pseudo_legal_destinations(&p, SQ_E5);

    assert!(dests.contains(SQ_E8));
    assert!(!dests.contains(SQ_E9));
    assert!(!dests.contains(SQ_E7));
    assert!(dests.contains(SQ_E6));
}

#[test]
fn knight_is_hobbled_by_its_leg() {
    let p = pieces("4k4/9/9/4P4/4N4/9/9/9/9/3K5");
    let dests = pseudo_legal_destinations(&p, SQ_E5);

    assert!(!dests.contains(SQ_D7));
    assert!(!dests.contains(SQ_F7));
    for sq in [SQ_C6, SQ_G6, SQ_C4, SQ_G4, SQ_D3, SQ_F3] {
        assert!(dests.contains(sq), "{sq}");
    }
}

#[test]
fn elephant_never_crosses_the_river() {
    for (start, color) in [(SQ_C0, Color::Red), (SQ_G9, Color::Black)] {
        let bishop = Piece::new(PieceType::Bishop, color);

        let mut seen = vec![start];
        let mut frontier = vec![start];
        while let Some(sq) = frontier.pop() {
            let mut board = pieces("9/9/9/9/9/9/9/9/9/9");
            board.insert(sq, bishop);
            for next in pseudo_legal_destinations(&board, sq) {
                if !seen.contains(&next) {
                    seen.push(next);
                    frontier.push(next);
                }
            }
        }

        assert_eq!(7, seen.len());
        assert!(seen.iter().all(|sq| sq.is_home_side(color)));
    }
}

#[test]
fn flying_general() {
    let p = pieces("4k4/9/9/9/9/9/9/9/9/4K4");

    assert!(rules::generals_are_facing(&p));
    assert!(rules::in_check(&p, Color::Red));
    assert!(rules::in_check(&p, Color::Black));
    assert!(would_be_in_check(&p, SQ_E0, SQ_E1, Color::Red));
    assert!(would_be_in_check(&p, SQ_E9, SQ_E8, Color::Black));

    let king_moves = rules::legal_destinations(&p, SQ_E0);
    assert!(!king_moves.is_empty());
    assert!(king_moves.filter(|sq| sq.file() != SQ_E0.file()).count() > 0);
    assert!(!king_moves.contains(SQ_E1));
}

#[test]
fn trapped_king_between_two_rooks_is_not_mate() {
    let position = "4k4/9/9/9/9/9/9/3rr4/9/4K4 w - - 0 1";

    assert_eq!(Ok(true), rules::is_in_check(position));
    assert_eq!(Ok(false), is_checkmate(position));

    let pos = Position::from_fen(position).unwrap();
    assert_eq!(GameStatus::Check(Color::Red), pos.game_status());
    assert_eq!(vec![Move::Normal { from: SQ_E0, to: SQ_F0 }], pos.legal_moves());
}

#[test]
fn mate_and_missing_king() {
    assert_eq!(Ok(true), is_checkmate("3k5/9/9/9/5r3/9/4r4/9/9/4K4 w - - 0 1"));
    assert_eq!(Ok(true), is_checkmate("4k4/9/9/9/9/9/9/9/9/9 w - - 0 1"));
    assert_eq!(Ok(false), is_checkmate("start w"));
    assert!(is_checkmate("4k4/9/9").is_err());
}

/// Walks a deterministic game, checking the codec and the movement rules at every ply.
#[test]
fn walk_preserves_invariants() {
    let mut pos = Position::from_fen("start w").unwrap();

    for ply in 0..60 {
        let p = pos.pieces().clone();

        let decoded = fen::decode(&fen::encode(&p, pos.side_to_move())).unwrap();
        assert_eq!(p, decoded, "round trip failed at ply {ply}");

        for sq in Square::iter() {
            let Some(pc) = p.get(&sq) else { continue };
            for to in pseudo_legal_destinations(&p, sq) {
                assert!(
                    p.get(&to).map_or(true, |other| other.color != pc.color),
                    "{sq}{to} captures its own piece at ply {ply}"
                );
            }
        }

        let moves = pos.legal_moves();
        if moves.is_empty() {
            break;
        }
        let _ = rules::game_status(pos.pieces(), pos.side_to_move());
        assert_eq!(&p, pos.pieces(), "rule queries changed the map at ply {ply}");

        let m = moves[(ply * 7 + 3) % moves.len()];
        pos.make_move(m).unwrap();
    }

    assert!(pos.ply() > 0);
    while pos.ply() > 0 {
        pos.unmake_move().unwrap();
    }
    assert_eq!(format!("{} w - - 0 1", fen::INITIAL_FEN), pos.to_fen());
}
