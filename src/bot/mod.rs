//! Greedy bot.
//!
//! One ply, no lookahead: take the move that captures the most pieces,
//! preferring the first one found on ties. With no capture on offer, any
//! legal move is picked uniformly at random.

use crate::core::{GameRng, Participant, Session};
use crate::rules::{all_legal_moves, Move};

/// Pick a move for `participant`, or `None` if it has no legal move.
pub fn choose_move(session: &Session, participant: &Participant, rng: &mut GameRng) -> Option<Move> {
    let moves = all_legal_moves(session, participant);

    let mut best: Option<&Move> = None;
    for candidate in &moves {
        if best.map_or(true, |b| candidate.capture_count() > b.capture_count()) {
            best = Some(candidate);
        }
    }

    match best {
        Some(m) if m.is_capture() => Some(m.clone()),
        _ => rng.choose(&moves).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, Coord, Piece, RoomCode};

    fn c(x: u8, y: u8) -> Coord {
        Coord { x, y }
    }

    fn session_with(bot_pieces: Vec<Piece>, human_pieces: Vec<Piece>) -> Session {
        let mut session = Session::new(RoomCode::new("bot"));
        let mut human = Participant::human("h".into(), Color::Light, "Ann");
        human.pieces = human_pieces;
        let mut bot = Participant::bot("b", Color::Dark, "Computer");
        bot.pieces = bot_pieces;
        session.players = vec![human, bot];
        session.started = true;
        session
    }

    #[test]
    fn test_prefers_most_captures() {
        // Piece at (7,7) can double-jump; piece at (1,5) can single-jump.
        let session = session_with(
            vec![Piece::at(c(1, 5), Color::Dark), Piece::at(c(7, 7), Color::Dark)],
            vec![
                Piece::at(c(2, 4), Color::Light),
                Piece::at(c(6, 6), Color::Light),
                Piece::at(c(4, 4), Color::Light),
            ],
        );
        let bot = session.players[1].clone();
        let mut rng = GameRng::new(1);

        let chosen = choose_move(&session, &bot, &mut rng).unwrap();
        assert_eq!(chosen.origin(), c(7, 7));
        assert_eq!(chosen.capture_count(), 2);
        assert_eq!(chosen.destination(), c(3, 3));
    }

    #[test]
    fn test_tie_takes_first_found() {
        let session = session_with(
            vec![Piece::at(c(1, 5), Color::Dark), Piece::at(c(5, 5), Color::Dark)],
            vec![Piece::at(c(2, 4), Color::Light), Piece::at(c(6, 4), Color::Light)],
        );
        let bot = session.players[1].clone();
        for seed in 0..5 {
            let mut rng = GameRng::new(seed);
            let chosen = choose_move(&session, &bot, &mut rng).unwrap();
            assert_eq!(chosen.origin(), c(1, 5));
            assert_eq!(chosen.capture_count(), 1);
        }
    }

    #[test]
    fn test_random_when_no_capture() {
        let mut session = Session::new(RoomCode::new("bot"));
        let mut human = Participant::human("h".into(), Color::Light, "Ann");
        let mut bot = Participant::bot("b", Color::Dark, "Computer");
        human.deal();
        bot.deal();
        session.players = vec![human, bot];
        let bot = session.players[1].clone();

        let legal = all_legal_moves(&session, &bot);
        assert_eq!(legal.len(), 7);

        let mut rng = GameRng::new(3);
        for _ in 0..20 {
            let chosen = choose_move(&session, &bot, &mut rng).unwrap();
            assert!(legal.contains(&chosen));
        }
    }

    #[test]
    fn test_no_moves() {
        let session = session_with(
            vec![Piece::at(c(0, 0), Color::Dark)],
            vec![Piece::at(c(7, 7), Color::Light)],
        );
        let bot = session.players[1].clone();
        let mut rng = GameRng::new(1);
        assert!(choose_move(&session, &bot, &mut rng).is_none());
    }
}
