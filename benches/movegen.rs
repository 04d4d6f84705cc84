use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_checkers::core::{Color, Coord, Participant, ParticipantId, Piece, RoomCode, Session};
use rust_checkers::rules::all_legal_moves;

fn opening() -> Session {
    let mut session = Session::new(RoomCode::new("bench"));
    let mut light = Participant::human(ParticipantId::new("l"), Color::Light, "Ann");
    let mut dark = Participant::human(ParticipantId::new("d"), Color::Dark, "Bob");
    light.deal();
    dark.deal();
    session.players = vec![light, dark];
    session.started = true;
    session
}

fn midgame() -> Session {
    let mut session = opening();
    let light = [(0, 0), (2, 2), (3, 3), (4, 2), (6, 2), (1, 5)];
    let dark = [(4, 4), (2, 4), (6, 4), (5, 5), (3, 7), (7, 7)];
    session.players[0].pieces = light
        .iter()
        .map(|&(x, y)| Piece::at(Coord { x, y }, Color::Light))
        .collect();
    session.players[1].pieces = dark
        .iter()
        .map(|&(x, y)| Piece::at(Coord { x, y }, Color::Dark))
        .collect();
    session.players[1].pieces[4].king = true;
    session
}

fn bench_movegen(c: &mut Criterion) {
    let opening = opening();
    let midgame = midgame();

    c.bench_function("all_legal_moves opening", |b| {
        b.iter(|| all_legal_moves(black_box(&opening), black_box(&opening.players[0])))
    });

    c.bench_function("all_legal_moves midgame", |b| {
        b.iter(|| all_legal_moves(black_box(&midgame), black_box(&midgame.players[0])))
    });
}

criterion_group!(benches, bench_movegen);
criterion_main!(benches);
