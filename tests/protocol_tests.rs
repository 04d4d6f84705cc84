//! Wire format checks for session snapshots and request frames.

use rust_checkers::controller::{Request, Response};
use rust_checkers::core::{Color, Coord, Participant, ParticipantId, Piece, RoomCode, Session};
use serde_json::json;

fn dealt_session() -> Session {
    let mut session = Session::new(RoomCode::new("x7k2"));
    let mut human = Participant::human(ParticipantId::new("conn-1"), Color::Dark, "Ann");
    let mut bot = Participant::bot("Q1w2E3r4T5", Color::Light, "Computer");
    human.deal();
    bot.deal();
    session.players = vec![human, bot];
    session.turn_index = 1;
    session.started = true;
    session
}

#[test]
fn test_session_snapshot_shape() {
    let value = serde_json::to_value(dealt_session()).unwrap();

    assert_eq!(value["id"], "x7k2");
    assert_eq!(value["turnIndex"], 1);
    assert_eq!(value["turnCount"], 0);
    assert_eq!(value["started"], true);
    assert!(value.get("ended").is_none());
    assert!(value.get("advancePending").is_none());

    let human = &value["players"][0];
    assert_eq!(human["id"], "conn-1");
    assert_eq!(human["kind"], "human");
    assert_eq!(human["color"], "dark");
    assert_eq!(human["pieces"].as_array().map(Vec::len), Some(12));
    assert_eq!(human["pieces"][0], json!({"x": 7, "y": 7, "color": "dark", "king": false}));

    let bot = &value["players"][1];
    assert_eq!(bot["id"], "bot-Q1w2E3r4T5");
    assert_eq!(bot["kind"], "bot");
}

#[test]
fn test_session_round_trip_preserves_order() {
    let session = dealt_session();
    let text = serde_json::to_string(&session).unwrap();
    let back: Session = serde_json::from_str(&text).unwrap();

    assert_eq!(back, session);
    assert_eq!(back.players[0].color, Color::Dark);
    assert_eq!(back.players[1].pieces[0].pos(), Coord { x: 0, y: 0 });
}

#[test]
fn test_piece_rejects_off_board_position() {
    let bad = json!({"x": 3, "y": 9, "color": "light", "king": false});
    assert!(serde_json::from_value::<Piece>(bad).is_err());

    let implicit_man = json!({"x": 3, "y": 3, "color": "light"});
    let piece: Piece = serde_json::from_value(implicit_man).unwrap();
    assert!(!piece.king);
}

#[test]
fn test_request_frames() {
    let frames = [
        (r#"{"event":"create"}"#, "create"),
        (r#"{"event":"create","data":{}}"#, "create"),
        (r#"{"event":"create","data":null}"#, "create"),
        (r#"{"event":"enter","data":{"id":"x7k2","name":"Ann"}}"#, "enter"),
        (r#"{"event":"start","data":{"id":"x7k2"}}"#, "start"),
        (r#"{"event":"state","data":{"id":"x7k2"}}"#, "state"),
        (r#"{"event":"move","data":{"origin":[2,2],"destination":[3,3]}}"#, "move"),
        (r#"{"event":"leave","data":{"id":"x7k2"}}"#, "leave"),
    ];
    for (frame, name) in frames {
        let request: Request = serde_json::from_str(frame).unwrap();
        assert_eq!(request.name(), name);
    }

    assert!(serde_json::from_str::<Request>(r#"{"event":"resign","data":{}}"#).is_err());
    assert!(serde_json::from_str::<Request>(r#"{"event":"move","data":{"origin":[2,2]}}"#).is_err());
}

#[test]
fn test_join_frame() {
    let participant = Participant::human(ParticipantId::new("conn-2"), Color::Light, "Bob");
    let frame = Response::Join {
        id: RoomCode::new("x7k2"),
        participant,
    };

    assert_eq!(
        serde_json::to_value(&frame).unwrap(),
        json!({
            "event": "join",
            "data": {
                "id": "x7k2",
                "participant": {"id": "conn-2", "name": "Bob", "color": "light", "kind": "human", "pieces": []}
            }
        })
    );
}
