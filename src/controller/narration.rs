//! Narrated messages broadcast to a room. Markdown bold marks names and
//! squares.

use crate::core::{Coord, Participant};
use crate::rules::Move;

pub const GAME_STARTED: &str = "Game started.";
pub const TIE: &str = "Neither player can move. Tie!";
pub const OPPONENT_LEFT_WIN: &str = "Opponent left. You win!";
pub const OPPONENT_LEFT: &str = "Opponent left.";

/// Join items as "a", "a and b" or "a, b, and c".
#[must_use]
pub fn listify(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

fn bold_square(c: Coord) -> String {
    format!("**{}**", c.label())
}

fn squares(coords: &[Coord]) -> String {
    listify(&coords.iter().copied().map(bold_square).collect::<Vec<_>>())
}

#[must_use]
pub fn first_turn(first: &Participant) -> String {
    format!("{GAME_STARTED} **{}** ({}) goes first.", first.name, first.color)
}

#[must_use]
pub fn moved(mover: &Participant, m: &Move) -> String {
    let mut text = format!(
        "**{}** ({}) moved from {} to {}",
        mover.name,
        mover.color,
        bold_square(m.origin()),
        squares(&m.path[1..])
    );
    if m.is_capture() {
        text.push_str(", capturing ");
        text.push_str(&squares(&m.captures));
    }
    text.push('.');
    text
}

#[must_use]
pub fn out_of_pieces(loser: &Participant, winner: &Participant) -> String {
    format!("{} has no more pieces. **{}** wins!", loser.name, winner.name)
}

#[must_use]
pub fn cannot_move(stuck: &Participant) -> String {
    format!("**{}** cannot move.", stuck.name)
}

#[must_use]
pub fn stalemate_win(loser: &Participant, winner: &Participant) -> String {
    format!("{} cannot move. **{}** wins!", loser.name, winner.name)
}
