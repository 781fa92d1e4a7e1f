//! Integration tests: drive the command layer against the starter world and
//! tick the scheduler the way the game loop does.

use gloaming_core::types::{Location, ObjectId};
use gloaming_server::populate::{ensure_player, seed_world};
use gloaming_server::state::State;

const TICKS_PER_SECOND: u32 = 10;
/// One traversal at the default walking speed.
const WALK: u64 = 40;

struct World {
    state: State,
    player: ObjectId,
    lurker: ObjectId,
    square: ObjectId,
    alley: ObjectId,
}

fn world() -> World {
    let mut repo = seed_world();
    let player = ensure_player(&mut repo, "Wanderer");
    let square = repo.globals().start_room.expect("start room");
    let alley = repo
        .room_at("town", (0, -1, 0))
        .expect("alley south of the square");
    let lurker = repo.create_character("Bran", Some(alley));
    World {
        state: State::new(repo, TICKS_PER_SECOND, 1.0),
        player,
        lurker,
        square,
        alley,
    }
}

fn location(w: &World, id: ObjectId) -> Option<ObjectId> {
    w.state.repository.character(id).and_then(|c| c.location)
}

// ── Movement queue ──────────────────────────────────────────────────

#[test]
fn queued_direction_runs_after_arrival() {
    let mut w = world();
    w.state.execute_command(w.player, "south");
    w.state.execute_command(w.player, "north");

    let said = w.state.network.drain_for(w.player);
    assert_eq!(
        said,
        vec![
            "You start moving south. It will take 4 seconds.",
            "You will go north when you arrive.",
        ]
    );

    w.state.advance(WALK);
    assert_eq!(location(&w, w.player), Some(w.alley));
    assert!(w.state.is_moving(w.player), "queued north should start at once");

    w.state.advance(WALK);
    assert_eq!(location(&w, w.player), Some(w.square));
    assert!(!w.state.is_moving(w.player));
}

#[test]
fn only_the_latest_queued_direction_is_kept() {
    let mut w = world();
    w.state.execute_command(w.player, "east");
    w.state.execute_command(w.player, "south");
    w.state.execute_command(w.player, "west");

    w.state.advance(WALK * 2);
    assert_eq!(location(&w, w.player), Some(w.square));
}

#[test]
fn stop_cancels_the_walk_and_the_queue() {
    let mut w = world();
    w.state.execute_command(w.player, "s");
    w.state.execute_command(w.player, "n");
    w.state.advance(WALK / 2);
    w.state.execute_command(w.player, "stop");

    w.state.advance(WALK * 3);
    assert_eq!(location(&w, w.player), Some(w.square));
    assert_eq!(
        w.state.network.drain_for(w.player).last().map(String::as_str),
        Some("You stop moving.")
    );
}

#[test]
fn queued_direction_without_exit_fails_on_arrival() {
    let mut w = world();
    w.state.execute_command(w.player, "south");
    w.state.execute_command(w.player, "east");
    w.state.advance(WALK);
    w.state.network.drain_for(w.player);
    w.state.advance(1);

    assert_eq!(location(&w, w.player), Some(w.alley));
    assert!(!w.state.is_moving(w.player));
}

// ── Darkness ────────────────────────────────────────────────────────

#[test]
fn arrival_in_the_dark_is_anonymous() {
    let mut w = world();
    w.state.execute_command(w.player, "south");
    w.state.advance(WALK);

    assert_eq!(
        w.state.network.drain_for(w.lurker),
        vec!["Someone arrives from the north."]
    );
    let seen = w.state.network.drain_for(w.player);
    assert!(seen
        .iter()
        .any(|m| m.contains("It is pitch black here. You can't make anything out.")));
}

#[test]
fn a_carried_lantern_lights_the_alley() {
    let mut w = world();
    let market = w.state.repository.room_at("town", (1, 0, 0)).expect("market");
    let lantern = w
        .state
        .repository
        .find_item("lantern", &[Location::Room(market)])
        .expect("lantern in the market");
    w.state.move_item(lantern, Location::Carried(w.player));

    w.state.execute_command(w.player, "south");
    w.state.advance(WALK);
    assert_eq!(
        w.state.network.drain_for(w.lurker),
        vec!["Wanderer arrives from the north."]
    );

    w.state.execute_command(w.player, "get ring");
    assert_eq!(
        w.state.network.drain_for(w.lurker),
        vec!["Wanderer picks up a silver ring."]
    );
}

// ── Command round trip ──────────────────────────────────────────────

#[test]
fn fill_and_drink_from_the_square_puddle() {
    let mut w = world();
    w.state.repository.character_mut(w.player).expect("player").health = 5;
    let market = w.state.repository.room_at("town", (1, 0, 0)).expect("market");
    let flask = w
        .state
        .repository
        .find_item("flask", &[Location::Room(market)])
        .expect("flask in the market");
    w.state.move_item(flask, Location::Carried(w.player));

    w.state.execute_command(w.player, "fill flask from puddle");
    w.state.execute_command(w.player, "drink flask");

    let said = w.state.network.drain_for(w.player);
    assert_eq!(said[0], "You fill a tin flask with water from medium puddle of water.");
    assert!(said.contains(&"Current health: 6 / 10".to_string()));
}
