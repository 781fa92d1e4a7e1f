//! The starter world: a small town zone built when no snapshot exists, and
//! the console player's character.

use gloaming_core::clothing::ClothingType;
use gloaming_core::constants::{CharacterFlags, ItemFlags, DEFAULT_LIQUID_CONTAINER_CAPACITY};
use gloaming_core::liquid::puddle_name;
use gloaming_core::types::{
    Consumable, Container, Effect, Garment, ItemKind, Liquid, LiquidContainer, Location, ObjectId,
    Worn,
};

use crate::repository::Repository;

const TOWN: &str = "town";

fn garment(clothing_type: ClothingType) -> ItemKind {
    ItemKind::Garment(Garment {
        clothing_type,
        worn: Worn::No,
        covered_by: None,
    })
}

fn link(repo: &mut Repository, from: ObjectId, key: &str, to: ObjectId, back: &str) {
    repo.create_exit(key, from, to);
    repo.create_exit(back, to, from);
}

fn place(repo: &mut Repository, room: ObjectId, coords: (i32, i32, i32)) {
    if let Some(record) = repo.room_mut(room) {
        (record.x, record.y, record.z) = coords;
    }
}

/// Builds the starter town and marks its square as the start room.
pub fn seed_world() -> Repository {
    let mut repo = Repository::new();

    let square = repo.create_room("Town Square", TOWN);
    let market = repo.create_room("Market Row", TOWN);
    let alley = repo.create_room("Dark Alley", TOWN);
    let cellar = repo.create_room("Damp Cellar", TOWN);
    place(&mut repo, market, (1, 0, 0));
    place(&mut repo, alley, (0, -1, 0));
    place(&mut repo, cellar, (0, -1, -1));

    if let Some(room) = repo.room_mut(square) {
        room.general_desc = "Cobblestones spread out around an old stone fountain.\
            <morning> Merchants hurry past with their carts.</morning>\
            <afternoon> Children chase each other around the fountain.</afternoon>\
            <evening> Lamplighters make their rounds.</evening>\
            <night> The square is quiet but for the splashing water.</night>"
            .to_string();
        room.winter_desc = "Snow lies on the cobblestones and the fountain is rimmed with ice."
            .to_string();
        room.set_detail("fountain", "Water spills from the mouth of a weathered stone fish.");
        room.symbol = Some("[]".to_string());
    }
    if let Some(room) = repo.room_mut(market) {
        room.general_desc =
            "Stalls line both sides of the row, their awnings faded by the sun.".to_string();
        room.symbol = Some("$$".to_string());
    }
    if let Some(room) = repo.room_mut(alley) {
        room.general_desc =
            "A narrow alley between leaning houses. Something skitters in the refuse."
                .to_string();
        room.set_dark(true);
    }
    if let Some(room) = repo.room_mut(cellar) {
        room.general_desc = "Barrels stand against walls slick with moisture.".to_string();
        room.set_dark(true);
        room.symbol = Some("vv".to_string());
    }

    link(&mut repo, square, "east", market, "west");
    link(&mut repo, square, "south", alley, "north");
    link(&mut repo, alley, "down", cellar, "up");

    let bench = repo.create_item("a wooden bench", ItemKind::Plain, Location::Room(square));
    if let Some(item) = repo.item_mut(bench) {
        item.set_flag(ItemFlags::FURNITURE, true);
        item.mass = 40.0;
    }

    let water = Liquid {
        original_name: "water".to_string(),
        uses: 6,
        effects: vec![Effect::Health(1)],
    };
    let puddle = puddle_name(&water.original_name, water.uses);
    repo.create_item(&puddle, ItemKind::Liquid(water), Location::Room(square));

    let backpack = repo.create_item(
        "a leather backpack",
        ItemKind::Container(Container::default()),
        Location::Room(square),
    );
    if let Some(item) = repo.item_mut(backpack) {
        item.aliases = vec!["pack".to_string()];
    }

    let lantern = repo.create_item("a brass lantern", ItemKind::Plain, Location::Room(market));
    if let Some(item) = repo.item_mut(lantern) {
        item.set_flag(ItemFlags::LIT, true);
        item.description = "A small lantern with a steady flame.".to_string();
    }
    repo.create_item(
        "a tin flask",
        ItemKind::LiquidContainer(LiquidContainer {
            capacity: DEFAULT_LIQUID_CONTAINER_CAPACITY,
        }),
        Location::Room(market),
    );
    repo.create_item(
        "a red apple",
        ItemKind::Consumable(Consumable {
            uses: 1,
            effects: vec![Effect::Health(2)],
        }),
        Location::Room(market),
    );
    repo.create_item("a linen shirt", garment(ClothingType::Shirt), Location::Room(market));
    repo.create_item("a wool cloak", garment(ClothingType::Fullbody), Location::Room(market));
    repo.create_item("wool socks", garment(ClothingType::Socks), Location::Room(market));
    repo.create_item("leather boots", garment(ClothingType::Shoes), Location::Room(market));
    repo.create_item("a silver ring", garment(ClothingType::Jewelry), Location::Room(alley));

    let barrel = repo.create_item("an old barrel", ItemKind::Plain, Location::Room(cellar));
    if let Some(item) = repo.item_mut(barrel) {
        item.set_flag(ItemFlags::NO_GET, true);
    }

    repo.globals_mut().start_room = Some(square);
    log::info!("Seeded the starter world");
    repo
}

/// The console player's character, created in the start room on first use.
/// It always plays with builder rights.
pub fn ensure_player(repo: &mut Repository, name: &str) -> ObjectId {
    let start = repo.globals().start_room;
    let player = match repo.character_named(name) {
        Some(id) => id,
        None => {
            log::info!("Creating player character '{}'", name);
            repo.create_character(name, start)
        }
    };
    if let Some(record) = repo.character_mut(player) {
        record.set_flag(CharacterFlags::PLAYER, true);
        record.set_flag(CharacterFlags::BUILDER, true);
        if record.location.is_none() {
            record.location = start;
        }
    }
    player
}
