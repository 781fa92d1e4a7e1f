//! Mini map of the rooms around a location, drawn on the location's floor of
//! its zone.

use std::collections::HashMap;

use gloaming_core::constants::{
    DEFAULT_ROOM_SYMBOL, EMPTY_MAP_SYMBOL, MINIMAP_HEIGHT, MINIMAP_WIDTH, PLAYER_MAP_SYMBOL,
};
use gloaming_core::types::ObjectId;

use crate::repository::Repository;

/// Draws the map around `room`, one string per row, north at the top.
///
/// # Arguments
/// * `width` / `height` - reach in each direction, counting the centre; a
///   reach of 3 draws a 5x5 grid.
pub fn draw_mini_map(repository: &Repository, room: ObjectId, width: i32, height: i32) -> Vec<String> {
    let Some(centre) = repository.room(room) else {
        return Vec::new();
    };
    let (cx, cy, cz) = centre.coords();

    let symbols: HashMap<(i32, i32), &str> = repository
        .rooms_in_zone(&centre.zone)
        .into_iter()
        .filter_map(|id| repository.room(id))
        .filter(|r| r.z == cz)
        .map(|r| {
            (
                (r.x, r.y),
                r.symbol.as_deref().unwrap_or(DEFAULT_ROOM_SYMBOL),
            )
        })
        .collect();

    let mut rows = Vec::new();
    for y in ((cy - (height - 1))..(cy + height)).rev() {
        let mut row = String::new();
        for x in (cx - (width - 1))..(cx + width) {
            if (x, y) == (cx, cy) {
                row.push_str(PLAYER_MAP_SYMBOL);
            } else {
                row.push_str(symbols.get(&(x, y)).copied().unwrap_or(EMPTY_MAP_SYMBOL));
            }
        }
        rows.push(row);
    }
    rows
}

pub fn draw_default_mini_map(repository: &Repository, room: ObjectId) -> Vec<String> {
    draw_mini_map(repository, room, MINIMAP_WIDTH, MINIMAP_HEIGHT)
}

/// Lays the map to the left of the description lines.
pub fn unpack_description(mini_map: &[String], room_desc: &[String]) -> String {
    let map_width = mini_map.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let length = mini_map.len().max(room_desc.len());
    let mut lines = Vec::with_capacity(length);

    for line in 0..length {
        let mut out = String::new();
        match mini_map.get(line) {
            Some(map_line) => out.push_str(map_line),
            None if map_width > 0 => out.push_str(&" ".repeat(map_width)),
            None => {}
        }
        if let Some(desc_line) = room_desc.get(line) {
            if map_width > 0 {
                out.push_str("  ");
            }
            out.push_str(desc_line);
        }
        lines.push(out.trim_end().to_string());
    }
    lines.join("\n")
}
