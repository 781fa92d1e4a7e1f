use std::fmt;
use std::str::FromStr;

/// Compass and vertical directions understood as movement commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 10] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::Up,
        Direction::Down,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::NorthEast => "northeast",
            Direction::East => "east",
            Direction::SouthEast => "southeast",
            Direction::South => "south",
            Direction::SouthWest => "southwest",
            Direction::West => "west",
            Direction::NorthWest => "northwest",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            Direction::North => "n",
            Direction::NorthEast => "ne",
            Direction::East => "e",
            Direction::SouthEast => "se",
            Direction::South => "s",
            Direction::SouthWest => "sw",
            Direction::West => "w",
            Direction::NorthWest => "nw",
            Direction::Up => "u",
            Direction::Down => "d",
        }
    }

    /// Grid step taken when digging in this direction.
    pub fn offset(&self) -> (i32, i32, i32) {
        match self {
            Direction::North => (0, 1, 0),
            Direction::NorthEast => (1, 1, 0),
            Direction::East => (1, 0, 0),
            Direction::SouthEast => (1, -1, 0),
            Direction::South => (0, -1, 0),
            Direction::SouthWest => (-1, -1, 0),
            Direction::West => (-1, 0, 0),
            Direction::NorthWest => (-1, 1, 0),
            Direction::Up => (0, 0, 1),
            Direction::Down => (0, 0, -1),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Direction::ALL
            .into_iter()
            .find(|d| d.key() == s || d.alias() == s)
            .ok_or(())
    }
}

/// How an arrival is phrased for exits that aren't compass points.
pub fn arrival_phrase(exit_key: &str) -> String {
    match exit_key.to_lowercase().as_str() {
        "up" => "above".to_string(),
        "down" => "below".to_string(),
        "in" => "inside".to_string(),
        "out" => "outside".to_string(),
        _ => format!("the {}", exit_key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_key_and_alias() {
        assert_eq!("north".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("NE".parse::<Direction>(), Ok(Direction::NorthEast));
        assert_eq!("d".parse::<Direction>(), Ok(Direction::Down));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_offsets_are_symmetric() {
        for dir in Direction::ALL {
            let (x, y, z) = dir.offset();
            let (ox, oy, oz) = dir.opposite().offset();
            assert_eq!((x + ox, y + oy, z + oz), (0, 0, 0), "{}", dir);
        }
    }

    #[test]
    fn test_arrival_phrase() {
        assert_eq!(arrival_phrase("up"), "above");
        assert_eq!(arrival_phrase("out"), "outside");
        assert_eq!(arrival_phrase("south"), "the south");
    }
}
