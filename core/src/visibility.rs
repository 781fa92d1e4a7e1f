//! Audience partitioning for darkness-aware messages.

use crate::types::ObjectId;

/// Who receives which rendering of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audience {
    pub lit: Vec<ObjectId>,
    pub dark: Vec<ObjectId>,
}

/// Splits `occupants` (id, has night vision) into lit and dark receivers.
///
/// A room that isn't dark, or that holds any light source, shows everyone the
/// lit rendering. Otherwise only night-vision observers do. Excluded ids never
/// receive anything.
pub fn partition(
    room_dark: bool,
    light_present: bool,
    occupants: &[(ObjectId, bool)],
    exclude: &[ObjectId],
) -> Audience {
    let mut audience = Audience::default();
    for &(id, night_vision) in occupants {
        if exclude.contains(&id) {
            continue;
        }
        if !room_dark || light_present || night_vision {
            audience.lit.push(id);
        } else {
            audience.dark.push(id);
        }
    }
    audience
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ObjectId = ObjectId(1);
    const B: ObjectId = ObjectId(2);
    const C: ObjectId = ObjectId(3);

    #[test]
    fn test_lit_room_everyone_sees() {
        let audience = partition(false, false, &[(A, false), (B, false)], &[]);
        assert_eq!(audience.lit, vec![A, B]);
        assert!(audience.dark.is_empty());
    }

    #[test]
    fn test_dark_room_without_light_redacts_for_normal_vision() {
        let audience = partition(true, false, &[(A, false), (B, true), (C, false)], &[]);
        assert_eq!(audience.lit, vec![B]);
        assert_eq!(audience.dark, vec![A, C]);
    }

    #[test]
    fn test_any_light_lights_the_whole_room() {
        let audience = partition(true, true, &[(A, false), (B, false)], &[]);
        assert_eq!(audience.lit, vec![A, B]);
        assert!(audience.dark.is_empty());
    }

    #[test]
    fn test_excluded_receive_neither_rendering() {
        let audience = partition(true, false, &[(A, false), (B, true), (C, false)], &[A, B]);
        assert_eq!(audience.lit, Vec::<ObjectId>::new());
        assert_eq!(audience.dark, vec![C]);
    }
}
