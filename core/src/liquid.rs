//! Liquid naming and fill arithmetic.

use crate::constants::PUDDLE_SIZES;
use crate::error::RuleError;
use crate::types::Liquid;

/// Size word for a freestanding liquid of `uses` volume: the breakpoint
/// closest to `uses`, preferring the smaller one on a tie.
pub fn size_prefix(uses: u32) -> &'static str {
    PUDDLE_SIZES
        .iter()
        .min_by_key(|(breakpoint, _)| breakpoint.abs_diff(uses))
        .map(|(_, prefix)| *prefix)
        .unwrap_or("tiny")
}

pub fn puddle_name(original_name: &str, uses: u32) -> String {
    format!("{} puddle of {}", size_prefix(uses), original_name)
}

/// Volume still free in a liquid container of `capacity` holding `held`.
pub fn return_capacity(capacity: u32, held: Option<&Liquid>) -> u32 {
    capacity.saturating_sub(held.map_or(0, |l| l.uses))
}

/// What a fill does once it has been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPlan {
    /// Add this many units to the liquid already in the container.
    TopUp(u32),
    /// The container is empty and the source is larger than the free space:
    /// split this many units off into a new stack.
    Split(u32),
    /// The container is empty and the whole source fits.
    MoveWhole,
}

/// Validates filling `container_name` (volume `capacity`, currently holding
/// `held`) from `source`, and decides how the transfer happens.
pub fn plan_fill(
    container_name: &str,
    capacity: u32,
    held: Option<&Liquid>,
    source: &Liquid,
) -> Result<FillPlan, RuleError> {
    let free = return_capacity(capacity, held);
    if free == 0 {
        return Err(RuleError::AlreadyFull(container_name.to_string()));
    }
    match held {
        Some(current) if current.original_name != source.original_name => {
            Err(RuleError::LiquidMismatch)
        }
        Some(_) => Ok(FillPlan::TopUp(free.min(source.uses))),
        None if source.uses > free => Ok(FillPlan::Split(free)),
        None => Ok(FillPlan::MoveWhole),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liquid(name: &str, uses: u32) -> Liquid {
        Liquid {
            original_name: name.to_string(),
            uses,
            effects: Vec::new(),
        }
    }

    #[test]
    fn test_size_prefix_breakpoints() {
        assert_eq!(size_prefix(1), "tiny");
        assert_eq!(size_prefix(3), "small");
        assert_eq!(size_prefix(6), "medium");
        assert_eq!(size_prefix(12), "large");
        assert_eq!(size_prefix(22), "huge");
        assert_eq!(size_prefix(40), "massive");
    }

    #[test]
    fn test_size_prefix_between_breakpoints_uses_nearest() {
        assert_eq!(size_prefix(8), "medium");
        assert_eq!(size_prefix(10), "large");
        assert_eq!(size_prefix(0), "tiny");
        assert_eq!(size_prefix(500), "massive");
        // equidistant from 1 and 3
        assert_eq!(size_prefix(2), "tiny");
    }

    #[test]
    fn test_puddle_name() {
        assert_eq!(puddle_name("water", 6), "medium puddle of water");
    }

    #[test]
    fn test_plan_fill_top_up_is_bounded_by_free_space_and_source() {
        let held = liquid("water", 7);
        assert_eq!(
            plan_fill("a flask", 10, Some(&held), &liquid("water", 5)),
            Ok(FillPlan::TopUp(3))
        );
        assert_eq!(
            plan_fill("a flask", 10, Some(&held), &liquid("water", 2)),
            Ok(FillPlan::TopUp(2))
        );
    }

    #[test]
    fn test_plan_fill_empty_container() {
        assert_eq!(
            plan_fill("a flask", 10, None, &liquid("water", 25)),
            Ok(FillPlan::Split(10))
        );
        assert_eq!(
            plan_fill("a flask", 10, None, &liquid("water", 10)),
            Ok(FillPlan::MoveWhole)
        );
    }

    #[test]
    fn test_plan_fill_rejections() {
        let full = liquid("water", 10);
        assert_eq!(
            plan_fill("a flask", 10, Some(&full), &liquid("water", 1)),
            Err(RuleError::AlreadyFull("a flask".to_string()))
        );
        let wine = liquid("wine", 2);
        assert_eq!(
            plan_fill("a flask", 10, Some(&wine), &liquid("water", 1)),
            Err(RuleError::LiquidMismatch)
        );
    }
}
