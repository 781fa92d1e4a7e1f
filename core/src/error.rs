//! Rule failures. The `Display` text of each variant is exactly what the
//! acting character is told.

use thiserror::Error;

use crate::string_operations::capitalize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("You don't see '{0}' here.")]
    NotFound(String),
    #[error("You aren't carrying {0}.")]
    NotCarrying(String),
    #[error("You can't get {0}.")]
    CantGet(String),
    #[error("You can't drop that because you're wearing it.")]
    WearingItem,

    // clothing
    #[error("You can't wear {0}!")]
    NotClothing(String),
    #[error("You're already wearing {0}!")]
    AlreadyWearing(String),
    #[error("Please keep your wear style message to less than {0} characters.")]
    StyleTooLong(usize),
    #[error("You can't wear any more clothes until you remove something.")]
    TooManyWorn,
    #[error("You can't wear any more clothes of the type '{0}'.")]
    TypeLimit(String),
    #[error("You're not wearing {0}!")]
    NotWearing(String),
    #[error("You have to take off {0} first.")]
    CoveredBy(String),
    #[error("{} is already covered by something else!", capitalize(.0))]
    AlreadyCovered(String),
    #[error("You can't cover anything with {0}!")]
    CantCoverWith(String),
    #[error("You can't use {0} to cover anything because it's covered by something else.")]
    CoveringIsCovered(String),
    #[error("{} isn't covered by anything!", capitalize(.0))]
    NotCovered(String),
    #[error("{} is under too many layers to uncover.", capitalize(.0))]
    TooManyLayers(String),

    // containers
    #[error("{} can't hold anything.", capitalize(.0))]
    NotContainer(String),
    #[error("You can't put something inside itself.")]
    IntoItself,
    #[error("{} won't fit in {}.", capitalize(.item), .container)]
    OverCapacity { item: String, container: String },

    // liquids
    #[error("You can't fill {0}.")]
    NotLiquidContainer(String),
    #[error("You can't fill anything from {0}.")]
    NotLiquid(String),
    #[error("{} is empty.", capitalize(.0))]
    SourceEmpty(String),
    #[error("{} is already full.", capitalize(.0))]
    AlreadyFull(String),
    #[error("You can't mix different liquids.")]
    LiquidMismatch,
    #[error("{} is already empty.", capitalize(.0))]
    AlreadyEmpty(String),
    #[error("You can't consume {0}.")]
    NotConsumable(String),

    // movement
    #[error("You can't go that way.")]
    NoExit,
    #[error("You are not moving!")]
    NotMoving,

    // general
    #[error("You don't have permission to do that.")]
    NoPermission,
    #[error("{0}")]
    Usage(String),
}
