use thiserror::Error;

use super::set::SetId;

/// Errors raised while building, maintaining or querying a partition.
///
/// Cards are reported through their `Debug` rendering so the error type
/// stays independent of the card type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquivalenceError {
    /// A legal action has no entry in the card-to-set lookup.
    #[error("Unknown action: {0} is not mapped to any equivalence set")]
    UnknownAction(String),

    /// An equivalence set without members was encountered.
    #[error("Equivalence set {0} has no cards")]
    EmptyEquivalenceSet(SetId),

    /// The standing predicate was asked without enough context to decide.
    #[error("Undefined standing context for {0}")]
    UndefinedStandingContext(String),

    /// Two sets were supplied with the same id.
    #[error("Duplicate equivalence set id {0}")]
    DuplicateSet(SetId),

    /// A card appears in more than one set.
    #[error("Card {card} belongs to both {first} and {second}")]
    DuplicateCard {
        card: String,
        first: SetId,
        second: SetId,
    },

    /// The card-to-set lookup disagrees with the sets' members.
    #[error("Inconsistent lookup for {card}: {reason}")]
    InconsistentLookup { card: String, reason: String },

    /// A link or lookup entry names a set that does not exist.
    #[error("Unknown equivalence set {0}")]
    UnknownSet(SetId),

    /// `prev`/`next` links do not mirror each other.
    #[error("Broken neighbour link from {from} to {to}")]
    BrokenLink { from: SetId, to: SetId },

    /// Two sets cannot be fused.
    #[error("Cannot merge {lower} with {upper}: {reason}")]
    InvalidMerge {
        lower: SetId,
        upper: SetId,
        reason: String,
    },
}

impl EquivalenceError {
    pub(crate) fn unknown_action(card: &impl std::fmt::Debug) -> Self {
        Self::UnknownAction(format!("{card:?}"))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EquivalenceError>;
