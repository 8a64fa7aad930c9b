//! Card identification.
//!
//! The abstraction layer never looks inside a card. All it needs is a total
//! order by rank (to find the highest and lowest member of a class) and a
//! hash (for the card-to-class lookup). Any type with those properties is a
//! [`Card`].
//!
//! ## Usage
//!
//! ```
//! use rust_eqclass::core::CardId;
//!
//! // Engines allocate ids in rank order.
//! let seven = CardId::new(7);
//! let eight = CardId::new(8);
//!
//! assert!(seven < eight);
//! assert_eq!(eight.raw(), 8);
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Anything usable as a card by the equivalence layer.
///
/// Blanket-implemented: engines don't implement this by hand. The `Ord`
/// implementation must order cards by rank within a class.
pub trait Card: Clone + Ord + Hash + Debug {}

impl<T> Card for T where T: Clone + Ord + Hash + Debug {}

/// Opaque, rank-ordered card identifier.
///
/// The game engine allocates ids so that a higher id means a higher rank
/// wherever two cards can be compared. Suits, trumps and similar rules stay
/// on the engine side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}
