//! Equivalence sets: ordered classes of interchangeable cards.
//!
//! An `EquivalenceSet` groups cards one player holds that are strategically
//! interchangeable. Members are kept rank-sorted, so the highest and lowest
//! member are constant-time lookups.
//!
//! Sets of the whole partition form a rank-ordered chain through their
//! `prev`/`next` links. The links are plain `SetId`s resolved through the
//! owning [`EquivalenceChecker`](super::EquivalenceChecker); sets never own
//! each other.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Card, PlayerId};

use super::error::{EquivalenceError, Result};

/// Identifier of an equivalence set, stable for the set's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SetId(pub u32);

impl SetId {
    /// Create a new set ID.
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

impl std::fmt::Display for SetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Set({})", self.0)
    }
}

/// One class of strategically equivalent cards.
///
/// ## Invariants
///
/// - `cards` is never empty (construction rejects empty input)
/// - `cards` is sorted ascending and free of duplicates
///
/// ## Example
///
/// ```
/// use rust_eqclass::core::{CardId, PlayerId};
/// use rust_eqclass::equivalence::{EquivalenceSet, SetId};
///
/// let set = EquivalenceSet::new(
///     SetId::new(0),
///     PlayerId::new(1),
///     [CardId(4), CardId(2), CardId(3)],
/// ).unwrap();
///
/// assert_eq!(set.lowest(), &CardId(2));
/// assert_eq!(set.highest(), &CardId(4));
/// assert_eq!(set.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "SetRecord<C>",
    into = "SetRecord<C>",
    bound(serialize = "C: Card + Serialize", deserialize = "C: Card + Deserialize<'de>")
)]
pub struct EquivalenceSet<C> {
    id: SetId,
    owner: PlayerId,
    /// SmallVec keeps typical classes (1-4 cards) off the heap.
    cards: SmallVec<[C; 4]>,
    prev: Option<SetId>,
    next: Option<SetId>,
}

impl<C: Card> EquivalenceSet<C> {
    /// Create a set from its members.
    ///
    /// Members are sorted and deduplicated. Fails with
    /// [`EquivalenceError::EmptyEquivalenceSet`] if `cards` is empty.
    pub fn new(id: SetId, owner: PlayerId, cards: impl IntoIterator<Item = C>) -> Result<Self> {
        let mut cards: SmallVec<[C; 4]> = cards.into_iter().collect();
        if cards.is_empty() {
            return Err(EquivalenceError::EmptyEquivalenceSet(id));
        }
        cards.sort_unstable();
        cards.dedup();

        Ok(Self {
            id,
            owner,
            cards,
            prev: None,
            next: None,
        })
    }

    /// Create a set holding a single card.
    #[must_use]
    pub fn singleton(id: SetId, owner: PlayerId, card: C) -> Self {
        let mut cards = SmallVec::new();
        cards.push(card);
        Self {
            id,
            owner,
            cards,
            prev: None,
            next: None,
        }
    }

    /// Link the rank-adjacent lower neighbour.
    #[must_use]
    pub fn with_prev(mut self, prev: SetId) -> Self {
        self.prev = Some(prev);
        self
    }

    /// Link the rank-adjacent higher neighbour.
    #[must_use]
    pub fn with_next(mut self, next: SetId) -> Self {
        self.next = Some(next);
        self
    }

    #[must_use]
    pub fn id(&self) -> SetId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Members in ascending rank order.
    #[must_use]
    pub fn cards(&self) -> &[C] {
        &self.cards
    }

    /// The lower neighbour in the chain, if any.
    #[must_use]
    pub fn prev(&self) -> Option<SetId> {
        self.prev
    }

    /// The higher neighbour in the chain, if any.
    #[must_use]
    pub fn next(&self) -> Option<SetId> {
        self.next
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Only true for a set emptied in place; never for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.cards.len() == 1
    }

    #[must_use]
    pub fn contains(&self, card: &C) -> bool {
        self.cards.binary_search(card).is_ok()
    }

    /// The highest-ranked member.
    #[must_use]
    pub fn highest(&self) -> &C {
        debug_assert!(!self.cards.is_empty(), "{} has no cards", self.id);
        &self.cards[self.cards.len() - 1]
    }

    /// The lowest-ranked member.
    #[must_use]
    pub fn lowest(&self) -> &C {
        debug_assert!(!self.cards.is_empty(), "{} has no cards", self.id);
        &self.cards[0]
    }

    pub(crate) fn set_prev(&mut self, prev: Option<SetId>) {
        self.prev = prev;
    }

    pub(crate) fn set_next(&mut self, next: Option<SetId>) {
        self.next = next;
    }

    /// Remove a member. Returns whether it was present.
    ///
    /// May leave the set empty; the checker drops such sets immediately.
    pub(crate) fn remove(&mut self, card: &C) -> bool {
        match self.cards.binary_search(card) {
            Ok(index) => {
                self.cards.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Take over all members of `other`.
    pub(crate) fn absorb(&mut self, other: &EquivalenceSet<C>) {
        self.cards.extend(other.cards.iter().cloned());
        self.cards.sort_unstable();
        self.cards.dedup();
    }
}

/// Serialized form of an [`EquivalenceSet`].
///
/// Deserialization goes through [`EquivalenceSet::new`], so stored sets are
/// re-sorted and empty ones rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetRecord<C> {
    pub id: SetId,
    pub owner: PlayerId,
    pub cards: Vec<C>,
    #[serde(default)]
    pub prev: Option<SetId>,
    #[serde(default)]
    pub next: Option<SetId>,
}

impl<C: Card> TryFrom<SetRecord<C>> for EquivalenceSet<C> {
    type Error = EquivalenceError;

    fn try_from(record: SetRecord<C>) -> Result<Self> {
        let mut set = EquivalenceSet::new(record.id, record.owner, record.cards)?;
        set.prev = record.prev;
        set.next = record.next;
        Ok(set)
    }
}

impl<C: Card> From<EquivalenceSet<C>> for SetRecord<C> {
    fn from(set: EquivalenceSet<C>) -> Self {
        Self {
            id: set.id,
            owner: set.owner,
            cards: set.cards.into_vec(),
            prev: set.prev,
            next: set.next,
        }
    }
}
