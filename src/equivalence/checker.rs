//! The equivalence checker: partition index and action reduction.
//!
//! `EquivalenceChecker` owns every active [`EquivalenceSet`] of a decision
//! point together with a card-to-set lookup. Its main job is
//! [`reduce_legal_actions`](EquivalenceChecker::reduce_legal_actions): map a
//! list of legal cards down to one representative per class, so the search
//! branches once per class instead of once per card.
//!
//! ## Sharing
//!
//! Reduction only reads the partition, so one checker can serve many
//! threads. Both indices are `im` persistent maps: a search branch that
//! needs to play a card out of the partition clones the checker in O(1)
//! and calls [`remove_card`](EquivalenceChecker::remove_card) on its copy.
//!
//! ## Example
//!
//! ```
//! use rust_eqclass::core::{CardId, PlayerId};
//! use rust_eqclass::equivalence::{EquivalenceChecker, EquivalenceSet, SetId};
//!
//! let p0 = PlayerId::new(0);
//! let checker = EquivalenceChecker::from_sets([
//!     EquivalenceSet::new(SetId(0), p0, [CardId(2), CardId(3), CardId(4)]).unwrap(),
//!     EquivalenceSet::singleton(SetId(1), p0, CardId(5)),
//!     EquivalenceSet::new(SetId(2), p0, [CardId(7), CardId(8)]).unwrap(),
//! ]).unwrap();
//!
//! let legal = [CardId(2), CardId(3), CardId(5), CardId(7)];
//!
//! // Standing: every class is represented by its highest card.
//! let reduced = checker.reduce_legal_actions(&legal, &true).unwrap();
//! assert_eq!(reduced, vec![CardId(4), CardId(5), CardId(8)]);
//!
//! // Not standing: lowest card.
//! let reduced = checker.reduce_legal_actions(&legal, &false).unwrap();
//! assert_eq!(reduced, vec![CardId(2), CardId(5), CardId(7)]);
//! ```

use im::{HashMap as ImHashMap, OrdMap};
use rustc_hash::FxHashSet;

use crate::core::{Card, CardAction, CardId, PlayerId};

use super::config::CheckerConfig;
use super::error::{EquivalenceError, Result};
use super::set::{EquivalenceSet, SetId};
use super::standing::{ChainStanding, PlayContext, Standing};

/// What happened to the partition when a card was removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// The card's set still has members.
    Shrunk(SetId),
    /// The set became empty and was unlinked from the chain.
    Dropped(SetId),
    /// The set became empty and its same-owner neighbours were fused.
    Merged {
        dropped: SetId,
        kept: SetId,
        absorbed: SetId,
    },
}

/// Partition of cards into equivalence sets, plus the card lookup.
#[derive(Clone, Debug)]
pub struct EquivalenceChecker<C: Card = CardId> {
    /// All active sets, iterated in ascending id order.
    sets: OrdMap<SetId, EquivalenceSet<C>>,

    /// Card -> owning set. Mirrors `sets` exactly.
    cards_to_set: ImHashMap<C, SetId>,

    config: CheckerConfig,
}

impl<C: Card> EquivalenceChecker<C> {
    /// Build a checker from sets and an externally supplied lookup.
    ///
    /// The lookup must mirror the sets exactly: every member maps to its
    /// set and every entry names a set containing the card.
    pub fn new(
        sets: impl IntoIterator<Item = EquivalenceSet<C>>,
        cards_to_set: impl IntoIterator<Item = (C, SetId)>,
    ) -> Result<Self> {
        Self::new_with_config(sets, cards_to_set, CheckerConfig::default())
    }

    /// Like [`new`](Self::new), with a custom configuration.
    pub fn new_with_config(
        sets: impl IntoIterator<Item = EquivalenceSet<C>>,
        cards_to_set: impl IntoIterator<Item = (C, SetId)>,
        config: CheckerConfig,
    ) -> Result<Self> {
        let sets = index_sets(sets)?;

        let mut lookup = ImHashMap::new();
        for (card, id) in cards_to_set {
            match lookup.insert(card.clone(), id) {
                Some(previous) if previous != id => {
                    return Err(EquivalenceError::InconsistentLookup {
                        card: format!("{card:?}"),
                        reason: format!("mapped to both {previous} and {id}"),
                    });
                }
                _ => {}
            }
        }

        let checker = Self {
            sets,
            cards_to_set: lookup,
            config,
        };
        checker.validate()?;
        Ok(checker)
    }

    /// Build a checker from sets alone, deriving the lookup.
    pub fn from_sets(sets: impl IntoIterator<Item = EquivalenceSet<C>>) -> Result<Self> {
        Self::from_sets_with_config(sets, CheckerConfig::default())
    }

    /// Like [`from_sets`](Self::from_sets), with a custom configuration.
    pub fn from_sets_with_config(
        sets: impl IntoIterator<Item = EquivalenceSet<C>>,
        config: CheckerConfig,
    ) -> Result<Self> {
        let sets = index_sets(sets)?;

        let mut lookup = ImHashMap::new();
        for set in sets.values() {
            for card in set.cards() {
                if let Some(first) = lookup.insert(card.clone(), set.id()) {
                    return Err(EquivalenceError::DuplicateCard {
                        card: format!("{card:?}"),
                        first,
                        second: set.id(),
                    });
                }
            }
        }

        let checker = Self {
            sets,
            cards_to_set: lookup,
            config,
        };
        checker.validate()?;
        Ok(checker)
    }

    #[must_use]
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    // === Queries ===

    /// Get a set by id.
    #[must_use]
    pub fn get(&self, id: SetId) -> Option<&EquivalenceSet<C>> {
        self.sets.get(&id)
    }

    /// The set a card belongs to.
    ///
    /// Fails with [`EquivalenceError::UnknownAction`] for unmapped cards.
    pub fn set_of(&self, card: &C) -> Result<&EquivalenceSet<C>> {
        let id = self
            .cards_to_set
            .get(card)
            .ok_or_else(|| EquivalenceError::unknown_action(card))?;
        self.sets.get(id).ok_or(EquivalenceError::UnknownSet(*id))
    }

    /// Id of the set a card belongs to, if mapped.
    #[must_use]
    pub fn set_id_of(&self, card: &C) -> Option<SetId> {
        self.cards_to_set.get(card).copied()
    }

    #[must_use]
    pub fn contains_card(&self, card: &C) -> bool {
        self.cards_to_set.contains_key(card)
    }

    /// Number of sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of cards across all sets.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards_to_set.len()
    }

    /// Iterate over all sets in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EquivalenceSet<C>> {
        self.sets.values()
    }

    /// Iterate over the sets held by one player.
    pub fn owned_by(&self, owner: PlayerId) -> impl Iterator<Item = &EquivalenceSet<C>> {
        self.sets.values().filter(move |set| set.owner() == owner)
    }

    /// Iterate over the card lookup.
    pub fn lookup(&self) -> impl Iterator<Item = (&C, SetId)> {
        self.cards_to_set.iter().map(|(card, id)| (card, *id))
    }

    /// The lower neighbour of a set.
    #[must_use]
    pub fn prev_set(&self, id: SetId) -> Option<&EquivalenceSet<C>> {
        self.get(id)?.prev().and_then(|prev| self.get(prev))
    }

    /// The higher neighbour of a set.
    #[must_use]
    pub fn next_set(&self, id: SetId) -> Option<&EquivalenceSet<C>> {
        self.get(id)?.next().and_then(|next| self.get(next))
    }

    /// The card representing a set under `standing`.
    pub fn representative<S>(&self, id: SetId, standing: &S) -> Result<C>
    where
        S: Standing<C> + ?Sized,
    {
        let set = self.get(id).ok_or(EquivalenceError::UnknownSet(id))?;
        pick(set, standing)
    }

    /// Resolve a play context against this partition.
    ///
    /// ```
    /// use rust_eqclass::core::{CardId, PlayerId};
    /// use rust_eqclass::equivalence::{EquivalenceChecker, EquivalenceSet, PlayContext, SetId};
    ///
    /// // North {0,1} below East {2,3}: North leads low, East leads high.
    /// let checker = EquivalenceChecker::from_sets([
    ///     EquivalenceSet::new(SetId(0), PlayerId(0), [CardId(0), CardId(1)])
    ///         .unwrap()
    ///         .with_next(SetId(1)),
    ///     EquivalenceSet::new(SetId(1), PlayerId(1), [CardId(2), CardId(3)])
    ///         .unwrap()
    ///         .with_prev(SetId(0)),
    /// ]).unwrap();
    ///
    /// let opening = checker.in_context(PlayContext::Opening);
    /// assert_eq!(checker.reduce_legal_actions(&[CardId(1)], &opening), Ok(vec![CardId(0)]));
    /// assert_eq!(checker.reduce_legal_actions(&[CardId(2)], &opening), Ok(vec![CardId(3)]));
    /// ```
    #[must_use]
    pub fn in_context(&self, context: PlayContext<C>) -> ChainStanding<'_, C> {
        ChainStanding {
            checker: self,
            context,
        }
    }

    // === Reduction ===

    /// Collapse legal actions to one representative per equivalence class.
    ///
    /// Output holds one card per distinct class touched by `legal_actions`,
    /// in first-occurrence order. Singleton classes emit their only card;
    /// larger classes ask `standing` about their lowest card and emit the
    /// highest (standing) or lowest (not standing) member.
    ///
    /// Fails without partial output if an action has no mapped set
    /// ([`EquivalenceError::UnknownAction`]) or `standing` fails.
    pub fn reduce_legal_actions<S>(&self, legal_actions: &[C], standing: &S) -> Result<Vec<C>>
    where
        S: Standing<C> + ?Sized,
    {
        let mut emitted: FxHashSet<SetId> = FxHashSet::default();
        let mut reduced = Vec::with_capacity(legal_actions.len().min(self.sets.len()));

        for action in legal_actions {
            let set = self.set_of(action)?;
            if !emitted.insert(set.id()) {
                log::trace!("{action:?} skipped, {} already represented", set.id());
                continue;
            }
            reduced.push(pick(set, standing)?);
        }

        log::debug!(
            "reduced {} legal actions to {} representatives",
            legal_actions.len(),
            reduced.len()
        );
        Ok(reduced)
    }

    /// Reduce a mixed action list.
    ///
    /// Actions that play no card are kept in place. Card plays are reduced
    /// as in [`reduce_legal_actions`](Self::reduce_legal_actions); the
    /// emitted action is the first play of each class, rewritten to carry
    /// the representative card.
    pub fn reduce_actions<A, S>(&self, actions: &[A], standing: &S) -> Result<Vec<A>>
    where
        A: CardAction<C>,
        S: Standing<C> + ?Sized,
    {
        let mut emitted: FxHashSet<SetId> = FxHashSet::default();
        let mut reduced = Vec::with_capacity(actions.len());

        for action in actions {
            let Some(card) = action.played_card() else {
                reduced.push(action.clone());
                continue;
            };

            let set = self.set_of(card)?;
            if !emitted.insert(set.id()) {
                continue;
            }
            let representative = pick(set, standing)?;
            if &representative == card {
                reduced.push(action.clone());
            } else {
                reduced.push(action.with_card(representative));
            }
        }

        log::debug!("reduced {} actions to {}", actions.len(), reduced.len());
        Ok(reduced)
    }

    // === Maintenance ===

    /// Take a played card out of the partition.
    ///
    /// An emptied set is unlinked and its neighbours are joined to each
    /// other. With `merge_adjacent`, neighbours of the same owner are then
    /// fused into one set.
    pub fn remove_card(&mut self, card: &C) -> Result<Removal> {
        let id = *self
            .cards_to_set
            .get(card)
            .ok_or_else(|| EquivalenceError::unknown_action(card))?;
        let set = self
            .sets
            .get_mut(&id)
            .ok_or(EquivalenceError::UnknownSet(id))?;

        if !set.remove(card) {
            return Err(EquivalenceError::InconsistentLookup {
                card: format!("{card:?}"),
                reason: format!("not a member of {id}"),
            });
        }
        self.cards_to_set.remove(card);

        if !set.is_empty() {
            log::debug!("removed {card:?} from {id}");
            return Ok(Removal::Shrunk(id));
        }

        let (prev, next) = (set.prev(), set.next());
        self.sets.remove(&id);
        if let Some(prev) = prev.and_then(|p| self.sets.get_mut(&p)) {
            prev.set_next(next);
        }
        if let Some(next) = next.and_then(|n| self.sets.get_mut(&n)) {
            next.set_prev(prev);
        }
        log::debug!("removed {card:?}, dropping empty {id}");

        if let (true, Some(lower), Some(upper)) = (self.config.merge_adjacent, prev, next) {
            let same_owner = match (self.get(lower), self.get(upper)) {
                (Some(l), Some(u)) => l.owner() == u.owner(),
                _ => false,
            };
            if same_owner {
                self.merge_sets(lower, upper)?;
                return Ok(Removal::Merged {
                    dropped: id,
                    kept: lower,
                    absorbed: upper,
                });
            }
        }

        Ok(Removal::Dropped(id))
    }

    /// Fuse `upper` into its lower neighbour `lower`.
    ///
    /// Both sets must exist, be linked to each other and share an owner.
    /// Returns the id of the surviving set (`lower`).
    pub fn merge_sets(&mut self, lower: SetId, upper: SetId) -> Result<SetId> {
        let low = self.get(lower).ok_or(EquivalenceError::UnknownSet(lower))?;
        let high = self
            .get(upper)
            .ok_or(EquivalenceError::UnknownSet(upper))?
            .clone();

        let invalid = |reason: &str| EquivalenceError::InvalidMerge {
            lower,
            upper,
            reason: reason.to_string(),
        };
        if low.next() != Some(upper) || high.prev() != Some(lower) {
            return Err(invalid("sets are not adjacent"));
        }
        if low.owner() != high.owner() {
            return Err(invalid("sets have different owners"));
        }

        let beyond = high.next();
        if let Some(low) = self.sets.get_mut(&lower) {
            low.absorb(&high);
            low.set_next(beyond);
        }
        if let Some(after) = beyond.and_then(|b| self.sets.get_mut(&b)) {
            after.set_prev(Some(lower));
        }
        for card in high.cards() {
            self.cards_to_set.insert(card.clone(), lower);
        }
        self.sets.remove(&upper);

        log::debug!("merged {upper} into {lower}");
        Ok(lower)
    }

    // === Validation ===

    /// Check every partition invariant.
    ///
    /// - no set is empty
    /// - the lookup and the sets' members mirror each other
    /// - with `strict_links`, neighbour links name known sets and agree
    pub fn validate(&self) -> Result<()> {
        for set in self.sets.values() {
            if set.is_empty() {
                return Err(EquivalenceError::EmptyEquivalenceSet(set.id()));
            }
            for card in set.cards() {
                match self.cards_to_set.get(card) {
                    Some(id) if *id == set.id() => {}
                    Some(id) => {
                        let other_has_it = self.get(*id).is_some_and(|other| other.contains(card));
                        return Err(if other_has_it {
                            EquivalenceError::DuplicateCard {
                                card: format!("{card:?}"),
                                first: *id,
                                second: set.id(),
                            }
                        } else {
                            EquivalenceError::InconsistentLookup {
                                card: format!("{card:?}"),
                                reason: format!("member of {} but mapped to {id}", set.id()),
                            }
                        });
                    }
                    None => {
                        return Err(EquivalenceError::InconsistentLookup {
                            card: format!("{card:?}"),
                            reason: format!("member of {} but missing from lookup", set.id()),
                        });
                    }
                }
            }
        }

        for (card, id) in self.cards_to_set.iter() {
            let set = self.get(*id).ok_or(EquivalenceError::UnknownSet(*id))?;
            if !set.contains(card) {
                return Err(EquivalenceError::InconsistentLookup {
                    card: format!("{card:?}"),
                    reason: format!("mapped to {id} but not a member"),
                });
            }
        }

        if self.config.strict_links {
            self.validate_links()?;
        }
        Ok(())
    }

    fn validate_links(&self) -> Result<()> {
        for set in self.sets.values() {
            if let Some(next) = set.next() {
                let neighbour = self.get(next).ok_or(EquivalenceError::UnknownSet(next))?;
                if neighbour.prev() != Some(set.id()) {
                    return Err(EquivalenceError::BrokenLink {
                        from: set.id(),
                        to: next,
                    });
                }
            }
            if let Some(prev) = set.prev() {
                let neighbour = self.get(prev).ok_or(EquivalenceError::UnknownSet(prev))?;
                if neighbour.next() != Some(set.id()) {
                    return Err(EquivalenceError::BrokenLink {
                        from: set.id(),
                        to: prev,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Index sets by id, rejecting duplicates.
fn index_sets<C: Card>(
    sets: impl IntoIterator<Item = EquivalenceSet<C>>,
) -> Result<OrdMap<SetId, EquivalenceSet<C>>> {
    let mut index = OrdMap::new();
    for set in sets {
        let id = set.id();
        if index.insert(id, set).is_some() {
            return Err(EquivalenceError::DuplicateSet(id));
        }
    }
    Ok(index)
}

/// Choose the representative of one set.
fn pick<C, S>(set: &EquivalenceSet<C>, standing: &S) -> Result<C>
where
    C: Card,
    S: Standing<C> + ?Sized,
{
    if set.is_empty() {
        return Err(EquivalenceError::EmptyEquivalenceSet(set.id()));
    }
    if set.is_singleton() {
        return Ok(set.lowest().clone());
    }

    let card = if standing.standing(set.lowest())? {
        set.highest()
    } else {
        set.lowest()
    };
    Ok(card.clone())
}
