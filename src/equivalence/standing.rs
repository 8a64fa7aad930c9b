//! The standing predicate: which end of a class represents it.
//!
//! A class is *standing* when its cards would safely take the trick as
//! things stand. Standing classes are represented by their highest member,
//! non-standing ones by their lowest.
//!
//! The predicate is probed with the first (lowest) member of a class. The
//! context it needs is always passed explicitly:
//!
//! - `bool` - a fixed regime decided by the caller
//! - [`ChainStanding`] - a [`PlayContext`] resolved against the partition's
//!   rank chain, see [`EquivalenceChecker::in_context`]
//! - [`StandingFn`] - game-specific rules (suits, trumps) as a closure
//!
//! ```
//! use rust_eqclass::core::{CardId, PlayerId};
//! use rust_eqclass::equivalence::{
//!     EquivalenceChecker, EquivalenceSet, PlayContext, SetId, Standing,
//! };
//!
//! // North holds {0,1}, East holds the higher {2}.
//! let checker = EquivalenceChecker::from_sets([
//!     EquivalenceSet::new(SetId(0), PlayerId(0), [CardId(0), CardId(1)])
//!         .unwrap()
//!         .with_next(SetId(1)),
//!     EquivalenceSet::singleton(SetId(1), PlayerId(1), CardId(2)).with_prev(SetId(0)),
//! ]).unwrap();
//!
//! // East's 2 is still out, so North's class does not stand.
//! let opening = checker.in_context(PlayContext::Opening);
//! assert!(!opening.standing(&CardId(0)).unwrap());
//! assert!(opening.standing(&CardId(2)).unwrap());
//!
//! assert!(checker.in_context(PlayContext::Undefined).standing(&CardId(0)).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::core::Card;

use super::checker::EquivalenceChecker;
use super::error::{EquivalenceError, Result};

/// Decides between the high and low representative of a class.
pub trait Standing<C> {
    /// `true` selects the highest member of the class probed by `probe`,
    /// `false` the lowest.
    fn standing(&self, probe: &C) -> Result<bool>;
}

impl<C> Standing<C> for bool {
    fn standing(&self, _probe: &C) -> Result<bool> {
        Ok(*self)
    }
}

impl<C, S: Standing<C> + ?Sized> Standing<C> for &S {
    fn standing(&self, probe: &C) -> Result<bool> {
        (**self).standing(probe)
    }
}

/// Where the acting player stands in the current trick.
///
/// Carries no game rules by itself; see [`ChainStanding`] for how it is
/// resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayContext<C> {
    /// Leading: nothing has been played to the trick yet.
    Opening,
    /// Following: the best card played to the trick so far.
    Beating(C),
    /// No trick context available. Asking for standing is an error.
    Undefined,
}

/// A [`PlayContext`] resolved against one partition.
///
/// A class stands when no higher class is left in its rank chain (no
/// `next` neighbour) and, when following, its lowest card outranks the
/// card to beat. Anything the chain cannot express, such as trumps or
/// suits spread over several chains, belongs in a [`StandingFn`].
#[derive(Clone, Debug)]
pub struct ChainStanding<'a, C: Card> {
    pub(super) checker: &'a EquivalenceChecker<C>,
    pub(super) context: PlayContext<C>,
}

impl<C: Card> ChainStanding<'_, C> {
    #[must_use]
    pub fn context(&self) -> &PlayContext<C> {
        &self.context
    }
}

impl<C: Card> Standing<C> for ChainStanding<'_, C> {
    fn standing(&self, probe: &C) -> Result<bool> {
        let to_beat = match &self.context {
            PlayContext::Opening => None,
            PlayContext::Beating(card) => Some(card),
            PlayContext::Undefined => {
                return Err(EquivalenceError::UndefinedStandingContext(format!(
                    "{probe:?}"
                )))
            }
        };

        let set = self.checker.set_of(probe)?;
        if to_beat.is_some_and(|card| probe <= card) {
            return Ok(false);
        }
        Ok(self.checker.next_set(set.id()).is_none())
    }
}

/// Closure-backed standing predicate for game-specific rules.
///
/// ```
/// use rust_eqclass::core::CardId;
/// use rust_eqclass::equivalence::{Standing, StandingFn};
///
/// // Cards 30.. are trumps and always stand.
/// let trumps = StandingFn::new(|card: &CardId| Ok(card.raw() >= 30));
/// assert!(trumps.standing(&CardId(31)).unwrap());
/// assert!(!trumps.standing(&CardId(3)).unwrap());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct StandingFn<F>(pub F);

impl<F> StandingFn<F> {
    /// Wrap a closure, fixing its signature for inference.
    pub fn new<C>(predicate: F) -> Self
    where
        F: Fn(&C) -> Result<bool>,
    {
        Self(predicate)
    }
}

impl<C, F> Standing<C> for StandingFn<F>
where
    F: Fn(&C) -> Result<bool>,
{
    fn standing(&self, probe: &C) -> Result<bool> {
        (self.0)(probe)
    }
}
