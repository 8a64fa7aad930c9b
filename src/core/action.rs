//! Action representation: template + optional card.
//!
//! Actions are compositional: a template (the "verb") plus the card being
//! played, if any. For example:
//! - "Pass" = template only
//! - "Play card X" = template + the card
//!
//! Only card plays take part in action reduction. Everything else (bids,
//! questions, passes) reaches the search driver untouched.

use serde::{Deserialize, Serialize};

use super::card::CardId;

/// Action template identifier. Games define what templates exist.
///
/// The abstraction layer doesn't interpret templates - it just carries them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u16);

impl TemplateId {
    /// Create a new template ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Template({})", self.0)
    }
}

/// An action that may or may not play a card.
///
/// Implemented by engine action types so that mixed legal-action lists can
/// be reduced: card plays collapse to one representative per class, other
/// actions pass through.
pub trait CardAction<C>: Clone {
    /// The card this action plays, or `None` for non-card actions.
    fn played_card(&self) -> Option<&C>;

    /// The same action, playing `card` instead.
    ///
    /// Only called on actions whose `played_card` is `Some`.
    #[must_use]
    fn with_card(&self, card: C) -> Self;
}

/// A complete game action.
///
/// ## Example
///
/// ```
/// use rust_eqclass::core::{Action, CardAction, CardId, TemplateId};
///
/// // "Pass" action - no card
/// let pass = Action::new(TemplateId::new(0));
/// assert!(pass.played_card().is_none());
///
/// // "Play card" action
/// let play = Action::play(TemplateId::new(1), CardId(5));
/// assert_eq!(play.played_card(), Some(&CardId(5)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// The action template (type of action).
    pub template: TemplateId,

    /// The card played by this action, if any.
    pub card: Option<CardId>,
}

impl Action {
    /// Create an action that plays no card.
    #[must_use]
    pub fn new(template: TemplateId) -> Self {
        Self {
            template,
            card: None,
        }
    }

    /// Create a card-play action.
    #[must_use]
    pub fn play(template: TemplateId, card: CardId) -> Self {
        Self {
            template,
            card: Some(card),
        }
    }

    /// Check if this action plays a card.
    #[must_use]
    pub fn is_card_play(&self) -> bool {
        self.card.is_some()
    }
}

impl CardAction<CardId> for Action {
    fn played_card(&self) -> Option<&CardId> {
        self.card.as_ref()
    }

    fn with_card(&self, card: CardId) -> Self {
        Self {
            template: self.template,
            card: Some(card),
        }
    }
}
