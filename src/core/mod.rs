//! Core types: cards, players, actions.
//!
//! These are the engine-facing identifiers the equivalence layer works
//! with. They carry no game rules.

pub mod card;
pub mod player;
pub mod action;

pub use card::{Card, CardId};
pub use player::PlayerId;
pub use action::{Action, CardAction, TemplateId};
