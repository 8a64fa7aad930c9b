//! Equivalence classes of cards and action reduction.
//!
//! ## Overview
//!
//! Many legal card plays lead to the same game-theoretic outcome: any card
//! of a run the acting player holds can stand in for the rest. This module
//! collapses such runs so a search driver explores one action per class.
//!
//! - [`EquivalenceSet`]: one class, rank-sorted, linked to its neighbours
//! - [`Standing`]: decides whether a class plays its highest or lowest card
//! - [`PlayContext`]: leading or following, resolved against the partition
//!   by [`ChainStanding`]
//! - [`EquivalenceChecker`]: the partition plus card lookup, and the
//!   reduction entry points
//!
//! Which cards are equivalent is decided by the game; the checker only
//! receives the partition.
//!
//! ## Usage
//!
//! ```rust
//! use rust_eqclass::core::CardId;
//! use rust_eqclass::equivalence::{EquivalenceChecker, PlayContext};
//!
//! // Assuming the engine produced a partition and a list of legal cards
//! fn branch(checker: &EquivalenceChecker, legal: &[CardId], to_beat: Option<CardId>) {
//!     let context = match to_beat {
//!         Some(card) => PlayContext::Beating(card),
//!         None => PlayContext::Opening,
//!     };
//!     match checker.reduce_legal_actions(legal, &checker.in_context(context)) {
//!         Ok(actions) => println!("searching {} of {} actions", actions.len(), legal.len()),
//!         Err(e) => eprintln!("stale partition: {e}"),
//!     }
//! }
//! ```

pub mod checker;
pub mod config;
pub mod error;
pub mod set;
pub mod standing;

pub use checker::{EquivalenceChecker, Removal};
pub use config::CheckerConfig;
pub use error::{EquivalenceError, Result};
pub use set::{EquivalenceSet, SetId, SetRecord};
pub use standing::{ChainStanding, PlayContext, Standing, StandingFn};
