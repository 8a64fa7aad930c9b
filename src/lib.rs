//! # rust-eqclass
//!
//! Action abstraction over equivalent cards for game-tree search.
//!
//! ## Design Principles
//!
//! 1. **Rule-Agnostic**: The crate never decides which cards are
//!    equivalent. Games hand over a partition; the crate keeps it
//!    consistent and reduces action lists against it.
//!
//! 2. **Explicit Context**: Whether a class plays high or low is decided by
//!    a `Standing` value the caller passes in, never by hidden state.
//!
//! 3. **Fail Loudly**: A legal action missing from the partition is an
//!    error. Dropping it would silently bias the search.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: The partition lives in `im` maps, so
//!   search branches clone a checker in O(1) and mutate their own copy.
//!
//! - **Read-Only Reduction**: Reduction takes `&self` and keeps its
//!   bookkeeping local, so a checker can be shared across threads.
//!
//! ## Modules
//!
//! - `core`: Card, player and action identifiers
//! - `equivalence`: Equivalence sets, standing predicate, checker

pub mod core;
pub mod equivalence;

// Re-export commonly used types
pub use crate::core::{Action, Card, CardAction, CardId, PlayerId, TemplateId};

pub use crate::equivalence::{
    ChainStanding, CheckerConfig, EquivalenceChecker, EquivalenceError, EquivalenceSet,
    PlayContext, Removal, SetId, Standing, StandingFn,
};
