//! Action reducer for the table.
//!
//! [`reduce`] maps a game document, an acting player and an [`Action`]
//! to a patch ([`StateUpdate`]) plus any private peek for the actor. The
//! store layer owns reading and writing; nothing here touches I/O.
//!
//! [`Action`]: crate::core::Action
//! [`StateUpdate`]: crate::core::StateUpdate

mod handlers;
pub mod reducer;

pub use reducer::{reduce, Outcome, ReduceContext};
