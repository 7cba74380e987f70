//! Data exchanged between the pairs engine and the collaborators around it.
//!
//! Presentation subscribes to [`Event`]s, persistence stores [`ProgressData`] and
//! [`RoundSnapshot`]s, and level designers author [`RoundConfig`]s. Nothing in here
//! has behavior beyond defaults and small helpers, validation lives in `pairs-core`.
#![no_std]

extern crate alloc;

pub use config::*;
pub use event::*;
pub use progress::*;
pub use snapshot::*;

mod config;
mod event;
mod progress;
mod snapshot;
