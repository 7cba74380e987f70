#![no_std]

extern crate alloc;

pub use pairs_protocol::*;

pub use bus::*;
pub use card::*;
pub use catalog::*;
pub use clock::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use layout::*;
pub use progress::*;
pub use timeline::*;
pub use timer::*;
pub use types::*;

mod bus;
mod card;
mod catalog;
mod clock;
mod config;
mod engine;
mod error;
mod generator;
mod grid;
mod layout;
mod progress;
mod timeline;
mod timer;
mod types;

/// What became of a tap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TapOutcome {
    /// Round not accepting input, card not hidden, already queued, or no such card
    Ignored,
    /// Card revealed and waiting for a partner
    Queued,
    /// Card revealed and sent off for resolution with the previous one
    Dispatched,
}

impl TapOutcome {
    pub const fn has_update(self) -> bool {
        use TapOutcome::*;
        match self {
            Ignored => false,
            Queued => true,
            Dispatched => true,
        }
    }
}
