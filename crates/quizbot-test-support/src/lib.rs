//! Shared test doubles for the quiz bot.

mod clock;
mod rng;
mod store;

pub use clock::FixedClock;
pub use rng::{MockRng, SequenceRng};
pub use store::{
    FailingSessionStore, FlakySessionStore, MemorySessionStore, UnconfirmedWriteStore,
};
