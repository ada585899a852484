//! Port implementations.
//!
//! `live` adapters reach real systems. `recording` adapters wrap a live
//! adapter and write every interaction to a cassette. `replaying` adapters
//! answer from a cassette without touching the network.

pub mod live;
pub mod recording;
pub mod replaying;
