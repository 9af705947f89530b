//! Types module - period, records, params, genesis, events, messages, keys

mod coin;
mod period;
mod records;
mod params;
mod genesis;
mod msgs;
pub mod events;
pub mod keys;

pub use coin::*;
pub use period::*;
pub use records::*;
pub use params::*;
pub use genesis::*;
pub use msgs::*;
pub use events::Event;
