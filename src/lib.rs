//! Maximum pressure release over a network of valves: parse the scan, build
//! the network, precompute hop counts between the valves worth visiting,
//! then search for the best opening schedule for one agent, or for two
//! splitting the valves between them.

pub mod distance;
pub mod error;
pub mod search;
pub mod volcano;

pub use distance::{shortest_distances, DistanceTable};
pub use error::Error;
pub use search::{best_release, best_release_pair, SearchLimits};
pub use volcano::{parse_records, ValveHandle, ValveRecord, Volcano};
