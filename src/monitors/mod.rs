//! Internet reachability probing

pub mod reachability;
pub mod transport;

pub use reachability::{Probe, Prober, StageOutcome, Target, is_local_network};
pub use transport::{NetTransport, Transport};
