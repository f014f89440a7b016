mod adjacency;
mod ops;
mod partition;

pub use adjacency::{Neighbor, MIN_SHARED_AREA};
pub(crate) use ops::RoadFlag;
pub use partition::{Ledger, Partition};
