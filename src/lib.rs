#![doc = "polymerge public API"]
mod config;
mod engine;
mod error;
mod geom;
mod io;
mod metric;
mod partition;
mod passes;
mod record;
mod stats;

#[doc(inline)]
pub use config::{EngineConfig, Thresholds};

#[doc(inline)]
pub use engine::{Engine, RunReport};

#[doc(inline)]
pub use error::MergeError;

#[doc(inline)]
pub use geom::{compactness, merge_geometry, perimeter, repair, SLIVER_AREA};

#[doc(inline)]
pub use io::geojson::{read_partition, write_partition};

#[doc(inline)]
pub use metric::distance;

#[doc(inline)]
pub use partition::{Ledger, Neighbor, Partition, MIN_SHARED_AREA};

#[doc(inline)]
pub use passes::{ConditionalParams, PassKind, PassLimits, PassReport};

#[doc(inline)]
pub use record::{OriginIds, PolygonRecord, RecordId};

#[doc(inline)]
pub use stats::{Band, BandStats, OriginStatistics, RecordStats, ZonalStatistics, STATISTICS, column_name};
