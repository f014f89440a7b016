//! GeoJSON format reading and writing operations.

mod read;
mod write;

pub use read::read_partition;
pub use write::write_partition;
