mod bbox;
mod compactness;
mod index;
mod repair;

use bbox::BoundingBox;
pub(crate) use index::AdjacencyIndex;
pub use compactness::{compactness, perimeter};
pub(crate) use repair::area_tolerance;
pub use repair::{merge_geometry, repair, SLIVER_AREA};
