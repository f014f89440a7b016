//! Boundary I/O: reading the input partition and writing the merged one.

pub(crate) mod geojson;
