mod merge;

pub(crate) use merge::RoadFlag;
