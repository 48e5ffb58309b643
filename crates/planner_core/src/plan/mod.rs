//! Cell-size search for UAV coverage with a single supporting UGV.

pub(crate) mod environment;
pub(crate) mod feasibility;
pub(crate) mod hardware;
pub(crate) mod search;
pub(crate) mod sector;
pub(crate) mod tiling;
