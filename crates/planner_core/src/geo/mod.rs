pub(crate) mod angle;
pub(crate) mod geometry;
