//! Small helpers shared across layers.

pub mod id_set;
