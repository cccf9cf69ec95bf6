//! Foundation utilities shared by every layer of the engine

pub mod math;
