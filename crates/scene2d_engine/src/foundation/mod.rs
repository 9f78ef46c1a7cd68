//! Foundation utilities shared by every subsystem

pub mod math;
pub mod time;
