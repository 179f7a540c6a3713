//! Reading and writing sensor-location files.

pub mod sensors;
