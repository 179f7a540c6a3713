//! Data models for sensor layouts: the observation [`domain::Domain`] and the
//! [`sensor::SensorSet`] being optimized inside it.

pub mod domain;
pub mod sensor;
