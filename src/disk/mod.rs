//! Disk layout planning

pub mod layouts;
pub mod naming;
pub mod units;
