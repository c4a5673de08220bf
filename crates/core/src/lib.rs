#![forbid(unsafe_code)]

pub mod achievements;
pub mod defaults;
pub mod model;
pub mod scan;
pub mod time;

pub use time::Clock;
