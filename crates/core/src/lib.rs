#![forbid(unsafe_code)]

pub mod model;
pub mod recommend;
pub mod status;
pub mod time;

pub use time::Clock;
