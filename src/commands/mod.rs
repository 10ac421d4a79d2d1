pub mod compile;
pub mod config;
pub mod dot;
pub mod hash;
