//! Command implementations

pub mod blend;
pub mod effect;
pub mod path;
