//! Various useful things.

pub mod fmt;
pub mod json;
