//! Database query modules.

pub mod items;
