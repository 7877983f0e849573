//! Domain types

pub mod identity;
pub mod quote;
pub mod session;
