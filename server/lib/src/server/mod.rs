//! The request facing half of the engine: resolving the principal and the
//! access control strategies that answer right checks on its behalf.

pub mod access;
pub mod identity;
