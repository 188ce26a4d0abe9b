//! The protocol bindings shared between the delegated admin access control
//! engine and the handlers that consume it. This is the error taxonomy that
//! surfaces to operators, the attribute name type, and the well known names
//! used for attributes, rights and domain states.

#![deny(warnings)]
#![warn(unused_extern_crates)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unreachable)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]

pub mod attribute;
pub mod constants;
pub mod internal;
