//! The delegated administration access control engine. Given an authenticated
//! administrator, a target directory entry and the right an operation needs,
//! this decides whether the operation may go ahead. Two incompatible models are
//! supported, a legacy domain based model and a grant (ACL) based model, and
//! exactly one is selected from configuration when the engine is built.

#![deny(warnings)]
#![recursion_limit = "512"]
#![warn(unused_extern_crates)]
// Enable some groups of clippy lints.
#![deny(clippy::suspicious)]
#![deny(clippy::perf)]
// Specific lints to enforce.
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::disallowed_types)]
#![deny(clippy::manual_let_else)]
#![allow(clippy::unreachable)]

#[macro_use]
extern crate tracing;
#[macro_use]
extern crate lazy_static;

// This has to be before the other modules so the macros are in scope.
#[macro_use]
pub mod macros;

pub mod acl;
pub mod be;
pub mod config;
pub mod entry;
pub mod right;
pub mod schema;
pub mod server;
pub mod target;
#[cfg(test)]
pub mod testkit;

/// A prelude of imports that should be imported by all other modules to
/// help make imports cleaner.
pub mod prelude {
    pub use adminacl_proto::attribute::{AttrString, Attribute};
    pub use adminacl_proto::constants::*;
    pub use adminacl_proto::internal::OperationError;
    pub use sketching::{
        admin_error, admin_info, admin_warn, filter_info, filter_trace, filter_warn, request_warn,
        security_access, security_debug, security_error, security_info, tagged_event, EventTag,
    };
    pub use uuid::Uuid;

    pub use crate::be::Provisioning;
    pub use crate::config::{AccessManagerType, Configuration};
    pub use crate::entry::{Entry, EntryClass, EntryReduced, ReducedValue};
    pub use crate::right::{AdminRight, AttrScope, Right, RightType};
    pub use crate::schema::Schema;
    pub use crate::server::access::{AdminAccessControl, AttrRightChecker};
    pub use crate::server::identity::{AuthToken, Identity};
    pub use crate::target::{DomainStatus, TargetType};
}
