//! Internal elements shared between the engine and its consumers.
//!
//! Items defined in this module *may* change between releases without notice.

mod error;

pub use self::error::*;
