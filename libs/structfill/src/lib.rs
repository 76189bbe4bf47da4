//! Fill zero-valued struct fields with declared defaults.
//!
//! ```ignore
//! use structfill::Fill;
//!
//! #[derive(Fill, Default)]
//! struct Server {
//!     #[fill(default = "true")]
//!     enabled: bool,
//!     #[fill(default = 8080)]
//!     port: u16,
//!     #[fill(default = "30s")]
//!     timeout: std::time::Duration,
//! }
//!
//! let mut server = Server { port: 9000, ..Server::default() };
//! structfill::set_defaults(&mut server);
//! assert!(server.enabled);
//! assert_eq!(server.port, 9000);
//! ```
//!
//! Fields already holding a non-zero value are never overwritten. Nested
//! structs, sequences, maps, `Option` and `Box` are walked recursively.

extern crate self as structfill;

pub mod apply;
pub mod convert;
pub mod duration;
pub mod error;
pub mod field;
pub mod fill;
pub mod options;
pub mod registry;
pub mod walk;

use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use structfill_derive::Fill;

pub use apply::{FieldReport, Outcome, Report};
pub use error::{ConvertError, FillError};
pub use field::{FieldData, FieldPath, Segment};
pub use fill::{Fill, Kind};
pub use options::FillOptions;
pub use registry::{Converter, Registry};
pub use walk::Walker;

static GLOBAL: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(Registry::new()));

/// The process-wide registry used by `set_defaults`.
///
/// Converters run while its read lock is held, so a converter must not
/// register converters itself.
pub fn global() -> &'static RwLock<Registry> {
    &GLOBAL
}

fn read_global() -> RwLockReadGuard<'static, Registry> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_global() -> RwLockWriteGuard<'static, Registry> {
    GLOBAL.write().unwrap_or_else(PoisonError::into_inner)
}

/// Fill every empty annotated field of `target` using the global registry.
pub fn set_defaults<T: Fill>(target: &mut T) {
    read_global().apply(target);
}

/// `Registry::apply_strict` against the global registry.
pub fn set_defaults_strict<T: Fill>(target: &mut T) -> Result<Report, FillError> {
    read_global().apply_strict(target)
}

/// Bind a converter for `T` in the global registry.
pub fn register_converter<T, F>(converter: F)
where
    T: Fill,
    F: Fn(&mut FieldData<'_>) -> Result<(), ConvertError> + Send + Sync + 'static,
{
    write_global().register::<T, F>(converter);
}

/// Bind a whole-value parser for `T` in the global registry.
pub fn register_parser<T, F>(parse: F)
where
    T: Fill,
    F: Fn(&str) -> Result<T, ConvertError> + Send + Sync + 'static,
{
    write_global().register_parser::<T, F>(parse);
}
