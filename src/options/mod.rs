//! Typed build options.
//!
//! A project declares its options once as a list of [`OptionDecl`]s.
//! [`OptionSchema::build`] validates the list, fills in defaults and adds
//! the built-in `compiler` and `build_type` options. The configure command
//! and the command line are both generated from the resulting schema.

mod check;
mod schema;

pub use check::Check;
pub use schema::{
    bool_string, DefaultValue, OptionDecl, OptionSchema, OptionSpec, BUILD_TYPES,
    DEFAULT_BUILD_TYPE, RESERVED_NAMES, RESERVED_SHORT_FLAGS,
};
