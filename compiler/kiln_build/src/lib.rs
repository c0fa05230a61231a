//! Custom type building for Kiln.
//!
//! Lowers source-level types ([`kiln_types`]) to device IR types
//! ([`kiln_ir`]). The host's [`TypeBuilder`] handles scalars, device
//! pointers, arrays and composites on its own; library authors take over
//! specific types by registering a [`CustomTypeBuilder`] in the
//! [`BuilderRegistry`], usually assembling the result with
//! [`assemble_struct`].
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=kiln_build=debug`: registrations and custom-builder claims.
//! - `RUST_LOG=kiln_build=trace,kiln_ir=trace`: every build request,
//!   cache hit and minted aggregate.

mod assemble;
mod builders;
mod context;
mod error;
mod extension;
mod registry;
mod session;

use std::sync::Once;

pub use assemble::{assemble_struct, StructPolicy};
pub use builders::{CompositeBuilder, FieldListBuilder};
pub use context::BuildContext;
pub use error::{BuildError, RegistryError};
pub use extension::CustomTypeBuilder;
pub use registry::{BuilderRegistry, TypeKey};
pub use session::TypeBuilder;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber driven by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
