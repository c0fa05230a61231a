//! IR type universe for Kiln.
//!
//! Everything the device backend needs to know about how a value is laid
//! out lives here:
//! - [`IrType`]: a handle into the shared [`TypeTable`], tagged with its table
//! - [`IrTypeData`]: the structural description behind a handle
//! - [`IrContext`]: the compilation's IR universe, the only place new
//!   aggregates are minted (validated, laid out, then interned)
//!
//! IR types are immutable once interned. Structurally identical requests
//! return the same handle, so type equality is an O(1) handle comparison.

mod config;
mod context;
mod data;
mod error;
mod format;
mod hints;
mod layout;
mod params;
mod table;
mod ty;

pub use config::TargetConfig;
pub use context::{ContextId, IrContext};
pub use data::{AddressSpace, AggregateData, IrField, IrTypeData};
pub use error::{ConstructError, TableError};
pub use hints::{AggregateKind, Align, AlignmentKind, LayoutHint, RefTypeHint};
pub use layout::TypeLayout;
pub use params::StructParams;
pub use table::{SharedTypeTable, TypeTable};
pub use ty::IrType;
