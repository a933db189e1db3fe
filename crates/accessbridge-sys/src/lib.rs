//! Raw ABI floor of the accessibility bridge
//!
//! This crate owns everything that touches the provider's C ABI directly:
//!
//! - Dynamic library loading and exact-name export resolution ([`Library`])
//! - The dual-width object-reference abstraction ([`NativeRef`],
//!   [`JObject32`], [`JObject64`])
//! - The fixed-capacity wire structures ([`structs`])
//! - Typed function-pointer signatures ([`funcs`])
//! - The all-or-nothing dispatch table ([`DispatchTable`])
//! - Event kinds and the callback-setter naming rule ([`events`])
//!
//! Nothing here interprets provider data beyond the single C-boolean
//! predicate [`succeeded`]; marshaling, handle ownership, events, and the
//! node tree live in the `accessbridge` crate on top.

pub mod events;
pub mod funcs;
pub mod loader;
pub mod refs;
pub mod structs;
pub mod table;

pub use events::{setter_symbol_for, CallbackShape, EventKind};
pub use loader::{provider_library_name, Library, LoadError};
pub use refs::{AbiVariant, Hwnd, JObject32, JObject64, NativeRef};
pub use structs::succeeded;
pub use table::DispatchTable;
