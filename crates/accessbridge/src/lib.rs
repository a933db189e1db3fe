//! Safe host layer over the native accessibility provider
//!
//! This crate mediates between a host process and an accessibility
//! provider shipped as a C-ABI dynamic library. It owns the hard parts of
//! that boundary:
//!
//! - [`JavaObjectHandle`]: deterministic release of provider references,
//!   exactly once per reference, on every exit path
//! - [`AccessBridgeApi`]: one ABI-agnostic dispatch surface over the two
//!   pointer-width variants of the provider, selected once at load
//! - Marshaling of fixed-capacity wire structures into variable-length
//!   host structures, count-trusted and recursive
//! - [`EventHub`]: provider callbacks wired to host subscribers through
//!   native trampolines that live exactly as long as a registration
//! - [`AccessibleNode`]: a lazy, cached, size-limited tree over handles
//!
//! Every dispatch call is synchronous and may block on the provider.
//! Provider events arrive on provider-controlled threads. See
//! [`AccessBridge::load`] for the entry point.

mod api;
mod client;
mod error;
mod events;
mod handle;
mod info;
mod limits;
mod marshal;
mod tree;

use std::path::PathBuf;
use std::sync::Arc;

use accessbridge_sys::{provider_library_name, JObject32, JObject64, NativeRef};

use crate::client::BridgeClient;

pub use accessbridge_sys::{AbiVariant, EventKind, Hwnd, LoadError};
pub use api::AccessBridgeApi;
pub use error::{DispatchError, DispatchResult, MarshalError};
pub use events::{AccessibleEvent, EventDetail, EventHub, RawEventDetail, Subscription};
pub use handle::{JavaObjectHandle, ObjectReleaser};
pub use info::*;
pub use limits::{clamp_count, limit_grid};
pub use tree::{AccessibleJvm, AccessibleNode, AccessibleWindow, NodeCursor, NodePath};

/// Tuning knobs for the host layer.
#[derive(Clone, Debug)]
pub struct BridgeOptions {
    /// Upper bound on elements materialized from one provider response
    /// (children, selections, visible children; distributed across both
    /// dimensions for tables).
    pub collection_size_limit: usize,
    /// Upper bound on text line spans fetched per text object.
    pub text_line_count_limit: usize,
    /// Override for the provider library path; defaults to the
    /// pointer-width-appropriate name resolved by the system loader.
    pub library_path: Option<PathBuf>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        BridgeOptions {
            collection_size_limit: 512,
            text_line_count_limit: 200,
            library_path: None,
        }
    }
}

/// One top-level window as reported by the window-enumeration
/// collaborator.
#[derive(Clone, Debug)]
pub struct NativeWindow {
    pub hwnd: Hwnd,
    pub title: String,
}

/// Window-enumeration collaborator: supplies the desktop's top-level
/// windows. The bridge filters them through the provider's
/// `isJavaWindow` before constructing roots.
pub trait WindowSource {
    fn top_level_windows(&self) -> Vec<NativeWindow>;
}

/// The loaded bridge: dispatch surface, event hub, and tree entry points.
///
/// Load once per process. The ABI variant is chosen here from the process
/// pointer width and never re-decided.
pub struct AccessBridge {
    api: Arc<dyn AccessBridgeApi>,
    events: Arc<EventHub>,
    options: Arc<BridgeOptions>,
}

impl AccessBridge {
    /// Load the provider library, resolve the dispatch table for this
    /// process's ABI variant, and run the provider bootstrap.
    ///
    /// Any missing library or export is fatal here; nothing is retried.
    pub fn load(options: BridgeOptions) -> Result<Self, LoadError> {
        let path = options
            .library_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(provider_library_name()));
        match AbiVariant::current() {
            AbiVariant::Legacy32 => Self::load_as::<JObject32>(path, options),
            AbiVariant::Current64 => Self::load_as::<JObject64>(path, options),
        }
    }

    fn load_as<R: NativeRef>(path: PathBuf, options: BridgeOptions) -> Result<Self, LoadError> {
        let client = BridgeClient::<R>::load(&path)?;
        Ok(Self::from_api(Arc::new(client), options))
    }

    /// Assemble a bridge over an existing dispatch surface. This is the
    /// seam for embedding and for exercising the layer against an
    /// emulated provider.
    pub fn from_api(api: Arc<dyn AccessBridgeApi>, options: BridgeOptions) -> Self {
        let events = EventHub::new(Arc::clone(&api));
        AccessBridge {
            api,
            events,
            options: Arc::new(options),
        }
    }

    /// The ABI variant in effect.
    pub fn variant(&self) -> AbiVariant {
        self.api.variant()
    }

    /// The dispatch surface, for callers needing raw operations.
    pub fn api(&self) -> &Arc<dyn AccessBridgeApi> {
        &self.api
    }

    /// The event hub; subscribe here for provider events.
    pub fn events(&self) -> &Arc<EventHub> {
        &self.events
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// Build a window root from one native window, or `Ok(None)` when the
    /// window does not belong to the provider.
    pub fn window_from(&self, window: &NativeWindow) -> DispatchResult<Option<AccessibleWindow>> {
        AccessibleWindow::from_native(
            Arc::clone(&self.api),
            Arc::clone(&self.options),
            window,
        )
    }

    /// Enumerate provider-backed windows from the collaborator and group
    /// them by VM: VMs ordered by id, windows by display sort key. A
    /// window whose root construction fails is skipped, not fatal.
    pub fn enum_jvms(&self, source: &dyn WindowSource) -> Vec<AccessibleJvm> {
        let mut roots = Vec::new();
        for native in source.top_level_windows() {
            match self.window_from(&native) {
                Ok(Some(window)) => roots.push(window),
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(
                        target: "accessbridge::tree",
                        title = %native.title,
                        %err,
                        "window root construction skipped"
                    );
                }
            }
        }
        tree::group_into_jvms(&self.api, roots)
    }

    /// Hit-test across every enumerated VM; first hit wins.
    pub fn get_node_path_at(
        &self,
        source: &dyn WindowSource,
        x: i32,
        y: i32,
    ) -> Option<NodePath> {
        self.enum_jvms(source)
            .iter()
            .find_map(|jvm| jvm.get_node_path_at(x, y))
    }
}
