//! Window roots and hit-testing
//!
//! A window root pairs a native window handle (supplied by the
//! window-enumeration collaborator) with the provider context behind it.
//! Construction is gated on `isJavaWindow`; non-provider windows yield no
//! root.

use std::sync::Arc;

use accessbridge_sys::Hwnd;

use crate::api::AccessBridgeApi;
use crate::error::DispatchResult;
use crate::tree::{AccessibleNode, NodePath};
use crate::{BridgeOptions, NativeWindow};

/// Upper bound on the leaf-to-root walk during hit-testing, in case a
/// provider reports a parent cycle.
const PATH_DEPTH_LIMIT: usize = 256;

/// One provider-backed top-level window and its root context.
pub struct AccessibleWindow {
    hwnd: Hwnd,
    title: String,
    vm_id: i32,
    root: Arc<AccessibleNode>,
    api: Arc<dyn AccessBridgeApi>,
    options: Arc<BridgeOptions>,
}

impl AccessibleWindow {
    /// Build a window root, or `Ok(None)` when the window does not belong
    /// to the provider.
    pub(crate) fn from_native(
        api: Arc<dyn AccessBridgeApi>,
        options: Arc<BridgeOptions>,
        window: &NativeWindow,
    ) -> DispatchResult<Option<Self>> {
        if !api.is_java_window(window.hwnd) {
            return Ok(None);
        }
        let (vm_id, handle) = api.get_accessible_context_from_hwnd(window.hwnd)?;
        let root = AccessibleNode::new(Arc::clone(&api), Arc::clone(&options), handle);
        tracing::debug!(
            target: "accessbridge::tree",
            vm_id,
            title = %window.title,
            "window root constructed"
        );
        Ok(Some(AccessibleWindow {
            hwnd: window.hwnd,
            title: window.title.clone(),
            vm_id,
            root,
            api,
            options,
        }))
    }

    pub fn hwnd(&self) -> Hwnd {
        self.hwnd
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn vm_id(&self) -> i32 {
        self.vm_id
    }

    pub fn root(&self) -> &Arc<AccessibleNode> {
        &self.root
    }

    /// Deepest node under the screen point, as a root-to-leaf path.
    ///
    /// Asks the provider for the context at the point, then walks parents
    /// back up, prepending each, until the window root (by provider
    /// identity) or the top of the object graph is reached. `Ok(None)`
    /// when the point hits nothing in this window.
    pub fn get_node_path_at(&self, x: i32, y: i32) -> DispatchResult<Option<NodePath>> {
        let leaf = match self.api.get_accessible_context_at(self.root.handle(), x, y)? {
            Some(handle) => handle,
            None => return Ok(None),
        };

        let mut path = NodePath::new();
        let mut current =
            AccessibleNode::new(Arc::clone(&self.api), Arc::clone(&self.options), leaf);
        path.add_parent(Arc::clone(&current));

        for _ in 0..PATH_DEPTH_LIMIT {
            if self.api.is_same_object(current.handle(), self.root.handle()) {
                break;
            }
            let parent = match current.get_parent() {
                Some(parent) => parent,
                None => break,
            };
            path.add_parent(Arc::clone(&parent));
            current = parent;
        }

        Ok(Some(path))
    }
}

impl std::fmt::Debug for AccessibleWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessibleWindow")
            .field("hwnd", &self.hwnd)
            .field("title", &self.title)
            .field("vm_id", &self.vm_id)
            .finish()
    }
}
