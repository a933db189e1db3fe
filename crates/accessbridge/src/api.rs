//! The ABI-agnostic dispatch surface
//!
//! Call sites above this trait are written once; the width-specific
//! [`BridgeClient`](crate::client::BridgeClient) instantiations implement
//! it, as do test providers. Every operation derives its VM routing from
//! the handle it is given, and every returned reference arrives as an
//! owned [`JavaObjectHandle`].
//!
//! All calls are synchronous and may block on the provider; callers that
//! need responsiveness must not invoke them from a UI thread.

use accessbridge_sys::{AbiVariant, EventKind, Hwnd};

use crate::error::DispatchResult;
use crate::handle::JavaObjectHandle;
use crate::info::*;

pub trait AccessBridgeApi: Send + Sync {
    /// The ABI variant this client was constructed for.
    fn variant(&self) -> AbiVariant;

    /// Wrap a raw reference delivered outside a normal call path (event
    /// trampolines). Minted with this client as the releaser.
    fn wrap_foreign(&self, vm_id: i32, raw: u64) -> JavaObjectHandle;

    // ------------------------------------------------------------------
    // Window plumbing
    // ------------------------------------------------------------------

    fn is_java_window(&self, window: Hwnd) -> bool;

    /// Root context of a window, with the VM id the provider routed it to.
    fn get_accessible_context_from_hwnd(
        &self,
        window: Hwnd,
    ) -> DispatchResult<(i32, JavaObjectHandle)>;

    fn get_hwnd_from_accessible_context(&self, ac: &JavaObjectHandle) -> Option<Hwnd>;

    fn get_accessible_context_with_focus(
        &self,
        window: Hwnd,
    ) -> DispatchResult<(i32, JavaObjectHandle)>;

    // ------------------------------------------------------------------
    // Identity and versioning
    // ------------------------------------------------------------------

    /// Provider-reported identity. Reflexive, symmetric, and stable for
    /// handles referencing the same underlying object.
    fn is_same_object(&self, a: &JavaObjectHandle, b: &JavaObjectHandle) -> bool;

    fn get_version_info(&self, vm_id: i32) -> DispatchResult<VersionInfo>;

    // ------------------------------------------------------------------
    // Context navigation and description
    // ------------------------------------------------------------------

    fn get_accessible_context_info(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleContextInfo>;

    /// `None` when the provider has no child at that index.
    fn get_accessible_child_from_context(
        &self,
        ac: &JavaObjectHandle,
        index: i32,
    ) -> Option<JavaObjectHandle>;

    /// `None` at the top of the object graph. Never cached by callers —
    /// a provider object's parent can change between accesses.
    fn get_accessible_parent_from_context(&self, ac: &JavaObjectHandle)
        -> Option<JavaObjectHandle>;

    /// Deepest context at a screen point below `parent`; `Ok(None)` when
    /// the point hits nothing.
    fn get_accessible_context_at(
        &self,
        parent: &JavaObjectHandle,
        x: i32,
        y: i32,
    ) -> DispatchResult<Option<JavaObjectHandle>>;

    fn request_focus(&self, ac: &JavaObjectHandle) -> DispatchResult<()>;

    // ------------------------------------------------------------------
    // Relations, hypertext, bindings, icons, actions
    // ------------------------------------------------------------------

    fn get_accessible_relation_set(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleRelationSet>;

    fn get_accessible_hypertext(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleHypertextInfo>;

    fn get_accessible_key_bindings(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<Vec<AccessibleKeyBinding>>;

    fn get_accessible_icons(&self, ac: &JavaObjectHandle)
        -> DispatchResult<Vec<AccessibleIconInfo>>;

    fn get_accessible_actions(&self, ac: &JavaObjectHandle) -> DispatchResult<Vec<String>>;

    /// Execute a batch of named actions; fails with the index of the first
    /// action the provider rejected.
    fn do_accessible_actions(
        &self,
        ac: &JavaObjectHandle,
        actions: &[String],
    ) -> DispatchResult<()>;

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    fn get_accessible_text_info(
        &self,
        at: &JavaObjectHandle,
        x: i32,
        y: i32,
    ) -> DispatchResult<AccessibleTextInfo>;

    fn get_accessible_text_items(
        &self,
        at: &JavaObjectHandle,
        index: i32,
    ) -> DispatchResult<AccessibleTextItemsInfo>;

    fn get_accessible_text_selection_info(
        &self,
        at: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTextSelectionInfo>;

    fn get_accessible_text_attributes(
        &self,
        at: &JavaObjectHandle,
        index: i32,
    ) -> DispatchResult<AccessibleTextAttributesInfo>;

    fn get_accessible_text_rect(
        &self,
        at: &JavaObjectHandle,
        index: i32,
    ) -> DispatchResult<AccessibleTextRect>;

    /// `(start, end)` character indices of the line containing `index`.
    fn get_accessible_text_line_bounds(
        &self,
        at: &JavaObjectHandle,
        index: i32,
    ) -> DispatchResult<(i32, i32)>;

    fn get_accessible_text_range(
        &self,
        at: &JavaObjectHandle,
        start: i32,
        end: i32,
    ) -> DispatchResult<String>;

    fn set_text_contents(&self, ac: &JavaObjectHandle, text: &str) -> DispatchResult<()>;

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    fn get_accessible_table_info(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTableInfo>;

    fn get_accessible_table_cell_info(
        &self,
        table: &JavaObjectHandle,
        row: i32,
        column: i32,
    ) -> DispatchResult<AccessibleTableCellInfo>;

    fn get_accessible_table_row_header(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTableInfo>;

    fn get_accessible_table_column_header(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTableInfo>;

    // ------------------------------------------------------------------
    // Selections
    // ------------------------------------------------------------------

    fn add_accessible_selection(&self, selection: &JavaObjectHandle, index: i32);

    fn clear_accessible_selection(&self, selection: &JavaObjectHandle);

    fn get_accessible_selection(
        &self,
        selection: &JavaObjectHandle,
        index: i32,
    ) -> Option<JavaObjectHandle>;

    fn get_accessible_selection_count(&self, selection: &JavaObjectHandle) -> i32;

    fn is_accessible_child_selected(&self, selection: &JavaObjectHandle, index: i32) -> bool;

    fn remove_accessible_selection(&self, selection: &JavaObjectHandle, index: i32);

    fn select_all_accessible_selection(&self, selection: &JavaObjectHandle);

    // ------------------------------------------------------------------
    // Visible children
    // ------------------------------------------------------------------

    fn get_visible_children_count(&self, ac: &JavaObjectHandle) -> i32;

    fn get_visible_children(
        &self,
        ac: &JavaObjectHandle,
        start_index: i32,
    ) -> DispatchResult<Vec<JavaObjectHandle>>;

    // ------------------------------------------------------------------
    // Event hook plumbing (used only by the event hub)
    // ------------------------------------------------------------------

    /// Install the native trampoline for one event kind. The hub
    /// guarantees this is called only on the Unregistered → Registered
    /// transition, serialized per kind.
    fn install_event_hook(&self, kind: EventKind);

    /// Install `null` for one event kind, after which the provider will
    /// not invoke the trampoline again.
    fn remove_event_hook(&self, kind: EventKind);
}
