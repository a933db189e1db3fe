//! Width-specific dispatch client
//!
//! [`BridgeClient<R>`] is the single implementation of
//! [`AccessBridgeApi`], written once against [`NativeRef`] and
//! instantiated per ABI width at load time. It owns the loaded library
//! and dispatch table, mints every [`JavaObjectHandle`], and hosts the
//! monomorphic `extern "C"` trampolines the provider calls back into.
//!
//! Handles are borrowed (`&JavaObjectHandle`) across every call, so the
//! underlying reference is alive for the call's duration by construction.

use std::path::Path;
use std::sync::Arc;

use accessbridge_sys::structs::*;
use accessbridge_sys::{
    AbiVariant, DispatchTable, EventKind, Hwnd, Library, LoadError, NativeRef,
};

use crate::api::AccessBridgeApi;
use crate::error::{DispatchError, DispatchResult};
use crate::events::{route_event, RawEventDetail};
use crate::handle::{JavaObjectHandle, ObjectReleaser};
use crate::info::*;
use crate::marshal::{self, decode_wide_ptr, WrapCtx};

/// Library plus dispatch table; the sole releaser of provider references.
pub(crate) struct ClientCore<R: NativeRef> {
    _lib: Library,
    table: DispatchTable<R>,
}

impl<R: NativeRef> ObjectReleaser for ClientCore<R> {
    fn release_object(&self, vm_id: i32, raw: u64) {
        // Best-effort: runs on drop paths, failures are not observable.
        unsafe { (self.table.release_java_object)(vm_id, R::from_raw(raw)) }
    }
}

pub(crate) struct BridgeClient<R: NativeRef> {
    core: Arc<ClientCore<R>>,
}

/// Heap-allocate a zeroed out-parameter without staging it on the stack.
/// Some wire structures run past 100 KiB.
fn boxed_zeroed<T>() -> Box<T> {
    let layout = std::alloc::Layout::new::<T>();
    unsafe {
        let ptr = std::alloc::alloc_zeroed(layout) as *mut T;
        if ptr.is_null() {
            std::alloc::handle_alloc_error(layout);
        }
        Box::from_raw(ptr)
    }
}

impl<R: NativeRef> BridgeClient<R> {
    /// Load the provider, resolve the full dispatch table, and run the
    /// provider's one-time bootstrap.
    pub(crate) fn load(path: &Path) -> Result<Self, LoadError> {
        let lib = Library::open(path)?;
        let table = DispatchTable::<R>::load(&lib)?;
        unsafe { (table.windows_run)() };
        tracing::debug!(
            target: "accessbridge::client",
            variant = %R::VARIANT,
            path = lib.path(),
            "dispatch table resolved"
        );
        Ok(BridgeClient {
            core: Arc::new(ClientCore { _lib: lib, table }),
        })
    }

    fn table(&self) -> &DispatchTable<R> {
        &self.core.table
    }

    /// Narrow a handle back to this client's reference width for one call.
    fn native(&self, handle: &JavaObjectHandle) -> R {
        R::from_raw(handle.raw())
    }

    fn mint(&self, vm_id: i32, r: R) -> JavaObjectHandle {
        JavaObjectHandle::wrap(vm_id, r.to_raw(), self.core.clone())
    }

    fn mint_opt(&self, vm_id: i32, r: R) -> Option<JavaObjectHandle> {
        if r.is_null() {
            None
        } else {
            Some(self.mint(vm_id, r))
        }
    }

    fn with_ctx<T>(&self, vm_id: i32, f: impl FnOnce(&WrapCtx<'_>) -> T) -> T {
        let releaser: Arc<dyn ObjectReleaser> = self.core.clone();
        f(&WrapCtx {
            vm_id,
            releaser: &releaser,
        })
    }
}

impl<R: NativeRef> AccessBridgeApi for BridgeClient<R> {
    fn variant(&self) -> AbiVariant {
        R::VARIANT
    }

    fn wrap_foreign(&self, vm_id: i32, raw: u64) -> JavaObjectHandle {
        JavaObjectHandle::wrap(vm_id, raw, self.core.clone())
    }

    fn is_java_window(&self, window: Hwnd) -> bool {
        succeeded(unsafe { (self.table().is_java_window)(window) })
    }

    fn get_accessible_context_from_hwnd(
        &self,
        window: Hwnd,
    ) -> DispatchResult<(i32, JavaObjectHandle)> {
        let mut vm_id = 0i32;
        let mut ac = R::NULL;
        let ok =
            unsafe { (self.table().get_accessible_context_from_hwnd)(window, &mut vm_id, &mut ac) };
        if !succeeded(ok) || ac.is_null() {
            return Err(DispatchError::failure("getAccessibleContextFromHWND"));
        }
        Ok((vm_id, self.mint(vm_id, ac)))
    }

    fn get_hwnd_from_accessible_context(&self, ac: &JavaObjectHandle) -> Option<Hwnd> {
        let hwnd =
            unsafe { (self.table().get_hwnd_from_accessible_context)(ac.vm_id(), self.native(ac)) };
        if hwnd.is_null() {
            None
        } else {
            Some(hwnd)
        }
    }

    fn get_accessible_context_with_focus(
        &self,
        window: Hwnd,
    ) -> DispatchResult<(i32, JavaObjectHandle)> {
        let mut vm_id = 0i32;
        let mut ac = R::NULL;
        let ok = unsafe {
            (self.table().get_accessible_context_with_focus)(window, &mut vm_id, &mut ac)
        };
        if !succeeded(ok) || ac.is_null() {
            return Err(DispatchError::failure("getAccessibleContextWithFocus"));
        }
        Ok((vm_id, self.mint(vm_id, ac)))
    }

    fn is_same_object(&self, a: &JavaObjectHandle, b: &JavaObjectHandle) -> bool {
        if a.vm_id() != b.vm_id() {
            return false;
        }
        succeeded(unsafe {
            (self.table().is_same_object)(a.vm_id(), self.native(a), self.native(b))
        })
    }

    fn get_version_info(&self, vm_id: i32) -> DispatchResult<VersionInfo> {
        let mut raw = AccessBridgeVersionInfoRaw::zeroed();
        let ok = unsafe { (self.table().get_version_info)(vm_id, &mut raw) };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getVersionInfo"));
        }
        Ok(marshal::wrap_version_info(&raw))
    }

    fn get_accessible_context_info(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleContextInfo> {
        let mut raw = boxed_zeroed::<AccessibleContextInfoRaw>();
        let ok = unsafe {
            (self.table().get_accessible_context_info)(ac.vm_id(), self.native(ac), &mut *raw)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleContextInfo"));
        }
        Ok(marshal::wrap_context_info(&raw))
    }

    fn get_accessible_child_from_context(
        &self,
        ac: &JavaObjectHandle,
        index: i32,
    ) -> Option<JavaObjectHandle> {
        let child = unsafe {
            (self.table().get_accessible_child_from_context)(ac.vm_id(), self.native(ac), index)
        };
        self.mint_opt(ac.vm_id(), child)
    }

    fn get_accessible_parent_from_context(
        &self,
        ac: &JavaObjectHandle,
    ) -> Option<JavaObjectHandle> {
        let parent = unsafe {
            (self.table().get_accessible_parent_from_context)(ac.vm_id(), self.native(ac))
        };
        self.mint_opt(ac.vm_id(), parent)
    }

    fn get_accessible_context_at(
        &self,
        parent: &JavaObjectHandle,
        x: i32,
        y: i32,
    ) -> DispatchResult<Option<JavaObjectHandle>> {
        let mut found = R::NULL;
        let ok = unsafe {
            (self.table().get_accessible_context_at)(
                parent.vm_id(),
                self.native(parent),
                x,
                y,
                &mut found,
            )
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleContextAt"));
        }
        Ok(self.mint_opt(parent.vm_id(), found))
    }

    fn request_focus(&self, ac: &JavaObjectHandle) -> DispatchResult<()> {
        let ok = unsafe { (self.table().request_focus)(ac.vm_id(), self.native(ac)) };
        if !succeeded(ok) {
            return Err(DispatchError::failure("requestFocus"));
        }
        Ok(())
    }

    fn get_accessible_relation_set(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleRelationSet> {
        let mut raw = boxed_zeroed::<AccessibleRelationSetInfoRaw<R>>();
        let ok = unsafe {
            (self.table().get_accessible_relation_set)(ac.vm_id(), self.native(ac), &mut *raw)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleRelationSet"));
        }
        self.with_ctx(ac.vm_id(), |ctx| marshal::wrap_relation_set(ctx, &raw))
            .map_err(Into::into)
    }

    fn get_accessible_hypertext(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleHypertextInfo> {
        let mut raw = boxed_zeroed::<AccessibleHypertextInfoRaw<R>>();
        let ok = unsafe {
            (self.table().get_accessible_hypertext)(ac.vm_id(), self.native(ac), &mut *raw)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleHypertext"));
        }
        self.with_ctx(ac.vm_id(), |ctx| marshal::wrap_hypertext(ctx, &raw))
            .map_err(Into::into)
    }

    fn get_accessible_key_bindings(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<Vec<AccessibleKeyBinding>> {
        let mut raw = AccessibleKeyBindingsRaw::zeroed();
        let ok = unsafe {
            (self.table().get_accessible_key_bindings)(ac.vm_id(), self.native(ac), &mut raw)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleKeyBindings"));
        }
        marshal::wrap_key_bindings(&raw).map_err(Into::into)
    }

    fn get_accessible_icons(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<Vec<AccessibleIconInfo>> {
        let mut raw = boxed_zeroed::<AccessibleIconsRaw>();
        let ok =
            unsafe { (self.table().get_accessible_icons)(ac.vm_id(), self.native(ac), &mut *raw) };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleIcons"));
        }
        marshal::wrap_icons(&raw).map_err(Into::into)
    }

    fn get_accessible_actions(&self, ac: &JavaObjectHandle) -> DispatchResult<Vec<String>> {
        let mut raw = boxed_zeroed::<AccessibleActionsRaw>();
        let ok = unsafe {
            (self.table().get_accessible_actions)(ac.vm_id(), self.native(ac), &mut *raw)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleActions"));
        }
        marshal::wrap_actions(&raw).map_err(Into::into)
    }

    fn do_accessible_actions(
        &self,
        ac: &JavaObjectHandle,
        actions: &[String],
    ) -> DispatchResult<()> {
        let raw = marshal::actions_to_do_to_raw(actions)?;
        let mut failure_index: JInt = -1;
        let ok = unsafe {
            (self.table().do_accessible_actions)(
                ac.vm_id(),
                self.native(ac),
                &raw,
                &mut failure_index,
            )
        };
        if !succeeded(ok) {
            return Err(DispatchError::ActionFailed {
                index: failure_index,
            });
        }
        Ok(())
    }

    fn get_accessible_text_info(
        &self,
        at: &JavaObjectHandle,
        x: i32,
        y: i32,
    ) -> DispatchResult<AccessibleTextInfo> {
        let mut raw = AccessibleTextInfoRaw::zeroed();
        let ok = unsafe {
            (self.table().get_accessible_text_info)(at.vm_id(), self.native(at), &mut raw, x, y)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTextInfo"));
        }
        Ok(marshal::wrap_text_info(&raw))
    }

    fn get_accessible_text_items(
        &self,
        at: &JavaObjectHandle,
        index: i32,
    ) -> DispatchResult<AccessibleTextItemsInfo> {
        let mut raw = boxed_zeroed::<AccessibleTextItemsInfoRaw>();
        let ok = unsafe {
            (self.table().get_accessible_text_items)(at.vm_id(), self.native(at), &mut *raw, index)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTextItems"));
        }
        Ok(marshal::wrap_text_items(&raw))
    }

    fn get_accessible_text_selection_info(
        &self,
        at: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTextSelectionInfo> {
        let mut raw = boxed_zeroed::<AccessibleTextSelectionInfoRaw>();
        let ok = unsafe {
            (self.table().get_accessible_text_selection_info)(
                at.vm_id(),
                self.native(at),
                &mut *raw,
            )
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTextSelectionInfo"));
        }
        Ok(marshal::wrap_text_selection(&raw))
    }

    fn get_accessible_text_attributes(
        &self,
        at: &JavaObjectHandle,
        index: i32,
    ) -> DispatchResult<AccessibleTextAttributesInfo> {
        let mut raw = boxed_zeroed::<AccessibleTextAttributesInfoRaw>();
        let ok = unsafe {
            (self.table().get_accessible_text_attributes)(
                at.vm_id(),
                self.native(at),
                index,
                &mut *raw,
            )
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTextAttributes"));
        }
        Ok(marshal::wrap_text_attributes(&raw))
    }

    fn get_accessible_text_rect(
        &self,
        at: &JavaObjectHandle,
        index: i32,
    ) -> DispatchResult<AccessibleTextRect> {
        let mut raw = AccessibleTextRectInfoRaw::zeroed();
        let ok = unsafe {
            (self.table().get_accessible_text_rect)(at.vm_id(), self.native(at), &mut raw, index)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTextRect"));
        }
        Ok(marshal::wrap_text_rect(&raw))
    }

    fn get_accessible_text_line_bounds(
        &self,
        at: &JavaObjectHandle,
        index: i32,
    ) -> DispatchResult<(i32, i32)> {
        let mut start: JInt = -1;
        let mut end: JInt = -1;
        let ok = unsafe {
            (self.table().get_accessible_text_line_bounds)(
                at.vm_id(),
                self.native(at),
                index,
                &mut start,
                &mut end,
            )
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTextLineBounds"));
        }
        Ok((start, end))
    }

    fn get_accessible_text_range(
        &self,
        at: &JavaObjectHandle,
        start: i32,
        end: i32,
    ) -> DispatchResult<String> {
        let span = (end - start + 1).clamp(0, i32::from(i16::MAX) - 1);
        let mut buf = vec![0 as WChar; span as usize + 1];
        let ok = unsafe {
            (self.table().get_accessible_text_range)(
                at.vm_id(),
                self.native(at),
                start,
                end,
                buf.as_mut_ptr(),
                (span + 1) as i16,
            )
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTextRange"));
        }
        Ok(marshal::decode_wide(&buf))
    }

    fn set_text_contents(&self, ac: &JavaObjectHandle, text: &str) -> DispatchResult<()> {
        let mut wide: Vec<WChar> = text.encode_utf16().collect();
        wide.push(0);
        let ok = unsafe {
            (self.table().set_text_contents)(ac.vm_id(), self.native(ac), wide.as_ptr())
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("setTextContents"));
        }
        Ok(())
    }

    fn get_accessible_table_info(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTableInfo> {
        let mut raw = AccessibleTableInfoRaw::<R>::zeroed();
        let ok = unsafe {
            (self.table().get_accessible_table_info)(ac.vm_id(), self.native(ac), &mut raw)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTableInfo"));
        }
        Ok(self.with_ctx(ac.vm_id(), |ctx| marshal::wrap_table_info(ctx, &raw)))
    }

    fn get_accessible_table_cell_info(
        &self,
        table: &JavaObjectHandle,
        row: i32,
        column: i32,
    ) -> DispatchResult<AccessibleTableCellInfo> {
        let mut raw = AccessibleTableCellInfoRaw::<R>::zeroed();
        let ok = unsafe {
            (self.table().get_accessible_table_cell_info)(
                table.vm_id(),
                self.native(table),
                row,
                column,
                &mut raw,
            )
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTableCellInfo"));
        }
        Ok(self.with_ctx(table.vm_id(), |ctx| marshal::wrap_table_cell(ctx, &raw)))
    }

    fn get_accessible_table_row_header(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTableInfo> {
        let mut raw = AccessibleTableInfoRaw::<R>::zeroed();
        let ok = unsafe {
            (self.table().get_accessible_table_row_header)(ac.vm_id(), self.native(ac), &mut raw)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTableRowHeader"));
        }
        Ok(self.with_ctx(ac.vm_id(), |ctx| marshal::wrap_table_info(ctx, &raw)))
    }

    fn get_accessible_table_column_header(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTableInfo> {
        let mut raw = AccessibleTableInfoRaw::<R>::zeroed();
        let ok = unsafe {
            (self.table().get_accessible_table_column_header)(ac.vm_id(), self.native(ac), &mut raw)
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getAccessibleTableColumnHeader"));
        }
        Ok(self.with_ctx(ac.vm_id(), |ctx| marshal::wrap_table_info(ctx, &raw)))
    }

    fn add_accessible_selection(&self, selection: &JavaObjectHandle, index: i32) {
        unsafe {
            (self.table().add_accessible_selection_from_context)(
                selection.vm_id(),
                self.native(selection),
                index,
            )
        }
    }

    fn clear_accessible_selection(&self, selection: &JavaObjectHandle) {
        unsafe {
            (self.table().clear_accessible_selection_from_context)(
                selection.vm_id(),
                self.native(selection),
            )
        }
    }

    fn get_accessible_selection(
        &self,
        selection: &JavaObjectHandle,
        index: i32,
    ) -> Option<JavaObjectHandle> {
        let selected = unsafe {
            (self.table().get_accessible_selection_from_context)(
                selection.vm_id(),
                self.native(selection),
                index,
            )
        };
        self.mint_opt(selection.vm_id(), selected)
    }

    fn get_accessible_selection_count(&self, selection: &JavaObjectHandle) -> i32 {
        unsafe {
            (self.table().get_accessible_selection_count_from_context)(
                selection.vm_id(),
                self.native(selection),
            )
        }
    }

    fn is_accessible_child_selected(&self, selection: &JavaObjectHandle, index: i32) -> bool {
        succeeded(unsafe {
            (self.table().is_accessible_child_selected_from_context)(
                selection.vm_id(),
                self.native(selection),
                index,
            )
        })
    }

    fn remove_accessible_selection(&self, selection: &JavaObjectHandle, index: i32) {
        unsafe {
            (self.table().remove_accessible_selection_from_context)(
                selection.vm_id(),
                self.native(selection),
                index,
            )
        }
    }

    fn select_all_accessible_selection(&self, selection: &JavaObjectHandle) {
        unsafe {
            (self.table().select_all_accessible_selection_from_context)(
                selection.vm_id(),
                self.native(selection),
            )
        }
    }

    fn get_visible_children_count(&self, ac: &JavaObjectHandle) -> i32 {
        unsafe { (self.table().get_visible_children_count)(ac.vm_id(), self.native(ac)) }
    }

    fn get_visible_children(
        &self,
        ac: &JavaObjectHandle,
        start_index: i32,
    ) -> DispatchResult<Vec<JavaObjectHandle>> {
        let mut raw = boxed_zeroed::<VisibleChildrenInfoRaw<R>>();
        let ok = unsafe {
            (self.table().get_visible_children)(
                ac.vm_id(),
                self.native(ac),
                start_index,
                &mut *raw,
            )
        };
        if !succeeded(ok) {
            return Err(DispatchError::failure("getVisibleChildren"));
        }
        self.with_ctx(ac.vm_id(), |ctx| marshal::wrap_visible_children(ctx, &raw))
            .map_err(Into::into)
    }

    fn install_event_hook(&self, kind: EventKind) {
        use EventKind as K;
        let t = self.table();
        unsafe {
            match kind {
                K::CaretUpdate => (t.set_caret_update)(Some(context_tramp::<R, { K::CaretUpdate as usize }>)),
                K::FocusGained => (t.set_focus_gained)(Some(context_tramp::<R, { K::FocusGained as usize }>)),
                K::FocusLost => (t.set_focus_lost)(Some(context_tramp::<R, { K::FocusLost as usize }>)),
                K::JavaShutdown => (t.set_java_shutdown)(Some(shutdown_tramp)),
                K::MenuCanceled => (t.set_menu_canceled)(Some(context_tramp::<R, { K::MenuCanceled as usize }>)),
                K::MenuDeselected => (t.set_menu_deselected)(Some(context_tramp::<R, { K::MenuDeselected as usize }>)),
                K::MenuSelected => (t.set_menu_selected)(Some(context_tramp::<R, { K::MenuSelected as usize }>)),
                K::MouseClicked => (t.set_mouse_clicked)(Some(context_tramp::<R, { K::MouseClicked as usize }>)),
                K::MouseEntered => (t.set_mouse_entered)(Some(context_tramp::<R, { K::MouseEntered as usize }>)),
                K::MouseExited => (t.set_mouse_exited)(Some(context_tramp::<R, { K::MouseExited as usize }>)),
                K::MousePressed => (t.set_mouse_pressed)(Some(context_tramp::<R, { K::MousePressed as usize }>)),
                K::MouseReleased => (t.set_mouse_released)(Some(context_tramp::<R, { K::MouseReleased as usize }>)),
                K::PopupMenuCanceled => (t.set_popup_menu_canceled)(Some(context_tramp::<R, { K::PopupMenuCanceled as usize }>)),
                K::PopupMenuWillBecomeInvisible => (t.set_popup_menu_will_become_invisible)(Some(context_tramp::<R, { K::PopupMenuWillBecomeInvisible as usize }>)),
                K::PopupMenuWillBecomeVisible => (t.set_popup_menu_will_become_visible)(Some(context_tramp::<R, { K::PopupMenuWillBecomeVisible as usize }>)),
                K::PropertyActiveDescendentChange => (t.set_property_active_descendent_change)(Some(object_tramp::<R, { K::PropertyActiveDescendentChange as usize }>)),
                K::PropertyCaretChange => (t.set_property_caret_change)(Some(int_tramp::<R, { K::PropertyCaretChange as usize }>)),
                K::PropertyChildChange => (t.set_property_child_change)(Some(object_tramp::<R, { K::PropertyChildChange as usize }>)),
                K::PropertyDescriptionChange => (t.set_property_description_change)(Some(string_tramp::<R, { K::PropertyDescriptionChange as usize }>)),
                K::PropertyNameChange => (t.set_property_name_change)(Some(string_tramp::<R, { K::PropertyNameChange as usize }>)),
                K::PropertySelectionChange => (t.set_property_selection_change)(Some(context_tramp::<R, { K::PropertySelectionChange as usize }>)),
                K::PropertyStateChange => (t.set_property_state_change)(Some(string_tramp::<R, { K::PropertyStateChange as usize }>)),
                K::PropertyTableModelChange => (t.set_property_table_model_change)(Some(string_tramp::<R, { K::PropertyTableModelChange as usize }>)),
                K::PropertyTextChange => (t.set_property_text_change)(Some(context_tramp::<R, { K::PropertyTextChange as usize }>)),
                K::PropertyValueChange => (t.set_property_value_change)(Some(string_tramp::<R, { K::PropertyValueChange as usize }>)),
                K::PropertyVisibleDataChange => (t.set_property_visible_data_change)(Some(context_tramp::<R, { K::PropertyVisibleDataChange as usize }>)),
            }
        }
    }

    fn remove_event_hook(&self, kind: EventKind) {
        use EventKind as K;
        let t = self.table();
        unsafe {
            match kind {
                K::CaretUpdate => (t.set_caret_update)(None),
                K::FocusGained => (t.set_focus_gained)(None),
                K::FocusLost => (t.set_focus_lost)(None),
                K::JavaShutdown => (t.set_java_shutdown)(None),
                K::MenuCanceled => (t.set_menu_canceled)(None),
                K::MenuDeselected => (t.set_menu_deselected)(None),
                K::MenuSelected => (t.set_menu_selected)(None),
                K::MouseClicked => (t.set_mouse_clicked)(None),
                K::MouseEntered => (t.set_mouse_entered)(None),
                K::MouseExited => (t.set_mouse_exited)(None),
                K::MousePressed => (t.set_mouse_pressed)(None),
                K::MouseReleased => (t.set_mouse_released)(None),
                K::PopupMenuCanceled => (t.set_popup_menu_canceled)(None),
                K::PopupMenuWillBecomeInvisible => (t.set_popup_menu_will_become_invisible)(None),
                K::PopupMenuWillBecomeVisible => (t.set_popup_menu_will_become_visible)(None),
                K::PropertyActiveDescendentChange => {
                    (t.set_property_active_descendent_change)(None)
                }
                K::PropertyCaretChange => (t.set_property_caret_change)(None),
                K::PropertyChildChange => (t.set_property_child_change)(None),
                K::PropertyDescriptionChange => (t.set_property_description_change)(None),
                K::PropertyNameChange => (t.set_property_name_change)(None),
                K::PropertySelectionChange => (t.set_property_selection_change)(None),
                K::PropertyStateChange => (t.set_property_state_change)(None),
                K::PropertyTableModelChange => (t.set_property_table_model_change)(None),
                K::PropertyTextChange => (t.set_property_text_change)(None),
                K::PropertyValueChange => (t.set_property_value_change)(None),
                K::PropertyVisibleDataChange => (t.set_property_visible_data_change)(None),
            }
        }
    }
}

// ============================================================================
// Native trampolines
// ============================================================================
//
// One monomorphic instantiation per (kind, width). The provider holds the
// resulting function pointers until the matching setter is called with
// null; the pointed-to code is static, and the hub the trampolines route
// into is retained by the router slot for the registration's lifetime.
// Panics must not unwind into provider frames.

unsafe extern "C" fn context_tramp<R: NativeRef, const K: usize>(vm_id: i32, event: R, source: R) {
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        route_event(
            EventKind::ALL[K],
            vm_id,
            event.to_raw(),
            source.to_raw(),
            RawEventDetail::None,
        );
    }));
}

unsafe extern "C" fn shutdown_tramp(vm_id: i32) {
    let _ = std::panic::catch_unwind(|| {
        route_event(EventKind::JavaShutdown, vm_id, 0, 0, RawEventDetail::None);
    });
}

unsafe extern "C" fn string_tramp<R: NativeRef, const K: usize>(
    vm_id: i32,
    event: R,
    source: R,
    old_value: *const WChar,
    new_value: *const WChar,
) {
    // Decode outside the unwind guard: the raw pointers are only valid
    // for the duration of this callback frame.
    let old_value = decode_wide_ptr(old_value, MAX_STRING_SIZE);
    let new_value = decode_wide_ptr(new_value, MAX_STRING_SIZE);
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        route_event(
            EventKind::ALL[K],
            vm_id,
            event.to_raw(),
            source.to_raw(),
            RawEventDetail::Strings {
                old_value,
                new_value,
            },
        );
    }));
}

unsafe extern "C" fn int_tramp<R: NativeRef, const K: usize>(
    vm_id: i32,
    event: R,
    source: R,
    old_position: JInt,
    new_position: JInt,
) {
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        route_event(
            EventKind::ALL[K],
            vm_id,
            event.to_raw(),
            source.to_raw(),
            RawEventDetail::Ints {
                old_position,
                new_position,
            },
        );
    }));
}

unsafe extern "C" fn object_tramp<R: NativeRef, const K: usize>(
    vm_id: i32,
    event: R,
    source: R,
    old_value: R,
    new_value: R,
) {
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        route_event(
            EventKind::ALL[K],
            vm_id,
            event.to_raw(),
            source.to_raw(),
            RawEventDetail::Objects {
                old_ref: old_value.to_raw(),
                new_ref: new_value.to_raw(),
            },
        );
    }));
}
