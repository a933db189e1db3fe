//! The resolved provider dispatch table
//!
//! One [`DispatchTable`] per ABI width, built at load time by resolving
//! every required export by exact name. Construction is atomic: the first
//! missing export aborts with [`LoadError::MissingExport`] and no partially
//! usable table ever exists. After construction the table is read-only for
//! the life of the process.

use crate::events::EventKind;
use crate::funcs::*;
use crate::loader::{Library, LoadError};
use crate::refs::NativeRef;

/// Typed function pointers for every provider export, at one ABI width.
pub struct DispatchTable<R: NativeRef> {
    // Bootstrap and window plumbing
    pub windows_run: WindowsRunFn,
    pub is_java_window: IsJavaWindowFn,
    pub get_accessible_context_from_hwnd: GetAccessibleContextFromHwndFn<R>,
    pub get_hwnd_from_accessible_context: GetHwndFromAccessibleContextFn<R>,
    pub get_accessible_context_with_focus: GetAccessibleContextWithFocusFn<R>,

    // Object lifetime and identity
    pub release_java_object: ReleaseJavaObjectFn<R>,
    pub is_same_object: IsSameObjectFn<R>,

    // Context navigation and description
    pub get_accessible_context_info: GetAccessibleContextInfoFn<R>,
    pub get_accessible_child_from_context: GetAccessibleChildFromContextFn<R>,
    pub get_accessible_parent_from_context: GetAccessibleParentFromContextFn<R>,
    pub get_accessible_context_at: GetAccessibleContextAtFn<R>,
    pub request_focus: RequestFocusFn<R>,
    pub get_version_info: GetVersionInfoFn,

    // Relations, hypertext, bindings, icons, actions
    pub get_accessible_relation_set: GetAccessibleRelationSetFn<R>,
    pub get_accessible_hypertext: GetAccessibleHypertextFn<R>,
    pub get_accessible_key_bindings: GetAccessibleKeyBindingsFn<R>,
    pub get_accessible_icons: GetAccessibleIconsFn<R>,
    pub get_accessible_actions: GetAccessibleActionsFn<R>,
    pub do_accessible_actions: DoAccessibleActionsFn<R>,

    // Text
    pub get_accessible_text_info: GetAccessibleTextInfoFn<R>,
    pub get_accessible_text_items: GetAccessibleTextItemsFn<R>,
    pub get_accessible_text_selection_info: GetAccessibleTextSelectionInfoFn<R>,
    pub get_accessible_text_attributes: GetAccessibleTextAttributesFn<R>,
    pub get_accessible_text_rect: GetAccessibleTextRectFn<R>,
    pub get_accessible_text_line_bounds: GetAccessibleTextLineBoundsFn<R>,
    pub get_accessible_text_range: GetAccessibleTextRangeFn<R>,
    pub set_text_contents: SetTextContentsFn<R>,

    // Tables
    pub get_accessible_table_info: GetAccessibleTableInfoFn<R>,
    pub get_accessible_table_cell_info: GetAccessibleTableCellInfoFn<R>,
    pub get_accessible_table_row_header: GetAccessibleTableHeaderFn<R>,
    pub get_accessible_table_column_header: GetAccessibleTableHeaderFn<R>,

    // Selections
    pub add_accessible_selection_from_context: AddAccessibleSelectionFromContextFn<R>,
    pub clear_accessible_selection_from_context: ClearAccessibleSelectionFromContextFn<R>,
    pub get_accessible_selection_from_context: GetAccessibleSelectionFromContextFn<R>,
    pub get_accessible_selection_count_from_context: GetAccessibleSelectionCountFromContextFn<R>,
    pub is_accessible_child_selected_from_context: IsAccessibleChildSelectedFromContextFn<R>,
    pub remove_accessible_selection_from_context: RemoveAccessibleSelectionFromContextFn<R>,
    pub select_all_accessible_selection_from_context: SelectAllAccessibleSelectionFromContextFn<R>,

    // Visible children
    pub get_visible_children_count: GetVisibleChildrenCountFn<R>,
    pub get_visible_children: GetVisibleChildrenFn<R>,

    // Event callback setters, one per kind. Resolved through the
    // kind/symbol rule table in `events`.
    pub set_caret_update: SetContextEventFn<R>,
    pub set_focus_gained: SetContextEventFn<R>,
    pub set_focus_lost: SetContextEventFn<R>,
    pub set_java_shutdown: SetJavaShutdownFn,
    pub set_menu_canceled: SetContextEventFn<R>,
    pub set_menu_deselected: SetContextEventFn<R>,
    pub set_menu_selected: SetContextEventFn<R>,
    pub set_mouse_clicked: SetContextEventFn<R>,
    pub set_mouse_entered: SetContextEventFn<R>,
    pub set_mouse_exited: SetContextEventFn<R>,
    pub set_mouse_pressed: SetContextEventFn<R>,
    pub set_mouse_released: SetContextEventFn<R>,
    pub set_popup_menu_canceled: SetContextEventFn<R>,
    pub set_popup_menu_will_become_invisible: SetContextEventFn<R>,
    pub set_popup_menu_will_become_visible: SetContextEventFn<R>,
    pub set_property_active_descendent_change: SetPropertyObjectChangeFn<R>,
    pub set_property_caret_change: SetPropertyIntChangeFn<R>,
    pub set_property_child_change: SetPropertyObjectChangeFn<R>,
    pub set_property_description_change: SetPropertyStringChangeFn<R>,
    pub set_property_name_change: SetPropertyStringChangeFn<R>,
    pub set_property_selection_change: SetContextEventFn<R>,
    pub set_property_state_change: SetPropertyStringChangeFn<R>,
    pub set_property_table_model_change: SetPropertyStringChangeFn<R>,
    pub set_property_text_change: SetContextEventFn<R>,
    pub set_property_value_change: SetPropertyStringChangeFn<R>,
    pub set_property_visible_data_change: SetContextEventFn<R>,
}

impl<R: NativeRef> DispatchTable<R> {
    /// Resolve every export from the loaded provider library.
    ///
    /// Fails with the first [`LoadError::MissingExport`]; a table is either
    /// complete or absent.
    pub fn load(lib: &Library) -> Result<Self, LoadError> {
        use EventKind as K;

        let setter = |kind: EventKind| kind.setter_symbol();

        // SAFETY: each symbol is resolved against the signature the
        // provider documents for it; the table is only used while the
        // library stays loaded (both are owned by the same client).
        unsafe {
            Ok(DispatchTable {
                windows_run: lib.get("Windows_run")?,
                is_java_window: lib.get("isJavaWindow")?,
                get_accessible_context_from_hwnd: lib.get("getAccessibleContextFromHWND")?,
                get_hwnd_from_accessible_context: lib.get("getHWNDFromAccessibleContext")?,
                get_accessible_context_with_focus: lib.get("getAccessibleContextWithFocus")?,

                release_java_object: lib.get("releaseJavaObject")?,
                is_same_object: lib.get("isSameObject")?,

                get_accessible_context_info: lib.get("getAccessibleContextInfo")?,
                get_accessible_child_from_context: lib.get("getAccessibleChildFromContext")?,
                get_accessible_parent_from_context: lib.get("getAccessibleParentFromContext")?,
                get_accessible_context_at: lib.get("getAccessibleContextAt")?,
                request_focus: lib.get("requestFocus")?,
                get_version_info: lib.get("getVersionInfo")?,

                get_accessible_relation_set: lib.get("getAccessibleRelationSet")?,
                get_accessible_hypertext: lib.get("getAccessibleHypertext")?,
                get_accessible_key_bindings: lib.get("getAccessibleKeyBindings")?,
                get_accessible_icons: lib.get("getAccessibleIcons")?,
                get_accessible_actions: lib.get("getAccessibleActions")?,
                do_accessible_actions: lib.get("doAccessibleActions")?,

                get_accessible_text_info: lib.get("getAccessibleTextInfo")?,
                get_accessible_text_items: lib.get("getAccessibleTextItems")?,
                get_accessible_text_selection_info: lib.get("getAccessibleTextSelectionInfo")?,
                get_accessible_text_attributes: lib.get("getAccessibleTextAttributes")?,
                get_accessible_text_rect: lib.get("getAccessibleTextRect")?,
                get_accessible_text_line_bounds: lib.get("getAccessibleTextLineBounds")?,
                get_accessible_text_range: lib.get("getAccessibleTextRange")?,
                set_text_contents: lib.get("setTextContents")?,

                get_accessible_table_info: lib.get("getAccessibleTableInfo")?,
                get_accessible_table_cell_info: lib.get("getAccessibleTableCellInfo")?,
                get_accessible_table_row_header: lib.get("getAccessibleTableRowHeader")?,
                get_accessible_table_column_header: lib.get("getAccessibleTableColumnHeader")?,

                add_accessible_selection_from_context: lib
                    .get("addAccessibleSelectionFromContext")?,
                clear_accessible_selection_from_context: lib
                    .get("clearAccessibleSelectionFromContext")?,
                get_accessible_selection_from_context: lib
                    .get("getAccessibleSelectionFromContext")?,
                get_accessible_selection_count_from_context: lib
                    .get("getAccessibleSelectionCountFromContext")?,
                is_accessible_child_selected_from_context: lib
                    .get("isAccessibleChildSelectedFromContext")?,
                remove_accessible_selection_from_context: lib
                    .get("removeAccessibleSelectionFromContext")?,
                select_all_accessible_selection_from_context: lib
                    .get("selectAllAccessibleSelectionFromContext")?,

                get_visible_children_count: lib.get("getVisibleChildrenCount")?,
                get_visible_children: lib.get("getVisibleChildren")?,

                set_caret_update: lib.get(&setter(K::CaretUpdate))?,
                set_focus_gained: lib.get(&setter(K::FocusGained))?,
                set_focus_lost: lib.get(&setter(K::FocusLost))?,
                set_java_shutdown: lib.get(&setter(K::JavaShutdown))?,
                set_menu_canceled: lib.get(&setter(K::MenuCanceled))?,
                set_menu_deselected: lib.get(&setter(K::MenuDeselected))?,
                set_menu_selected: lib.get(&setter(K::MenuSelected))?,
                set_mouse_clicked: lib.get(&setter(K::MouseClicked))?,
                set_mouse_entered: lib.get(&setter(K::MouseEntered))?,
                set_mouse_exited: lib.get(&setter(K::MouseExited))?,
                set_mouse_pressed: lib.get(&setter(K::MousePressed))?,
                set_mouse_released: lib.get(&setter(K::MouseReleased))?,
                set_popup_menu_canceled: lib.get(&setter(K::PopupMenuCanceled))?,
                set_popup_menu_will_become_invisible: lib
                    .get(&setter(K::PopupMenuWillBecomeInvisible))?,
                set_popup_menu_will_become_visible: lib
                    .get(&setter(K::PopupMenuWillBecomeVisible))?,
                set_property_active_descendent_change: lib
                    .get(&setter(K::PropertyActiveDescendentChange))?,
                set_property_caret_change: lib.get(&setter(K::PropertyCaretChange))?,
                set_property_child_change: lib.get(&setter(K::PropertyChildChange))?,
                set_property_description_change: lib.get(&setter(K::PropertyDescriptionChange))?,
                set_property_name_change: lib.get(&setter(K::PropertyNameChange))?,
                set_property_selection_change: lib.get(&setter(K::PropertySelectionChange))?,
                set_property_state_change: lib.get(&setter(K::PropertyStateChange))?,
                set_property_table_model_change: lib.get(&setter(K::PropertyTableModelChange))?,
                set_property_text_change: lib.get(&setter(K::PropertyTextChange))?,
                set_property_value_change: lib.get(&setter(K::PropertyValueChange))?,
                set_property_visible_data_change: lib.get(&setter(K::PropertyVisibleDataChange))?,
            })
        }
    }
}
