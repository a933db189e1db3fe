//! C function-pointer signatures of the provider exports
//!
//! One alias per export family, generic over the object-reference width
//! where references appear in the signature. The provider uses the cdecl
//! convention throughout; `vm_id` routes every call to the owning virtual
//! machine instance.

use crate::refs::{Hwnd, NativeRef};
use crate::structs::*;

// ============================================================================
// Bootstrap and window plumbing
// ============================================================================

pub type WindowsRunFn = unsafe extern "C" fn();

pub type IsJavaWindowFn = unsafe extern "C" fn(window: Hwnd) -> Bool;

pub type GetAccessibleContextFromHwndFn<R> =
    unsafe extern "C" fn(window: Hwnd, vm_id: *mut i32, ac: *mut R) -> Bool;

pub type GetHwndFromAccessibleContextFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R) -> Hwnd;

pub type GetAccessibleContextWithFocusFn<R> =
    unsafe extern "C" fn(window: Hwnd, vm_id: *mut i32, ac: *mut R) -> Bool;

// ============================================================================
// Object lifetime and identity
// ============================================================================

pub type ReleaseJavaObjectFn<R> = unsafe extern "C" fn(vm_id: i32, object: R);

pub type IsSameObjectFn<R> = unsafe extern "C" fn(vm_id: i32, obj1: R, obj2: R) -> Bool;

// ============================================================================
// Context navigation and description
// ============================================================================

pub type GetAccessibleContextInfoFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, info: *mut AccessibleContextInfoRaw) -> Bool;

pub type GetAccessibleChildFromContextFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, index: JInt) -> R;

pub type GetAccessibleParentFromContextFn<R> = unsafe extern "C" fn(vm_id: i32, ac: R) -> R;

pub type GetAccessibleContextAtFn<R> =
    unsafe extern "C" fn(vm_id: i32, parent: R, x: JInt, y: JInt, ac: *mut R) -> Bool;

pub type RequestFocusFn<R> = unsafe extern "C" fn(vm_id: i32, ac: R) -> Bool;

pub type GetVersionInfoFn =
    unsafe extern "C" fn(vm_id: i32, info: *mut AccessBridgeVersionInfoRaw) -> Bool;

// ============================================================================
// Relations, hypertext, bindings, icons, actions
// ============================================================================

pub type GetAccessibleRelationSetFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, set: *mut AccessibleRelationSetInfoRaw<R>) -> Bool;

pub type GetAccessibleHypertextFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, hypertext: *mut AccessibleHypertextInfoRaw<R>) -> Bool;

pub type GetAccessibleKeyBindingsFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, bindings: *mut AccessibleKeyBindingsRaw) -> Bool;

pub type GetAccessibleIconsFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, icons: *mut AccessibleIconsRaw) -> Bool;

pub type GetAccessibleActionsFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, actions: *mut AccessibleActionsRaw) -> Bool;

pub type DoAccessibleActionsFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    ac: R,
    actions: *const AccessibleActionsToDoRaw,
    failure_index: *mut JInt,
) -> Bool;

// ============================================================================
// Text
// ============================================================================

pub type GetAccessibleTextInfoFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    at: R,
    info: *mut AccessibleTextInfoRaw,
    x: JInt,
    y: JInt,
) -> Bool;

pub type GetAccessibleTextItemsFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    at: R,
    items: *mut AccessibleTextItemsInfoRaw,
    index: JInt,
) -> Bool;

pub type GetAccessibleTextSelectionInfoFn<R> =
    unsafe extern "C" fn(vm_id: i32, at: R, info: *mut AccessibleTextSelectionInfoRaw) -> Bool;

pub type GetAccessibleTextAttributesFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    at: R,
    index: JInt,
    attributes: *mut AccessibleTextAttributesInfoRaw,
) -> Bool;

pub type GetAccessibleTextRectFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    at: R,
    rect: *mut AccessibleTextRectInfoRaw,
    index: JInt,
) -> Bool;

pub type GetAccessibleTextLineBoundsFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    at: R,
    index: JInt,
    start_index: *mut JInt,
    end_index: *mut JInt,
) -> Bool;

pub type GetAccessibleTextRangeFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    at: R,
    start: JInt,
    end: JInt,
    text: *mut WChar,
    len: i16,
) -> Bool;

pub type SetTextContentsFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, text: *const WChar) -> Bool;

// ============================================================================
// Tables
// ============================================================================

pub type GetAccessibleTableInfoFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, table: *mut AccessibleTableInfoRaw<R>) -> Bool;

pub type GetAccessibleTableCellInfoFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    table: R,
    row: JInt,
    column: JInt,
    cell: *mut AccessibleTableCellInfoRaw<R>,
) -> Bool;

pub type GetAccessibleTableHeaderFn<R> =
    unsafe extern "C" fn(vm_id: i32, ac: R, table: *mut AccessibleTableInfoRaw<R>) -> Bool;

// ============================================================================
// Selections
// ============================================================================

pub type AddAccessibleSelectionFromContextFn<R> =
    unsafe extern "C" fn(vm_id: i32, selection: R, index: JInt);

pub type ClearAccessibleSelectionFromContextFn<R> =
    unsafe extern "C" fn(vm_id: i32, selection: R);

pub type GetAccessibleSelectionFromContextFn<R> =
    unsafe extern "C" fn(vm_id: i32, selection: R, index: JInt) -> R;

pub type GetAccessibleSelectionCountFromContextFn<R> =
    unsafe extern "C" fn(vm_id: i32, selection: R) -> JInt;

pub type IsAccessibleChildSelectedFromContextFn<R> =
    unsafe extern "C" fn(vm_id: i32, selection: R, index: JInt) -> Bool;

pub type RemoveAccessibleSelectionFromContextFn<R> =
    unsafe extern "C" fn(vm_id: i32, selection: R, index: JInt);

pub type SelectAllAccessibleSelectionFromContextFn<R> =
    unsafe extern "C" fn(vm_id: i32, selection: R);

// ============================================================================
// Visible children
// ============================================================================

pub type GetVisibleChildrenCountFn<R> = unsafe extern "C" fn(vm_id: i32, ac: R) -> JInt;

pub type GetVisibleChildrenFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    ac: R,
    start_index: JInt,
    children: *mut VisibleChildrenInfoRaw<R>,
) -> Bool;

// ============================================================================
// Event callbacks and their setters
// ============================================================================

/// Callback for the `(vm, event, source)` kinds (focus, caret, mouse,
/// menu, and the payload-less property kinds).
pub type ContextEventFn<R> = unsafe extern "C" fn(vm_id: i32, event: R, source: R);

/// Callback for virtual machine shutdown.
pub type JavaShutdownFn = unsafe extern "C" fn(vm_id: i32);

/// Callback for property changes reporting old/new strings.
pub type PropertyStringChangeFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    event: R,
    source: R,
    old_value: *const WChar,
    new_value: *const WChar,
);

/// Callback for the caret-position property change.
pub type PropertyIntChangeFn<R> = unsafe extern "C" fn(
    vm_id: i32,
    event: R,
    source: R,
    old_position: JInt,
    new_position: JInt,
);

/// Callback for property changes reporting old/new object references.
pub type PropertyObjectChangeFn<R> =
    unsafe extern "C" fn(vm_id: i32, event: R, source: R, old_value: R, new_value: R);

// `Option<fn>` is FFI-safe; `None` is the null pointer the provider
// interprets as "unregister".
pub type SetContextEventFn<R> = unsafe extern "C" fn(callback: Option<ContextEventFn<R>>);
pub type SetJavaShutdownFn = unsafe extern "C" fn(callback: Option<JavaShutdownFn>);
pub type SetPropertyStringChangeFn<R> =
    unsafe extern "C" fn(callback: Option<PropertyStringChangeFn<R>>);
pub type SetPropertyIntChangeFn<R> =
    unsafe extern "C" fn(callback: Option<PropertyIntChangeFn<R>>);
pub type SetPropertyObjectChangeFn<R> =
    unsafe extern "C" fn(callback: Option<PropertyObjectChangeFn<R>>);
