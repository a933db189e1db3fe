//! Fixed-capacity wire structures of the provider ABI
//!
//! Every structure here mirrors the provider's C layout field for field.
//! Structures that embed object references are generic over [`NativeRef`]
//! and exist in two monomorphic forms, one per ABI width; all others are
//! width-independent. String fields are fixed-width, NUL-terminated UTF-16
//! buffers; array fields carry an accompanying count that is authoritative
//! over the declared capacity.
//!
//! These types are plain data. Interpretation (count-trusted truncation,
//! reference wrapping) lives in the host crate's marshaling layer.

use crate::refs::NativeRef;

/// Width of the long string buffers (name, description, sentences, ...)
pub const MAX_STRING_SIZE: usize = 1024;
/// Width of the short string buffers (role, states, words, ...)
pub const SHORT_STRING_SIZE: usize = 256;
/// Capacity of a relation set
pub const MAX_RELATIONS: usize = 5;
/// Capacity of one relation's target list
pub const MAX_RELATION_TARGETS: usize = 25;
/// Capacity of a hypertext block's link list
pub const MAX_HYPERLINKS: usize = 64;
/// Capacity of a key-binding list
pub const MAX_KEY_BINDINGS: usize = 10;
/// Capacity of an icon list
pub const MAX_ICON_INFO: usize = 8;
/// Capacity of an action list
pub const MAX_ACTION_INFO: usize = 256;
/// Capacity of an action-request batch
pub const MAX_ACTIONS_TO_DO: usize = 32;
/// Capacity of a visible-children response
pub const MAX_VISIBLE_CHILDREN: usize = 256;

/// Provider wide character (UTF-16 code unit)
pub type WChar = u16;
/// Provider 32-bit integer
pub type JInt = i32;
/// Provider 32-bit float
pub type JFloat = f32;
/// Provider C boolean: 0 = false/failure, nonzero = true/success
pub type Bool = i32;
/// Provider single-byte boolean (used by table cells)
pub type JByteBool = u8;

/// The one place the provider's C boolean convention is interpreted.
#[inline]
pub fn succeeded(code: Bool) -> bool {
    code != 0
}

/// Per-context description block: identity strings, geometry, and
/// capability flags.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleContextInfoRaw {
    pub name: [WChar; MAX_STRING_SIZE],
    pub description: [WChar; MAX_STRING_SIZE],
    pub role: [WChar; SHORT_STRING_SIZE],
    pub role_en_us: [WChar; SHORT_STRING_SIZE],
    pub states: [WChar; SHORT_STRING_SIZE],
    pub states_en_us: [WChar; SHORT_STRING_SIZE],
    pub index_in_parent: JInt,
    pub children_count: JInt,
    pub x: JInt,
    pub y: JInt,
    pub width: JInt,
    pub height: JInt,
    pub accessible_component: Bool,
    pub accessible_action: Bool,
    pub accessible_selection: Bool,
    pub accessible_text: Bool,
    pub accessible_interfaces: Bool,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleTextInfoRaw {
    pub char_count: JInt,
    pub caret_index: JInt,
    pub index_at_point: JInt,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleTextItemsInfoRaw {
    pub letter: WChar,
    pub word: [WChar; SHORT_STRING_SIZE],
    pub sentence: [WChar; MAX_STRING_SIZE],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleTextSelectionInfoRaw {
    pub selection_start_index: JInt,
    pub selection_end_index: JInt,
    pub selected_text: [WChar; MAX_STRING_SIZE],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessibleTextRectInfoRaw {
    pub x: JInt,
    pub y: JInt,
    pub width: JInt,
    pub height: JInt,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleTextAttributesInfoRaw {
    pub bold: Bool,
    pub italic: Bool,
    pub underline: Bool,
    pub strikethrough: Bool,
    pub superscript: Bool,
    pub subscript: Bool,
    pub background_color: [WChar; SHORT_STRING_SIZE],
    pub foreground_color: [WChar; SHORT_STRING_SIZE],
    pub font_family: [WChar; SHORT_STRING_SIZE],
    pub font_size: JInt,
    pub alignment: JInt,
    pub bidi_level: JInt,
    pub first_line_indent: JFloat,
    pub left_indent: JFloat,
    pub right_indent: JFloat,
    pub line_spacing: JFloat,
    pub space_above: JFloat,
    pub space_below: JFloat,
    pub full_attributes_string: [WChar; MAX_STRING_SIZE],
}

/// One relation: a key plus up to [`MAX_RELATION_TARGETS`] target
/// references. `target_count` is authoritative.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleRelationInfoRaw<R: NativeRef> {
    pub key: [WChar; SHORT_STRING_SIZE],
    pub target_count: JInt,
    pub targets: [R; MAX_RELATION_TARGETS],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleRelationSetInfoRaw<R: NativeRef> {
    pub relation_count: JInt,
    pub relations: [AccessibleRelationInfoRaw<R>; MAX_RELATIONS],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleHyperlinkInfoRaw<R: NativeRef> {
    pub text: [WChar; MAX_STRING_SIZE],
    pub start_index: JInt,
    pub end_index: JInt,
    pub accessible_hyperlink: R,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleHypertextInfoRaw<R: NativeRef> {
    pub link_count: JInt,
    pub links: [AccessibleHyperlinkInfoRaw<R>; MAX_HYPERLINKS],
    pub accessible_hypertext: R,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessibleKeyBindingInfoRaw {
    pub character: WChar,
    pub modifiers: JInt,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleKeyBindingsRaw {
    pub key_bindings_count: JInt,
    pub key_binding_info: [AccessibleKeyBindingInfoRaw; MAX_KEY_BINDINGS],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleIconInfoRaw {
    pub description: [WChar; MAX_STRING_SIZE],
    pub height: JInt,
    pub width: JInt,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleIconsRaw {
    pub icons_count: JInt,
    pub icon_info: [AccessibleIconInfoRaw; MAX_ICON_INFO],
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct AccessibleActionInfoRaw {
    pub name: [WChar; SHORT_STRING_SIZE],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleActionsRaw {
    pub actions_count: JInt,
    pub action_info: [AccessibleActionInfoRaw; MAX_ACTION_INFO],
}

/// Host-to-provider action batch. The one wire structure that travels in
/// the unwrap direction.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct AccessibleActionsToDoRaw {
    pub actions_count: JInt,
    pub actions: [AccessibleActionInfoRaw; MAX_ACTIONS_TO_DO],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleTableInfoRaw<R: NativeRef> {
    pub caption: R,
    pub summary: R,
    pub row_count: JInt,
    pub column_count: JInt,
    pub accessible_context: R,
    pub accessible_table: R,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessibleTableCellInfoRaw<R: NativeRef> {
    pub accessible_context: R,
    pub index: JInt,
    pub row: JInt,
    pub column: JInt,
    pub row_extent: JInt,
    pub column_extent: JInt,
    pub is_selected: JByteBool,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct VisibleChildrenInfoRaw<R: NativeRef> {
    pub returned_children_count: JInt,
    pub children: [R; MAX_VISIBLE_CHILDREN],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct AccessBridgeVersionInfoRaw {
    pub vm_version: [WChar; SHORT_STRING_SIZE],
    pub bridge_java_class_version: [WChar; SHORT_STRING_SIZE],
    pub bridge_java_dll_version: [WChar; SHORT_STRING_SIZE],
    pub bridge_win_dll_version: [WChar; SHORT_STRING_SIZE],
}

macro_rules! impl_zeroed {
    ($($ty:ident $(<$p:ident>)?),+ $(,)?) => {
        $(
            impl $(<$p: NativeRef>)? $ty $(<$p>)? {
                /// An all-zero value, used as the out-parameter the provider
                /// fills in. Valid: every field is an integer, float, or
                /// fixed array thereof, and zero is the null reference.
                pub fn zeroed() -> Self {
                    unsafe { std::mem::zeroed() }
                }
            }
        )+
    };
}

impl_zeroed!(
    AccessibleContextInfoRaw,
    AccessibleTextInfoRaw,
    AccessibleTextItemsInfoRaw,
    AccessibleTextSelectionInfoRaw,
    AccessibleTextRectInfoRaw,
    AccessibleTextAttributesInfoRaw,
    AccessibleRelationSetInfoRaw<R>,
    AccessibleHypertextInfoRaw<R>,
    AccessibleKeyBindingsRaw,
    AccessibleIconsRaw,
    AccessibleActionsRaw,
    AccessibleActionsToDoRaw,
    AccessibleTableInfoRaw<R>,
    AccessibleTableCellInfoRaw<R>,
    VisibleChildrenInfoRaw<R>,
    AccessBridgeVersionInfoRaw,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::{JObject32, JObject64, NativeRef};
    use std::mem::size_of;

    #[test]
    fn test_ref_width_drives_struct_size() {
        // The two monomorphic forms differ exactly by embedded reference
        // width; everything else is shared.
        let narrow = size_of::<AccessibleTableInfoRaw<JObject32>>();
        let wide = size_of::<AccessibleTableInfoRaw<JObject64>>();
        assert!(wide > narrow);

        // Width-independent structs have a single layout.
        assert_eq!(size_of::<AccessibleTextInfoRaw>(), 12);
        assert_eq!(
            size_of::<AccessibleKeyBindingInfoRaw>(),
            size_of::<WChar>() + 2 + size_of::<JInt>()
        );
    }

    #[test]
    fn test_zeroed_is_null_and_empty() {
        let info = AccessibleRelationSetInfoRaw::<JObject64>::zeroed();
        assert_eq!(info.relation_count, 0);
        assert!(info.relations[0].targets[0].is_null());

        let table = AccessibleTableInfoRaw::<JObject32>::zeroed();
        assert!(table.caption.is_null());
        assert!(table.accessible_table.is_null());
    }

    #[test]
    fn test_succeeded_predicate() {
        assert!(!succeeded(0));
        assert!(succeeded(1));
        assert!(succeeded(-1));
    }
}
