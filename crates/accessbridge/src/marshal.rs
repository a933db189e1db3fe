//! Wire-to-host structure marshaling
//!
//! Every provider call's inputs and outputs pass through here. Two rules
//! govern the direction from the wire:
//!
//! 1. The count field is authoritative. Exactly `count` elements are
//!    copied out of a fixed-capacity array — never the full capacity, and
//!    a count larger than the capacity is a provider contract violation
//!    that fails the call instead of reading out of bounds.
//! 2. Embedded references become owned [`JavaObjectHandle`]s tagged with
//!    the enclosing call's VM id, minted eagerly so that an error later in
//!    the same wrap releases them on drop.
//!
//! The host-to-wire direction truncates strings to the fixed buffer and
//! rejects over-capacity batches; truncation at the native boundary is
//! preserved, never silently extended.

use std::sync::Arc;

use accessbridge_sys::refs::NativeRef;
use accessbridge_sys::structs::*;

use crate::error::MarshalError;
use crate::handle::{JavaObjectHandle, ObjectReleaser};
use crate::info::*;

// ============================================================================
// Wide-string codec
// ============================================================================

/// Decode a fixed-width, NUL-terminated UTF-16 buffer.
pub(crate) fn decode_wide(buf: &[WChar]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}

/// Encode into a fixed-width buffer, truncating to capacity minus the
/// terminator and zero-filling the tail.
pub(crate) fn encode_wide(s: &str, buf: &mut [WChar]) {
    let mut i = 0;
    for unit in s.encode_utf16() {
        if i + 1 >= buf.len() {
            break;
        }
        buf[i] = unit;
        i += 1;
    }
    for slot in buf[i..].iter_mut() {
        *slot = 0;
    }
}

/// Decode a NUL-terminated UTF-16 string from a raw callback pointer,
/// scanning at most `max` units. Null pointer decodes to `None`.
///
/// # Safety
///
/// `ptr`, when non-null, must point to a NUL-terminated buffer valid for
/// reads up to the terminator (or `max` units).
pub(crate) unsafe fn decode_wide_ptr(ptr: *const WChar, max: usize) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let mut units = Vec::new();
    for i in 0..max {
        let unit = *ptr.add(i);
        if unit == 0 {
            break;
        }
        units.push(unit);
    }
    Some(String::from_utf16_lossy(&units))
}

// ============================================================================
// Wrap context
// ============================================================================

/// Carries the VM id and releaser a wrap operation mints handles with.
pub(crate) struct WrapCtx<'a> {
    pub vm_id: i32,
    pub releaser: &'a Arc<dyn ObjectReleaser>,
}

impl WrapCtx<'_> {
    fn handle<R: NativeRef>(&self, r: R) -> JavaObjectHandle {
        JavaObjectHandle::wrap(self.vm_id, r.to_raw(), Arc::clone(self.releaser))
    }
}

/// Validate a wire count against the capacity the provider actually
/// populated. Negative counts clamp to zero.
fn checked_count(
    field: &'static str,
    count: JInt,
    capacity: usize,
) -> Result<usize, MarshalError> {
    if count <= 0 {
        return Ok(0);
    }
    let count = count as usize;
    if count > capacity {
        return Err(MarshalError::CountExceedsCapacity {
            field,
            count: count as i64,
            capacity,
        });
    }
    Ok(count)
}

// ============================================================================
// Context, text, version (no embedded references)
// ============================================================================

pub(crate) fn wrap_context_info(raw: &AccessibleContextInfoRaw) -> AccessibleContextInfo {
    AccessibleContextInfo {
        name: decode_wide(&raw.name),
        description: decode_wide(&raw.description),
        role: decode_wide(&raw.role),
        role_en_us: decode_wide(&raw.role_en_us),
        states: decode_wide(&raw.states),
        states_en_us: decode_wide(&raw.states_en_us),
        index_in_parent: raw.index_in_parent,
        children_count: raw.children_count,
        x: raw.x,
        y: raw.y,
        width: raw.width,
        height: raw.height,
        accessible_component: succeeded(raw.accessible_component),
        accessible_action: succeeded(raw.accessible_action),
        accessible_selection: succeeded(raw.accessible_selection),
        accessible_text: succeeded(raw.accessible_text),
        accessible_interfaces: succeeded(raw.accessible_interfaces),
    }
}

pub(crate) fn context_info_to_raw(info: &AccessibleContextInfo) -> AccessibleContextInfoRaw {
    let mut raw = AccessibleContextInfoRaw::zeroed();
    encode_wide(&info.name, &mut raw.name);
    encode_wide(&info.description, &mut raw.description);
    encode_wide(&info.role, &mut raw.role);
    encode_wide(&info.role_en_us, &mut raw.role_en_us);
    encode_wide(&info.states, &mut raw.states);
    encode_wide(&info.states_en_us, &mut raw.states_en_us);
    raw.index_in_parent = info.index_in_parent;
    raw.children_count = info.children_count;
    raw.x = info.x;
    raw.y = info.y;
    raw.width = info.width;
    raw.height = info.height;
    raw.accessible_component = info.accessible_component as Bool;
    raw.accessible_action = info.accessible_action as Bool;
    raw.accessible_selection = info.accessible_selection as Bool;
    raw.accessible_text = info.accessible_text as Bool;
    raw.accessible_interfaces = info.accessible_interfaces as Bool;
    raw
}

pub(crate) fn wrap_text_info(raw: &AccessibleTextInfoRaw) -> AccessibleTextInfo {
    AccessibleTextInfo {
        char_count: raw.char_count,
        caret_index: raw.caret_index,
        index_at_point: raw.index_at_point,
    }
}

pub(crate) fn wrap_text_items(raw: &AccessibleTextItemsInfoRaw) -> AccessibleTextItemsInfo {
    AccessibleTextItemsInfo {
        letter: if raw.letter == 0 {
            None
        } else {
            char::from_u32(u32::from(raw.letter))
        },
        word: decode_wide(&raw.word),
        sentence: decode_wide(&raw.sentence),
    }
}

pub(crate) fn wrap_text_selection(
    raw: &AccessibleTextSelectionInfoRaw,
) -> AccessibleTextSelectionInfo {
    AccessibleTextSelectionInfo {
        selection_start_index: raw.selection_start_index,
        selection_end_index: raw.selection_end_index,
        selected_text: decode_wide(&raw.selected_text),
    }
}

pub(crate) fn wrap_text_rect(raw: &AccessibleTextRectInfoRaw) -> AccessibleTextRect {
    AccessibleTextRect {
        x: raw.x,
        y: raw.y,
        width: raw.width,
        height: raw.height,
    }
}

pub(crate) fn wrap_text_attributes(
    raw: &AccessibleTextAttributesInfoRaw,
) -> AccessibleTextAttributesInfo {
    AccessibleTextAttributesInfo {
        bold: succeeded(raw.bold),
        italic: succeeded(raw.italic),
        underline: succeeded(raw.underline),
        strikethrough: succeeded(raw.strikethrough),
        superscript: succeeded(raw.superscript),
        subscript: succeeded(raw.subscript),
        background_color: decode_wide(&raw.background_color),
        foreground_color: decode_wide(&raw.foreground_color),
        font_family: decode_wide(&raw.font_family),
        font_size: raw.font_size,
        alignment: raw.alignment,
        bidi_level: raw.bidi_level,
        first_line_indent: raw.first_line_indent,
        left_indent: raw.left_indent,
        right_indent: raw.right_indent,
        line_spacing: raw.line_spacing,
        space_above: raw.space_above,
        space_below: raw.space_below,
        full_attributes_string: decode_wide(&raw.full_attributes_string),
    }
}

pub(crate) fn wrap_version_info(raw: &AccessBridgeVersionInfoRaw) -> VersionInfo {
    VersionInfo {
        vm_version: decode_wide(&raw.vm_version),
        bridge_java_class_version: decode_wide(&raw.bridge_java_class_version),
        bridge_java_dll_version: decode_wide(&raw.bridge_java_dll_version),
        bridge_win_dll_version: decode_wide(&raw.bridge_win_dll_version),
    }
}

// ============================================================================
// Reference-bearing structures (recursive wrap)
// ============================================================================

pub(crate) fn wrap_relation_set<R: NativeRef>(
    ctx: &WrapCtx<'_>,
    raw: &AccessibleRelationSetInfoRaw<R>,
) -> Result<AccessibleRelationSet, MarshalError> {
    let relation_count = checked_count("relations", raw.relation_count, MAX_RELATIONS)?;
    let mut relations = Vec::with_capacity(relation_count);
    for relation in &raw.relations[..relation_count] {
        let target_count =
            checked_count("relation targets", relation.target_count, MAX_RELATION_TARGETS)?;
        let targets = relation.targets[..target_count]
            .iter()
            .map(|&r| ctx.handle(r))
            .collect();
        relations.push(AccessibleRelationInfo {
            key: decode_wide(&relation.key),
            targets,
        });
    }
    Ok(AccessibleRelationSet { relations })
}

pub(crate) fn wrap_hypertext<R: NativeRef>(
    ctx: &WrapCtx<'_>,
    raw: &AccessibleHypertextInfoRaw<R>,
) -> Result<AccessibleHypertextInfo, MarshalError> {
    let link_count = checked_count("hyperlinks", raw.link_count, MAX_HYPERLINKS)?;
    let links = raw.links[..link_count]
        .iter()
        .map(|link| AccessibleHyperlinkInfo {
            text: decode_wide(&link.text),
            start_index: link.start_index,
            end_index: link.end_index,
            hyperlink: ctx.handle(link.accessible_hyperlink),
        })
        .collect();
    Ok(AccessibleHypertextInfo {
        links,
        hypertext: ctx.handle(raw.accessible_hypertext),
    })
}

pub(crate) fn wrap_table_info<R: NativeRef>(
    ctx: &WrapCtx<'_>,
    raw: &AccessibleTableInfoRaw<R>,
) -> AccessibleTableInfo {
    AccessibleTableInfo {
        caption: ctx.handle(raw.caption),
        summary: ctx.handle(raw.summary),
        row_count: raw.row_count,
        column_count: raw.column_count,
        context: ctx.handle(raw.accessible_context),
        table: ctx.handle(raw.accessible_table),
    }
}

pub(crate) fn wrap_table_cell<R: NativeRef>(
    ctx: &WrapCtx<'_>,
    raw: &AccessibleTableCellInfoRaw<R>,
) -> AccessibleTableCellInfo {
    AccessibleTableCellInfo {
        context: ctx.handle(raw.accessible_context),
        index: raw.index,
        row: raw.row,
        column: raw.column,
        row_extent: raw.row_extent,
        column_extent: raw.column_extent,
        is_selected: raw.is_selected != 0,
    }
}

pub(crate) fn wrap_visible_children<R: NativeRef>(
    ctx: &WrapCtx<'_>,
    raw: &VisibleChildrenInfoRaw<R>,
) -> Result<Vec<JavaObjectHandle>, MarshalError> {
    let count = checked_count(
        "visible children",
        raw.returned_children_count,
        MAX_VISIBLE_CHILDREN,
    )?;
    Ok(raw.children[..count].iter().map(|&r| ctx.handle(r)).collect())
}

// ============================================================================
// Counted structures without references
// ============================================================================

pub(crate) fn wrap_key_bindings(
    raw: &AccessibleKeyBindingsRaw,
) -> Result<Vec<AccessibleKeyBinding>, MarshalError> {
    let count = checked_count("key bindings", raw.key_bindings_count, MAX_KEY_BINDINGS)?;
    Ok(raw.key_binding_info[..count]
        .iter()
        .map(|b| AccessibleKeyBinding {
            character: b.character,
            modifiers: b.modifiers,
        })
        .collect())
}

pub(crate) fn key_bindings_to_raw(
    bindings: &[AccessibleKeyBinding],
) -> Result<AccessibleKeyBindingsRaw, MarshalError> {
    if bindings.len() > MAX_KEY_BINDINGS {
        return Err(MarshalError::CountExceedsCapacity {
            field: "key bindings",
            count: bindings.len() as i64,
            capacity: MAX_KEY_BINDINGS,
        });
    }
    let mut raw = AccessibleKeyBindingsRaw::zeroed();
    raw.key_bindings_count = bindings.len() as JInt;
    for (slot, binding) in raw.key_binding_info.iter_mut().zip(bindings) {
        slot.character = binding.character;
        slot.modifiers = binding.modifiers;
    }
    Ok(raw)
}

pub(crate) fn wrap_icons(raw: &AccessibleIconsRaw) -> Result<Vec<AccessibleIconInfo>, MarshalError> {
    let count = checked_count("icons", raw.icons_count, MAX_ICON_INFO)?;
    Ok(raw.icon_info[..count]
        .iter()
        .map(|icon| AccessibleIconInfo {
            description: decode_wide(&icon.description),
            height: icon.height,
            width: icon.width,
        })
        .collect())
}

pub(crate) fn wrap_actions(raw: &AccessibleActionsRaw) -> Result<Vec<String>, MarshalError> {
    let count = checked_count("actions", raw.actions_count, MAX_ACTION_INFO)?;
    Ok(raw.action_info[..count]
        .iter()
        .map(|action| decode_wide(&action.name))
        .collect())
}

pub(crate) fn actions_to_do_to_raw(
    actions: &[String],
) -> Result<AccessibleActionsToDoRaw, MarshalError> {
    if actions.len() > MAX_ACTIONS_TO_DO {
        return Err(MarshalError::CountExceedsCapacity {
            field: "actions to do",
            count: actions.len() as i64,
            capacity: MAX_ACTIONS_TO_DO,
        });
    }
    let mut raw = AccessibleActionsToDoRaw::zeroed();
    raw.actions_count = actions.len() as JInt;
    for (slot, action) in raw.actions.iter_mut().zip(actions) {
        encode_wide(action, &mut slot.name);
    }
    Ok(raw)
}

pub(crate) fn actions_to_do_from_raw(
    raw: &AccessibleActionsToDoRaw,
) -> Result<Vec<String>, MarshalError> {
    let count = checked_count("actions to do", raw.actions_count, MAX_ACTIONS_TO_DO)?;
    Ok(raw.actions[..count]
        .iter()
        .map(|action| decode_wide(&action.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessbridge_sys::refs::{JObject64, NativeRef};
    use parking_lot::Mutex;

    struct Ledger {
        releases: Mutex<Vec<u64>>,
    }

    impl ObjectReleaser for Ledger {
        fn release_object(&self, _vm_id: i32, raw: u64) {
            self.releases.lock().push(raw);
        }
    }

    fn ledger() -> Arc<Ledger> {
        Arc::new(Ledger {
            releases: Mutex::new(Vec::new()),
        })
    }

    #[test]
    fn test_wide_codec_round_trip() {
        let mut buf = [0u16; 16];
        encode_wide("push button", &mut buf);
        assert_eq!(decode_wide(&buf), "push button");
    }

    #[test]
    fn test_wide_codec_truncates_preserving_terminator() {
        let mut buf = [0u16; 4];
        encode_wide("label", &mut buf);
        // Three units of payload plus the terminator; truncation is
        // preserved, never extended.
        assert_eq!(decode_wide(&buf), "lab");
    }

    #[test]
    fn test_context_info_round_trip() {
        let info = AccessibleContextInfo {
            name: "OK".to_string(),
            description: "confirm dialog button".to_string(),
            role: "push button".to_string(),
            role_en_us: "push button".to_string(),
            states: "enabled,focusable".to_string(),
            states_en_us: "enabled,focusable".to_string(),
            index_in_parent: 2,
            children_count: 0,
            x: 10,
            y: 20,
            width: 80,
            height: 24,
            accessible_component: true,
            accessible_action: true,
            accessible_selection: false,
            accessible_text: false,
            accessible_interfaces: true,
        };
        assert_eq!(wrap_context_info(&context_info_to_raw(&info)), info);
    }

    #[test]
    fn test_key_bindings_round_trip_at_bounds() {
        for n in [0, 1, MAX_KEY_BINDINGS] {
            let bindings: Vec<_> = (0..n)
                .map(|i| AccessibleKeyBinding {
                    character: b'a' as u16 + i as u16,
                    modifiers: i as i32,
                })
                .collect();
            let raw = key_bindings_to_raw(&bindings).unwrap();
            assert_eq!(wrap_key_bindings(&raw).unwrap(), bindings);
        }
    }

    #[test]
    fn test_actions_to_do_round_trip_at_bounds() {
        for n in [0, 1, MAX_ACTIONS_TO_DO] {
            let actions: Vec<String> = (0..n).map(|i| format!("action-{i}")).collect();
            let raw = actions_to_do_to_raw(&actions).unwrap();
            assert_eq!(actions_to_do_from_raw(&raw).unwrap(), actions);
        }
    }

    #[test]
    fn test_actions_batch_over_capacity_rejected() {
        let actions: Vec<String> = (0..MAX_ACTIONS_TO_DO + 1).map(|i| i.to_string()).collect();
        let err = actions_to_do_to_raw(&actions).unwrap_err();
        assert!(matches!(err, MarshalError::CountExceedsCapacity { .. }));
    }

    #[test]
    fn test_count_is_trusted_over_capacity() {
        let releaser = ledger();
        let releaser_dyn: Arc<dyn ObjectReleaser> = releaser.clone();
        let ctx = WrapCtx {
            vm_id: 1,
            releaser: &releaser_dyn,
        };

        let mut raw = AccessibleRelationSetInfoRaw::<JObject64>::zeroed();
        raw.relation_count = 1;
        raw.relations[0].target_count = 3;
        for (i, target) in raw.relations[0].targets[..5].iter_mut().enumerate() {
            *target = JObject64::from_raw(100 + i as u64);
        }

        // Five populated slots, count of three: exactly three are wrapped.
        let set = wrap_relation_set(&ctx, &raw).unwrap();
        assert_eq!(set.relations.len(), 1);
        assert_eq!(set.relations[0].targets.len(), 3);
    }

    #[test]
    fn test_count_over_capacity_fails_without_oob_read() {
        let releaser = ledger();
        let releaser_dyn: Arc<dyn ObjectReleaser> = releaser.clone();
        let ctx = WrapCtx {
            vm_id: 1,
            releaser: &releaser_dyn,
        };

        let mut raw = AccessibleRelationSetInfoRaw::<JObject64>::zeroed();
        raw.relation_count = (MAX_RELATIONS + 1) as i32;

        let err = wrap_relation_set(&ctx, &raw).unwrap_err();
        assert!(matches!(err, MarshalError::CountExceedsCapacity { .. }));
    }

    #[test]
    fn test_failed_wrap_releases_already_minted_handles() {
        let releaser = ledger();
        let releaser_dyn: Arc<dyn ObjectReleaser> = releaser.clone();
        let ctx = WrapCtx {
            vm_id: 1,
            releaser: &releaser_dyn,
        };

        let mut raw = AccessibleRelationSetInfoRaw::<JObject64>::zeroed();
        raw.relation_count = 2;
        raw.relations[0].target_count = 2;
        raw.relations[0].targets[0] = JObject64::from_raw(11);
        raw.relations[0].targets[1] = JObject64::from_raw(12);
        // Second relation violates the contract after the first minted.
        raw.relations[1].target_count = (MAX_RELATION_TARGETS + 1) as i32;

        assert!(wrap_relation_set(&ctx, &raw).is_err());

        let mut released = releaser.releases.lock().clone();
        released.sort_unstable();
        assert_eq!(released, vec![11, 12]);
    }

    #[test]
    fn test_visible_children_wraps_count_prefix() {
        let releaser = ledger();
        let releaser_dyn: Arc<dyn ObjectReleaser> = releaser.clone();
        let ctx = WrapCtx {
            vm_id: 4,
            releaser: &releaser_dyn,
        };

        let mut raw = VisibleChildrenInfoRaw::<JObject64>::zeroed();
        raw.returned_children_count = 2;
        raw.children[0] = JObject64::from_raw(7);
        raw.children[1] = JObject64::from_raw(8);

        let children = wrap_visible_children(&ctx, &raw).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].vm_id(), 4);
        drop(children);

        let mut released = releaser.releases.lock().clone();
        released.sort_unstable();
        assert_eq!(released, vec![7, 8]);
    }

    #[test]
    fn test_decode_wide_ptr_null_and_terminated() {
        unsafe {
            assert_eq!(decode_wide_ptr(std::ptr::null(), 16), None);

            let buf: Vec<u16> = "old name\0rest".encode_utf16().collect();
            assert_eq!(
                decode_wide_ptr(buf.as_ptr(), buf.len()),
                Some("old name".to_string())
            );
        }
    }

    #[test]
    fn test_negative_count_clamps_to_empty() {
        let mut raw = AccessibleKeyBindingsRaw::zeroed();
        raw.key_bindings_count = -3;
        assert!(wrap_key_bindings(&raw).unwrap().is_empty());
    }
}
