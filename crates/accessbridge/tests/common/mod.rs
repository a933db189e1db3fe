//! In-memory provider emulation for integration tests
//!
//! `MockProvider` implements the full dispatch surface over a small
//! object graph, with per-call fault injection and a mint/release ledger
//! so tests can assert that every reference handed out is released
//! exactly once.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use accessbridge::{
    AbiVariant, AccessBridgeApi, AccessibleContextInfo, AccessibleHypertextInfo,
    AccessibleIconInfo, AccessibleKeyBinding, AccessibleRelationSet, AccessibleTableCellInfo,
    AccessibleTableInfo, AccessibleTextAttributesInfo, AccessibleTextInfo,
    AccessibleTextItemsInfo, AccessibleTextRect, AccessibleTextSelectionInfo, DispatchError,
    DispatchResult, EventKind, Hwnd, JavaObjectHandle, ObjectReleaser, VersionInfo,
};

/// Mint/release bookkeeping shared by every handle the mock hands out.
#[derive(Default)]
pub struct Ledger {
    pub mints: Mutex<HashMap<u64, u32>>,
    pub releases: Mutex<HashMap<u64, u32>>,
}

impl ObjectReleaser for Ledger {
    fn release_object(&self, _vm_id: i32, raw: u64) {
        *self.releases.lock().entry(raw).or_insert(0) += 1;
    }
}

impl Ledger {
    /// Every minted reference released exactly once, nothing released
    /// that was never minted.
    pub fn assert_balanced(&self) {
        let mints = self.mints.lock();
        let releases = self.releases.lock();
        for (raw, minted) in mints.iter() {
            let released = releases.get(raw).copied().unwrap_or(0);
            assert_eq!(
                *minted, released,
                "reference {raw:#x}: {minted} mints vs {released} releases"
            );
        }
        for raw in releases.keys() {
            assert!(
                mints.contains_key(raw),
                "reference {raw:#x} released but never minted"
            );
        }
    }

    pub fn release_count(&self, raw: u64) -> u32 {
        self.releases.lock().get(&raw).copied().unwrap_or(0)
    }
}

#[derive(Clone, Default)]
pub struct MockObject {
    pub name: String,
    pub role: String,
    pub parent: Option<u64>,
    pub children: Vec<u64>,
    /// `(x, y, width, height)` on screen
    pub bounds: (i32, i32, i32, i32),
}

#[derive(Default)]
struct MockState {
    objects: HashMap<u64, MockObject>,
    /// hwnd -> (vm id, root object)
    windows: HashMap<isize, (i32, u64)>,
    /// provider exports that currently fail
    failing: HashSet<&'static str>,
    /// `(kind, installed)` transitions, in order
    hook_log: Vec<(EventKind, bool)>,
    /// `(rows, cols, table object)` per object with a table
    tables: HashMap<u64, (i32, i32, u64)>,
    /// batch size for visible-children responses
    visible_batch: usize,
}

pub struct MockProvider {
    state: Mutex<MockState>,
    pub ledger: Arc<Ledger>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(MockProvider {
            state: Mutex::new(MockState {
                visible_batch: 3,
                ..MockState::default()
            }),
            ledger: Arc::new(Ledger::default()),
        })
    }

    pub fn add_object(&self, raw: u64, object: MockObject) {
        self.state.lock().objects.insert(raw, object);
    }

    pub fn add_window(&self, hwnd: isize, vm_id: i32, root: u64) {
        self.state.lock().windows.insert(hwnd, (vm_id, root));
    }

    pub fn add_table(&self, object: u64, rows: i32, cols: i32, table_raw: u64) {
        self.state.lock().tables.insert(object, (rows, cols, table_raw));
    }

    pub fn fail(&self, call: &'static str) {
        self.state.lock().failing.insert(call);
    }

    pub fn unfail(&self, call: &'static str) {
        self.state.lock().failing.remove(call);
    }

    pub fn set_object_name(&self, raw: u64, name: &str) {
        if let Some(object) = self.state.lock().objects.get_mut(&raw) {
            object.name = name.to_string();
        }
    }

    pub fn hook_log(&self) -> Vec<(EventKind, bool)> {
        self.state.lock().hook_log.clone()
    }

    pub fn mint_count(&self, raw: u64) -> u32 {
        self.ledger.mints.lock().get(&raw).copied().unwrap_or(0)
    }

    fn check(&self, call: &'static str) -> DispatchResult<()> {
        if self.state.lock().failing.contains(call) {
            Err(DispatchError::Failure { call })
        } else {
            Ok(())
        }
    }

    fn mint(&self, vm_id: i32, raw: u64) -> JavaObjectHandle {
        if raw != 0 {
            *self.ledger.mints.lock().entry(raw).or_insert(0) += 1;
        }
        let releaser: Arc<dyn ObjectReleaser> = self.ledger.clone();
        JavaObjectHandle::wrap(vm_id, raw, releaser)
    }

    /// Deepest object under the point, depth-first from `from`.
    fn object_at(&self, from: u64, x: i32, y: i32) -> Option<u64> {
        let state = self.state.lock();
        fn contains(bounds: (i32, i32, i32, i32), x: i32, y: i32) -> bool {
            x >= bounds.0 && x < bounds.0 + bounds.2 && y >= bounds.1 && y < bounds.1 + bounds.3
        }
        fn descend(state: &MockState, raw: u64, x: i32, y: i32) -> Option<u64> {
            let object = state.objects.get(&raw)?;
            if !contains(object.bounds, x, y) {
                return None;
            }
            for &child in &object.children {
                if let Some(hit) = descend(state, child, x, y) {
                    return Some(hit);
                }
            }
            Some(raw)
        }
        descend(&state, from, x, y)
    }
}

impl AccessBridgeApi for MockProvider {
    fn variant(&self) -> AbiVariant {
        AbiVariant::Current64
    }

    fn wrap_foreign(&self, vm_id: i32, raw: u64) -> JavaObjectHandle {
        self.mint(vm_id, raw)
    }

    fn is_java_window(&self, window: Hwnd) -> bool {
        self.state.lock().windows.contains_key(&window.0)
    }

    fn get_accessible_context_from_hwnd(
        &self,
        window: Hwnd,
    ) -> DispatchResult<(i32, JavaObjectHandle)> {
        self.check("getAccessibleContextFromHWND")?;
        let (vm_id, root) = *self
            .state
            .lock()
            .windows
            .get(&window.0)
            .ok_or(DispatchError::Failure {
                call: "getAccessibleContextFromHWND",
            })?;
        Ok((vm_id, self.mint(vm_id, root)))
    }

    fn get_hwnd_from_accessible_context(&self, ac: &JavaObjectHandle) -> Option<Hwnd> {
        let raw = ac.raw();
        self.state
            .lock()
            .windows
            .iter()
            .find(|(_, (_, root))| *root == raw)
            .map(|(hwnd, _)| Hwnd(*hwnd))
    }

    fn get_accessible_context_with_focus(
        &self,
        window: Hwnd,
    ) -> DispatchResult<(i32, JavaObjectHandle)> {
        self.get_accessible_context_from_hwnd(window)
    }

    fn is_same_object(&self, a: &JavaObjectHandle, b: &JavaObjectHandle) -> bool {
        a.vm_id() == b.vm_id() && a.raw() == b.raw()
    }

    fn get_version_info(&self, _vm_id: i32) -> DispatchResult<VersionInfo> {
        self.check("getVersionInfo")?;
        Ok(VersionInfo {
            vm_version: "17.0.2".to_string(),
            bridge_java_class_version: "17.0.2".to_string(),
            bridge_java_dll_version: "17.0.2".to_string(),
            bridge_win_dll_version: "17.0.2".to_string(),
        })
    }

    fn get_accessible_context_info(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleContextInfo> {
        self.check("getAccessibleContextInfo")?;
        let raw = ac.raw();
        let state = self.state.lock();
        let object = state.objects.get(&raw).ok_or(DispatchError::Failure {
            call: "getAccessibleContextInfo",
        })?;
        Ok(AccessibleContextInfo {
            name: object.name.clone(),
            role: object.role.clone(),
            children_count: object.children.len() as i32,
            x: object.bounds.0,
            y: object.bounds.1,
            width: object.bounds.2,
            height: object.bounds.3,
            accessible_component: true,
            ..AccessibleContextInfo::default()
        })
    }

    fn get_accessible_child_from_context(
        &self,
        ac: &JavaObjectHandle,
        index: i32,
    ) -> Option<JavaObjectHandle> {
        let raw = ac.raw();
        let child = {
            let state = self.state.lock();
            state
                .objects
                .get(&raw)
                .and_then(|object| object.children.get(index as usize).copied())
        };
        child.map(|child| self.mint(ac.vm_id(), child))
    }

    fn get_accessible_parent_from_context(
        &self,
        ac: &JavaObjectHandle,
    ) -> Option<JavaObjectHandle> {
        let raw = ac.raw();
        let parent = {
            let state = self.state.lock();
            state.objects.get(&raw).and_then(|object| object.parent)
        };
        parent.map(|parent| self.mint(ac.vm_id(), parent))
    }

    fn get_accessible_context_at(
        &self,
        parent: &JavaObjectHandle,
        x: i32,
        y: i32,
    ) -> DispatchResult<Option<JavaObjectHandle>> {
        self.check("getAccessibleContextAt")?;
        Ok(self
            .object_at(parent.raw(), x, y)
            .map(|hit| self.mint(parent.vm_id(), hit)))
    }

    fn request_focus(&self, ac: &JavaObjectHandle) -> DispatchResult<()> {
        let _ = ac.raw();
        self.check("requestFocus")
    }

    fn get_accessible_relation_set(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleRelationSet> {
        let _ = ac.raw();
        self.check("getAccessibleRelationSet")?;
        Ok(AccessibleRelationSet {
            relations: Vec::new(),
        })
    }

    fn get_accessible_hypertext(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleHypertextInfo> {
        self.check("getAccessibleHypertext")?;
        Ok(AccessibleHypertextInfo {
            links: Vec::new(),
            hypertext: self.mint(ac.vm_id(), 0),
        })
    }

    fn get_accessible_key_bindings(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<Vec<AccessibleKeyBinding>> {
        let _ = ac.raw();
        self.check("getAccessibleKeyBindings")?;
        Ok(Vec::new())
    }

    fn get_accessible_icons(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<Vec<AccessibleIconInfo>> {
        let _ = ac.raw();
        self.check("getAccessibleIcons")?;
        Ok(Vec::new())
    }

    fn get_accessible_actions(&self, ac: &JavaObjectHandle) -> DispatchResult<Vec<String>> {
        let _ = ac.raw();
        self.check("getAccessibleActions")?;
        Ok(vec!["click".to_string()])
    }

    fn do_accessible_actions(
        &self,
        ac: &JavaObjectHandle,
        _actions: &[String],
    ) -> DispatchResult<()> {
        let _ = ac.raw();
        self.check("doAccessibleActions")
    }

    fn get_accessible_text_info(
        &self,
        at: &JavaObjectHandle,
        _x: i32,
        _y: i32,
    ) -> DispatchResult<AccessibleTextInfo> {
        let _ = at.raw();
        self.check("getAccessibleTextInfo")?;
        Ok(AccessibleTextInfo {
            char_count: 11,
            caret_index: 0,
            index_at_point: -1,
        })
    }

    fn get_accessible_text_items(
        &self,
        at: &JavaObjectHandle,
        _index: i32,
    ) -> DispatchResult<AccessibleTextItemsInfo> {
        let _ = at.raw();
        self.check("getAccessibleTextItems")?;
        Ok(AccessibleTextItemsInfo::default())
    }

    fn get_accessible_text_selection_info(
        &self,
        at: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTextSelectionInfo> {
        let _ = at.raw();
        self.check("getAccessibleTextSelectionInfo")?;
        Ok(AccessibleTextSelectionInfo::default())
    }

    fn get_accessible_text_attributes(
        &self,
        at: &JavaObjectHandle,
        _index: i32,
    ) -> DispatchResult<AccessibleTextAttributesInfo> {
        let _ = at.raw();
        self.check("getAccessibleTextAttributes")?;
        Ok(AccessibleTextAttributesInfo::default())
    }

    fn get_accessible_text_rect(
        &self,
        at: &JavaObjectHandle,
        _index: i32,
    ) -> DispatchResult<AccessibleTextRect> {
        let _ = at.raw();
        self.check("getAccessibleTextRect")?;
        Ok(AccessibleTextRect::default())
    }

    fn get_accessible_text_line_bounds(
        &self,
        at: &JavaObjectHandle,
        index: i32,
    ) -> DispatchResult<(i32, i32)> {
        let _ = at.raw();
        self.check("getAccessibleTextLineBounds")?;
        // Five-character lines over an eleven-character document.
        let start = (index / 5) * 5;
        Ok((start, (start + 4).min(10)))
    }

    fn get_accessible_text_range(
        &self,
        at: &JavaObjectHandle,
        _start: i32,
        _end: i32,
    ) -> DispatchResult<String> {
        let _ = at.raw();
        self.check("getAccessibleTextRange")?;
        Ok("hello world".to_string())
    }

    fn set_text_contents(&self, ac: &JavaObjectHandle, _text: &str) -> DispatchResult<()> {
        let _ = ac.raw();
        self.check("setTextContents")
    }

    fn get_accessible_table_info(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTableInfo> {
        self.check("getAccessibleTableInfo")?;
        let raw = ac.raw();
        let (rows, cols, table_raw) = {
            let state = self.state.lock();
            *state.tables.get(&raw).ok_or(DispatchError::Failure {
                call: "getAccessibleTableInfo",
            })?
        };
        Ok(AccessibleTableInfo {
            caption: self.mint(ac.vm_id(), 0),
            summary: self.mint(ac.vm_id(), 0),
            row_count: rows,
            column_count: cols,
            context: self.mint(ac.vm_id(), raw),
            table: self.mint(ac.vm_id(), table_raw),
        })
    }

    fn get_accessible_table_cell_info(
        &self,
        table: &JavaObjectHandle,
        row: i32,
        column: i32,
    ) -> DispatchResult<AccessibleTableCellInfo> {
        self.check("getAccessibleTableCellInfo")?;
        let _ = table.raw();
        Ok(AccessibleTableCellInfo {
            context: self.mint(table.vm_id(), 0),
            index: row * 1000 + column,
            row,
            column,
            row_extent: 1,
            column_extent: 1,
            is_selected: false,
        })
    }

    fn get_accessible_table_row_header(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTableInfo> {
        self.check("getAccessibleTableRowHeader")?;
        self.get_accessible_table_info(ac)
    }

    fn get_accessible_table_column_header(
        &self,
        ac: &JavaObjectHandle,
    ) -> DispatchResult<AccessibleTableInfo> {
        self.check("getAccessibleTableColumnHeader")?;
        self.get_accessible_table_info(ac)
    }

    fn add_accessible_selection(&self, selection: &JavaObjectHandle, _index: i32) {
        let _ = selection.raw();
    }

    fn clear_accessible_selection(&self, selection: &JavaObjectHandle) {
        let _ = selection.raw();
    }

    fn get_accessible_selection(
        &self,
        selection: &JavaObjectHandle,
        index: i32,
    ) -> Option<JavaObjectHandle> {
        self.get_accessible_child_from_context(selection, index)
    }

    fn get_accessible_selection_count(&self, selection: &JavaObjectHandle) -> i32 {
        let raw = selection.raw();
        self.state
            .lock()
            .objects
            .get(&raw)
            .map(|object| object.children.len() as i32)
            .unwrap_or(0)
    }

    fn is_accessible_child_selected(&self, selection: &JavaObjectHandle, _index: i32) -> bool {
        let _ = selection.raw();
        false
    }

    fn remove_accessible_selection(&self, selection: &JavaObjectHandle, _index: i32) {
        let _ = selection.raw();
    }

    fn select_all_accessible_selection(&self, selection: &JavaObjectHandle) {
        let _ = selection.raw();
    }

    fn get_visible_children_count(&self, ac: &JavaObjectHandle) -> i32 {
        let raw = ac.raw();
        self.state
            .lock()
            .objects
            .get(&raw)
            .map(|object| object.children.len() as i32)
            .unwrap_or(0)
    }

    fn get_visible_children(
        &self,
        ac: &JavaObjectHandle,
        start_index: i32,
    ) -> DispatchResult<Vec<JavaObjectHandle>> {
        self.check("getVisibleChildren")?;
        let raw = ac.raw();
        let (children, batch) = {
            let state = self.state.lock();
            let children = state
                .objects
                .get(&raw)
                .map(|object| object.children.clone())
                .unwrap_or_default();
            (children, state.visible_batch)
        };
        Ok(children
            .into_iter()
            .skip(start_index.max(0) as usize)
            .take(batch)
            .map(|child| self.mint(ac.vm_id(), child))
            .collect())
    }

    fn install_event_hook(&self, kind: EventKind) {
        self.state.lock().hook_log.push((kind, true));
    }

    fn remove_event_hook(&self, kind: EventKind) {
        self.state.lock().hook_log.push((kind, false));
    }
}
