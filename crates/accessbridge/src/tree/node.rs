//! Lazy accessible nodes
//!
//! A node owns exactly one provider handle. Its description block and
//! child list are fetched on first access and cached until
//! [`refresh`](AccessibleNode::refresh); children materialize one slot at
//! a time, so asking for child 400 of a huge container never fetches its
//! siblings. Fetch failures are returned to the caller and not cached —
//! one failing property never poisons siblings, ancestors, or other
//! properties of the same node.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::AccessBridgeApi;
use crate::error::DispatchResult;
use crate::handle::JavaObjectHandle;
use crate::info::*;
use crate::limits::{clamp_count, limit_grid};
use crate::BridgeOptions;

pub struct AccessibleNode {
    api: Arc<dyn AccessBridgeApi>,
    options: Arc<BridgeOptions>,
    handle: JavaObjectHandle,
    info: Mutex<Option<AccessibleContextInfo>>,
    /// `None` until the child list is first touched; then one lazy slot
    /// per (limited) child index.
    children: Mutex<Option<Vec<Option<Arc<AccessibleNode>>>>>,
}

impl AccessibleNode {
    pub(crate) fn new(
        api: Arc<dyn AccessBridgeApi>,
        options: Arc<BridgeOptions>,
        handle: JavaObjectHandle,
    ) -> Arc<Self> {
        Arc::new(AccessibleNode {
            api,
            options,
            handle,
            info: Mutex::new(None),
            children: Mutex::new(None),
        })
    }

    pub fn handle(&self) -> &JavaObjectHandle {
        &self.handle
    }

    pub fn vm_id(&self) -> i32 {
        self.handle.vm_id()
    }

    /// Provider-reported identity with another node.
    pub fn is_same_as(&self, other: &AccessibleNode) -> bool {
        self.api.is_same_object(&self.handle, &other.handle)
    }

    /// The node's description block, fetched once and cached.
    ///
    /// A failed fetch is returned and NOT cached; the next call retries.
    pub fn get_info(&self) -> DispatchResult<AccessibleContextInfo> {
        let mut cache = self.info.lock();
        if let Some(info) = cache.as_ref() {
            return Ok(info.clone());
        }
        let info = self.api.get_accessible_context_info(&self.handle)?;
        tracing::trace!(
            target: "accessbridge::tree",
            vm_id = self.vm_id(),
            role = %info.role,
            children = info.children_count,
            "context info fetched"
        );
        *cache = Some(info.clone());
        Ok(info)
    }

    /// Number of child slots this node will materialize: the provider's
    /// count clamped to the configured collection limit.
    pub fn children_count(&self) -> DispatchResult<usize> {
        let info = self.get_info()?;
        Ok(clamp_count(
            info.children_count,
            self.options.collection_size_limit,
        ))
    }

    /// Materialize the child at `index`, leaving all other slots lazy.
    ///
    /// `Ok(None)` past the (limited) child count or when the provider has
    /// no child there.
    pub fn get_child(&self, index: usize) -> DispatchResult<Option<Arc<AccessibleNode>>> {
        let count = self.children_count()?;
        let mut children = self.children.lock();
        let slots = children.get_or_insert_with(|| vec![None; count]);

        if index >= slots.len() {
            return Ok(None);
        }
        if let Some(child) = &slots[index] {
            return Ok(Some(Arc::clone(child)));
        }

        match self
            .api
            .get_accessible_child_from_context(&self.handle, index as i32)
        {
            Some(handle) => {
                let child =
                    AccessibleNode::new(Arc::clone(&self.api), Arc::clone(&self.options), handle);
                slots[index] = Some(Arc::clone(&child));
                Ok(Some(child))
            }
            None => Ok(None),
        }
    }

    /// The provider-reported parent, fetched fresh on every call — a
    /// provider object's parent can change between accesses.
    pub fn get_parent(&self) -> Option<Arc<AccessibleNode>> {
        self.api
            .get_accessible_parent_from_context(&self.handle)
            .map(|handle| {
                AccessibleNode::new(Arc::clone(&self.api), Arc::clone(&self.options), handle)
            })
    }

    /// Drop cached info and the child slot list; the next access
    /// re-fetches from the provider.
    pub fn refresh(&self) {
        *self.info.lock() = None;
        *self.children.lock() = None;
    }

    /// Release this node's own handle. Materialized children own their
    /// handles independently and are not cascaded into.
    pub fn dispose(&self) {
        self.handle.release();
    }

    pub fn request_focus(&self) -> DispatchResult<()> {
        self.api.request_focus(&self.handle)
    }

    // ------------------------------------------------------------------
    // Extended properties. Each is one independent provider call; a
    // failure here marks only this property.
    // ------------------------------------------------------------------

    pub fn get_relation_set(&self) -> DispatchResult<AccessibleRelationSet> {
        self.api.get_accessible_relation_set(&self.handle)
    }

    pub fn get_hypertext(&self) -> DispatchResult<AccessibleHypertextInfo> {
        self.api.get_accessible_hypertext(&self.handle)
    }

    pub fn get_key_bindings(&self) -> DispatchResult<Vec<AccessibleKeyBinding>> {
        self.api.get_accessible_key_bindings(&self.handle)
    }

    pub fn get_icons(&self) -> DispatchResult<Vec<AccessibleIconInfo>> {
        self.api.get_accessible_icons(&self.handle)
    }

    pub fn get_actions(&self) -> DispatchResult<Vec<String>> {
        self.api.get_accessible_actions(&self.handle)
    }

    pub fn do_actions(&self, actions: &[String]) -> DispatchResult<()> {
        self.api.do_accessible_actions(&self.handle, actions)
    }

    pub fn get_text_info(&self, x: i32, y: i32) -> DispatchResult<AccessibleTextInfo> {
        self.api.get_accessible_text_info(&self.handle, x, y)
    }

    pub fn get_text_items(&self, index: i32) -> DispatchResult<AccessibleTextItemsInfo> {
        self.api.get_accessible_text_items(&self.handle, index)
    }

    pub fn get_text_selection(&self) -> DispatchResult<AccessibleTextSelectionInfo> {
        self.api.get_accessible_text_selection_info(&self.handle)
    }

    pub fn get_text_attributes(&self, index: i32) -> DispatchResult<AccessibleTextAttributesInfo> {
        self.api.get_accessible_text_attributes(&self.handle, index)
    }

    pub fn get_text_rect(&self, index: i32) -> DispatchResult<AccessibleTextRect> {
        self.api.get_accessible_text_rect(&self.handle, index)
    }

    pub fn get_text_range(&self, start: i32, end: i32) -> DispatchResult<String> {
        self.api.get_accessible_text_range(&self.handle, start, end)
    }

    pub fn set_text_contents(&self, text: &str) -> DispatchResult<()> {
        self.api.set_text_contents(&self.handle, text)
    }

    /// `(start, end)` spans of the text lines, front to back, bounded by
    /// the configured line count limit.
    pub fn get_text_line_spans(&self) -> DispatchResult<Vec<(i32, i32)>> {
        let info = self.get_text_info(0, 0)?;
        let mut spans = Vec::new();
        let mut index = 0;
        while index < info.char_count && spans.len() < self.options.text_line_count_limit {
            let (start, end) = self
                .api
                .get_accessible_text_line_bounds(&self.handle, index)?;
            if end < start {
                break;
            }
            spans.push((start, end));
            if end + 1 <= index {
                break;
            }
            index = end + 1;
        }
        Ok(spans)
    }

    pub fn get_table_info(&self) -> DispatchResult<AccessibleTableInfo> {
        self.api.get_accessible_table_info(&self.handle)
    }

    pub fn get_table_row_header(&self) -> DispatchResult<AccessibleTableInfo> {
        self.api.get_accessible_table_row_header(&self.handle)
    }

    pub fn get_table_column_header(&self) -> DispatchResult<AccessibleTableInfo> {
        self.api.get_accessible_table_column_header(&self.handle)
    }

    /// Materialize table cells under the collection budget, distributing
    /// it across rows and columns so neither dimension collapses.
    pub fn get_table_cells(
        &self,
        table: &AccessibleTableInfo,
    ) -> DispatchResult<Vec<Vec<AccessibleTableCellInfo>>> {
        let (rows, cols) = limit_grid(
            table.row_count,
            table.column_count,
            self.options.collection_size_limit,
        );
        let mut grid = Vec::with_capacity(rows as usize);
        for row in 0..rows {
            let mut cells = Vec::with_capacity(cols as usize);
            for column in 0..cols {
                cells.push(
                    self.api
                        .get_accessible_table_cell_info(&table.table, row, column)?,
                );
            }
            grid.push(cells);
        }
        Ok(grid)
    }

    /// Currently selected children, bounded by the collection limit.
    pub fn get_selections(&self) -> Vec<JavaObjectHandle> {
        let count = clamp_count(
            self.api.get_accessible_selection_count(&self.handle),
            self.options.collection_size_limit,
        );
        (0..count)
            .filter_map(|i| self.api.get_accessible_selection(&self.handle, i as i32))
            .collect()
    }

    pub fn add_selection(&self, index: i32) {
        self.api.add_accessible_selection(&self.handle, index);
    }

    pub fn remove_selection(&self, index: i32) {
        self.api.remove_accessible_selection(&self.handle, index);
    }

    pub fn clear_selection(&self) {
        self.api.clear_accessible_selection(&self.handle);
    }

    pub fn select_all(&self) {
        self.api.select_all_accessible_selection(&self.handle);
    }

    pub fn is_child_selected(&self, index: i32) -> bool {
        self.api.is_accessible_child_selected(&self.handle, index)
    }

    /// Visible children, fetched in provider-sized batches and bounded by
    /// the collection limit. Surplus handles from the final batch are
    /// released immediately.
    pub fn get_visible_children(&self) -> DispatchResult<Vec<JavaObjectHandle>> {
        let total = clamp_count(
            self.api.get_visible_children_count(&self.handle),
            self.options.collection_size_limit,
        );
        let mut out: Vec<JavaObjectHandle> = Vec::with_capacity(total);
        while out.len() < total {
            let batch = self
                .api
                .get_visible_children(&self.handle, out.len() as i32)?;
            if batch.is_empty() {
                break;
            }
            for handle in batch {
                if out.len() < total {
                    out.push(handle);
                }
                // else: dropped here, releasing the surplus reference
            }
        }
        Ok(out)
    }
}

impl std::fmt::Debug for AccessibleNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessibleNode")
            .field("handle", &self.handle)
            .field("cached", &self.info.lock().is_some())
            .finish()
    }
}
