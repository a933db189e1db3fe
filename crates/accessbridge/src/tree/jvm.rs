//! Grouping window roots by virtual machine instance
//!
//! The provider routes by VM id; one [`AccessibleJvm`] collects every
//! provider-backed window of one VM. Enumeration output is deterministic:
//! VMs ordered by id, windows within a VM by display sort key.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::api::AccessBridgeApi;
use crate::error::DispatchResult;
use crate::info::VersionInfo;
use crate::tree::{AccessibleWindow, NodePath};

/// All provider-backed windows of one VM instance.
pub struct AccessibleJvm {
    vm_id: i32,
    windows: Vec<AccessibleWindow>,
    api: Arc<dyn AccessBridgeApi>,
}

impl AccessibleJvm {
    pub fn vm_id(&self) -> i32 {
        self.vm_id
    }

    pub fn windows(&self) -> &[AccessibleWindow] {
        &self.windows
    }

    /// The provider/VM version block for this VM.
    pub fn version_info(&self) -> DispatchResult<VersionInfo> {
        self.api.get_version_info(self.vm_id)
    }

    /// Hit-test every window of this VM; first hit wins. A window whose
    /// hit-test call fails is skipped, not fatal.
    pub fn get_node_path_at(&self, x: i32, y: i32) -> Option<NodePath> {
        for window in &self.windows {
            match window.get_node_path_at(x, y) {
                Ok(Some(path)) => return Some(path),
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(
                        target: "accessbridge::tree",
                        vm_id = self.vm_id,
                        title = window.title(),
                        %err,
                        "hit-test skipped window"
                    );
                }
            }
        }
        None
    }
}

/// Group window roots by VM id, ordering VMs by id and each VM's windows
/// by `(title, hwnd)`.
pub(crate) fn group_into_jvms(
    api: &Arc<dyn AccessBridgeApi>,
    windows: Vec<AccessibleWindow>,
) -> Vec<AccessibleJvm> {
    let mut by_vm: FxHashMap<i32, Vec<AccessibleWindow>> = FxHashMap::default();
    for window in windows {
        by_vm.entry(window.vm_id()).or_default().push(window);
    }

    let mut jvms: Vec<AccessibleJvm> = by_vm
        .into_iter()
        .map(|(vm_id, mut windows)| {
            windows.sort_by(|a, b| {
                a.title()
                    .cmp(b.title())
                    .then_with(|| a.hwnd().0.cmp(&b.hwnd().0))
            });
            AccessibleJvm {
                vm_id,
                windows,
                api: Arc::clone(api),
            }
        })
        .collect();
    jvms.sort_by_key(|jvm| jvm.vm_id);
    jvms
}
