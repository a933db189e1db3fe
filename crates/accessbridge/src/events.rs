//! Host-side event subscription over provider callbacks
//!
//! Per event kind, the hub runs a two-state machine: **Unregistered**
//! until the first host subscriber appears, at which point the native
//! trampoline is installed through the dispatch table's setter; back to
//! **Unregistered** when the last subscriber leaves, at which point the
//! setter is called with null and the retention dropped. Both transitions
//! run under the hub's registration lock, so the provider never sees two
//! live trampolines for one kind and a trampoline is never torn down
//! while a registration is live.
//!
//! Provider callbacks arrive on provider-controlled threads. Dispatch
//! wraps the raw references into owned handles (tagged with the VM id the
//! provider supplied), fans out to subscribers outside any lock, and
//! releases the transient references when fan-out completes. Ordering
//! across kinds is unspecified.

use std::sync::{Arc, Weak};

use accessbridge_sys::EventKind;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};

use crate::api::AccessBridgeApi;
use crate::handle::JavaObjectHandle;

/// Payload of one delivered event, beyond the source object.
#[derive(Debug)]
pub enum EventDetail {
    /// No payload (focus, caret, mouse, menu, shutdown, and the
    /// payload-less property kinds)
    None,
    /// Old/new property strings; either side may be absent
    PropertyString {
        old_value: Option<String>,
        new_value: Option<String>,
    },
    /// Old/new caret positions
    PropertyInt { old_position: i32, new_position: i32 },
    /// Old/new property objects
    PropertyObject {
        old_value: JavaObjectHandle,
        new_value: JavaObjectHandle,
    },
}

/// One provider event, delivered to host subscribers.
///
/// The handles inside are owned by the event and released when dispatch
/// of this event completes; subscribers needing the object past the
/// callback must re-fetch it through the tree.
#[derive(Debug)]
pub struct AccessibleEvent {
    pub vm_id: i32,
    pub kind: EventKind,
    /// Source context; the null handle for VM shutdown.
    pub source: JavaObjectHandle,
    pub detail: EventDetail,
}

/// Raw payload as it crosses the trampoline boundary, before wrapping.
#[derive(Debug, Clone)]
pub enum RawEventDetail {
    None,
    Strings {
        old_value: Option<String>,
        new_value: Option<String>,
    },
    Ints { old_position: i32, new_position: i32 },
    Objects { old_ref: u64, new_ref: u64 },
}

type ListenerFn = Arc<dyn Fn(&AccessibleEvent) + Send + Sync>;

struct RegState {
    registered: [bool; EventKind::COUNT],
    live_kinds: usize,
    next_token: u64,
}

/// Multi-subscriber event hub; one per loaded bridge.
pub struct EventHub {
    api: Arc<dyn AccessBridgeApi>,
    /// Back-reference for handing strong hub references to the router
    /// slot and to subscriptions; always upgradable while a method runs.
    self_ref: Weak<EventHub>,
    /// Serializes every Registered ⇄ Unregistered transition.
    reg: Mutex<RegState>,
    /// Subscriber lists, arena-indexed by event kind. Fan-out takes only
    /// the per-kind read lock, so callbacks never contend with `reg`.
    listeners: Vec<RwLock<Vec<(u64, ListenerFn)>>>,
}

/// Process-global router slot the native trampolines read.
///
/// Holds a strong reference to the hub for exactly as long as any kind is
/// registered: this is what keeps the dispatch target alive while the
/// provider may still call in.
static ROUTER: Lazy<RwLock<Option<Arc<EventHub>>>> = Lazy::new(|| RwLock::new(None));

/// Entry point for the native trampolines: forward one raw callback to
/// the currently routed hub, if any.
pub(crate) fn route_event(
    kind: EventKind,
    vm_id: i32,
    event_ref: u64,
    source_ref: u64,
    detail: RawEventDetail,
) {
    let hub = ROUTER.read().clone();
    match hub {
        Some(hub) => hub.dispatch_raw(kind, vm_id, event_ref, source_ref, detail),
        None => {
            // A callback can slip in between the null-setter call and the
            // provider observing it; nothing to dispatch to.
            tracing::trace!(target: "accessbridge::events", %kind, vm_id, "callback after unregistration dropped");
        }
    }
}

impl EventHub {
    pub(crate) fn new(api: Arc<dyn AccessBridgeApi>) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| EventHub {
            api,
            self_ref: self_ref.clone(),
            reg: Mutex::new(RegState {
                registered: [false; EventKind::COUNT],
                live_kinds: 0,
                next_token: 1,
            }),
            listeners: (0..EventKind::COUNT).map(|_| RwLock::new(Vec::new())).collect(),
        })
    }

    /// Strong reference to this hub. Infallible: the hub only exists
    /// behind the `Arc` built in `new`.
    fn strong(&self) -> Arc<EventHub> {
        self.self_ref
            .upgrade()
            .expect("event hub accessed during teardown")
    }

    /// Add a host subscriber for one event kind.
    ///
    /// The first subscriber installs the native trampoline; dropping the
    /// returned [`Subscription`] removes the subscriber, and the last
    /// removal uninstalls the trampoline.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&AccessibleEvent) + Send + Sync + 'static,
    {
        let mut reg = self.reg.lock();
        let token = reg.next_token;
        reg.next_token += 1;

        self.listeners[kind.index()]
            .write()
            .push((token, Arc::new(callback)));

        if !reg.registered[kind.index()] {
            if reg.live_kinds == 0 {
                // Route before installing: the provider may fire the
                // trampoline as soon as the setter returns.
                *ROUTER.write() = Some(self.strong());
            }
            self.api.install_event_hook(kind);
            reg.registered[kind.index()] = true;
            reg.live_kinds += 1;
            tracing::debug!(target: "accessbridge::events", %kind, "native trampoline installed");
        }

        Subscription {
            hub: self.strong(),
            kind,
            token,
        }
    }

    fn unsubscribe(&self, kind: EventKind, token: u64) {
        let mut reg = self.reg.lock();

        let mut list = self.listeners[kind.index()].write();
        list.retain(|(t, _)| *t != token);
        let now_empty = list.is_empty();
        drop(list);

        if now_empty && reg.registered[kind.index()] {
            self.api.remove_event_hook(kind);
            reg.registered[kind.index()] = false;
            reg.live_kinds -= 1;
            tracing::debug!(target: "accessbridge::events", %kind, "native trampoline removed");
            if reg.live_kinds == 0 {
                let mut slot = ROUTER.write();
                // Only drop the retention if the slot still points here.
                let is_self = slot
                    .as_ref()
                    .is_some_and(|hub| std::ptr::eq(Arc::as_ptr(hub), self));
                if is_self {
                    *slot = None;
                }
            }
        }
    }

    /// Whether the native trampoline for `kind` is currently installed.
    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.reg.lock().registered[kind.index()]
    }

    /// Current host subscriber count for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.listeners[kind.index()].read().len()
    }

    /// Forward one raw provider callback into host dispatch.
    ///
    /// This is where the native trampolines land. The raw references are
    /// wrapped into owned handles tagged with `vm_id` and released when
    /// fan-out completes — including when no subscriber is attached.
    /// Public so a provider can be emulated when exercising subscribers.
    pub fn dispatch_raw(
        &self,
        kind: EventKind,
        vm_id: i32,
        event_ref: u64,
        source_ref: u64,
        detail: RawEventDetail,
    ) {
        // Snapshot under the read lock, invoke outside it: a subscriber
        // may itself subscribe or unsubscribe.
        let listeners: Vec<ListenerFn> = self.listeners[kind.index()]
            .read()
            .iter()
            .map(|(_, f)| Arc::clone(f))
            .collect();

        // The transient event object is owned here and released at the
        // end of dispatch regardless of subscriber behavior.
        let _event_obj = self.api.wrap_foreign(vm_id, event_ref);
        let source = self.api.wrap_foreign(vm_id, source_ref);

        let detail = match detail {
            RawEventDetail::None => EventDetail::None,
            RawEventDetail::Strings {
                old_value,
                new_value,
            } => EventDetail::PropertyString {
                old_value,
                new_value,
            },
            RawEventDetail::Ints {
                old_position,
                new_position,
            } => EventDetail::PropertyInt {
                old_position,
                new_position,
            },
            RawEventDetail::Objects { old_ref, new_ref } => EventDetail::PropertyObject {
                old_value: self.api.wrap_foreign(vm_id, old_ref),
                new_value: self.api.wrap_foreign(vm_id, new_ref),
            },
        };

        let event = AccessibleEvent {
            vm_id,
            kind,
            source,
            detail,
        };

        for listener in &listeners {
            listener(&event);
        }
    }
}

/// RAII guard for one host subscriber; dropping it unsubscribes.
pub struct Subscription {
    hub: Arc<EventHub>,
    kind: EventKind,
    token: u64,
}

impl Subscription {
    /// The event kind this subscription listens to.
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.kind, self.token);
    }
}
