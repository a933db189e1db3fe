//! Provider event kinds and the setter-symbol rule table
//!
//! The provider registers callbacks through one exported setter per event
//! kind, and the setter's name is derived from the event name by a fixed
//! rule: `FocusGained` registers through `setFocusGainedFP`. The rule and
//! the full kind/symbol table live here so symbol resolution has a single
//! source of truth and the mapping itself is testable.

use std::fmt;

/// The shape of a kind's native callback signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackShape {
    /// `(vm_id, event, source)`
    Context,
    /// `(vm_id)`
    Shutdown,
    /// `(vm_id, event, source, old: *wchar, new: *wchar)`
    StringChange,
    /// `(vm_id, event, source, old: int, new: int)`
    IntChange,
    /// `(vm_id, event, source, old: ref, new: ref)`
    ObjectChange,
}

macro_rules! event_kinds {
    ($(($variant:ident, $name:literal, $shape:ident)),+ $(,)?) => {
        /// One provider event kind.
        ///
        /// The discriminant doubles as the index into per-kind slot arrays.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(usize)]
        pub enum EventKind {
            $($variant),+
        }

        impl EventKind {
            /// Every kind, in slot order.
            pub const ALL: &'static [EventKind] = &[$(EventKind::$variant),+];

            /// Total number of kinds (slot array length).
            pub const COUNT: usize = EventKind::ALL.len();

            /// The provider-side event name.
            pub fn name(self) -> &'static str {
                match self {
                    $(EventKind::$variant => $name),+
                }
            }

            /// The native callback signature shape for this kind.
            pub fn shape(self) -> CallbackShape {
                match self {
                    $(EventKind::$variant => CallbackShape::$shape),+
                }
            }

            /// Slot index of this kind.
            pub fn index(self) -> usize {
                self as usize
            }
        }
    };
}

event_kinds!(
    (CaretUpdate, "CaretUpdate", Context),
    (FocusGained, "FocusGained", Context),
    (FocusLost, "FocusLost", Context),
    (JavaShutdown, "JavaShutdown", Shutdown),
    (MenuCanceled, "MenuCanceled", Context),
    (MenuDeselected, "MenuDeselected", Context),
    (MenuSelected, "MenuSelected", Context),
    (MouseClicked, "MouseClicked", Context),
    (MouseEntered, "MouseEntered", Context),
    (MouseExited, "MouseExited", Context),
    (MousePressed, "MousePressed", Context),
    (MouseReleased, "MouseReleased", Context),
    (PopupMenuCanceled, "PopupMenuCanceled", Context),
    (PopupMenuWillBecomeInvisible, "PopupMenuWillBecomeInvisible", Context),
    (PopupMenuWillBecomeVisible, "PopupMenuWillBecomeVisible", Context),
    (PropertyActiveDescendentChange, "PropertyActiveDescendentChange", ObjectChange),
    (PropertyCaretChange, "PropertyCaretChange", IntChange),
    (PropertyChildChange, "PropertyChildChange", ObjectChange),
    (PropertyDescriptionChange, "PropertyDescriptionChange", StringChange),
    (PropertyNameChange, "PropertyNameChange", StringChange),
    (PropertySelectionChange, "PropertySelectionChange", Context),
    (PropertyStateChange, "PropertyStateChange", StringChange),
    (PropertyTableModelChange, "PropertyTableModelChange", StringChange),
    (PropertyTextChange, "PropertyTextChange", Context),
    (PropertyValueChange, "PropertyValueChange", StringChange),
    (PropertyVisibleDataChange, "PropertyVisibleDataChange", Context),
);

impl EventKind {
    /// The export name of this kind's callback setter, per the provider's
    /// fixed naming rule.
    pub fn setter_symbol(self) -> String {
        setter_symbol_for(self.name())
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The provider's name-transformation rule for callback setters:
/// event `Xxx` is registered through export `setXxxFP`.
pub fn setter_symbol_for(event_name: &str) -> String {
    format!("set{}FP", event_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setter_rule() {
        assert_eq!(setter_symbol_for("FocusGained"), "setFocusGainedFP");
        assert_eq!(
            setter_symbol_for("PropertyNameChange"),
            "setPropertyNameChangeFP"
        );
    }

    #[test]
    fn test_every_kind_has_a_setter_symbol() {
        for kind in EventKind::ALL {
            let symbol = kind.setter_symbol();
            assert!(symbol.starts_with("set"), "{}", symbol);
            assert!(symbol.ends_with("FP"), "{}", symbol);
            assert_eq!(symbol, format!("set{}FP", kind.name()));
        }
    }

    #[test]
    fn test_indices_are_dense_and_unique() {
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(EventKind::COUNT, EventKind::ALL.len());
    }

    #[test]
    fn test_shutdown_shape() {
        assert_eq!(EventKind::JavaShutdown.shape(), CallbackShape::Shutdown);
        assert_eq!(EventKind::FocusGained.shape(), CallbackShape::Context);
        assert_eq!(
            EventKind::PropertyChildChange.shape(),
            CallbackShape::ObjectChange
        );
    }
}
