//! Width abstraction over provider object references
//!
//! The provider exposes two structurally parallel ABIs whose only
//! difference is the width of embedded object references: 4 bytes in the
//! legacy tables, 8 bytes in the current ones. Everything above this module
//! is written once against [`NativeRef`] and instantiated twice.

use std::fmt;
use std::hash::Hash;

/// Which of the two provider ABIs this process uses.
///
/// Selected once from the process pointer width at startup; nothing
/// downstream ever branches on it per call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbiVariant {
    /// 4-byte object references
    Legacy32,
    /// 8-byte object references
    Current64,
}

impl AbiVariant {
    /// The variant matching this process's pointer width.
    pub const fn current() -> Self {
        #[cfg(target_pointer_width = "64")]
        {
            AbiVariant::Current64
        }
        #[cfg(target_pointer_width = "32")]
        {
            AbiVariant::Legacy32
        }
    }

    /// Width in bytes of an object reference under this variant.
    pub const fn ref_width(self) -> usize {
        match self {
            AbiVariant::Legacy32 => 4,
            AbiVariant::Current64 => 8,
        }
    }
}

impl fmt::Display for AbiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiVariant::Legacy32 => write!(f, "legacy-32"),
            AbiVariant::Current64 => write!(f, "current-64"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::JObject32 {}
    impl Sealed for super::JObject64 {}
}

/// A provider object reference of one ABI width.
///
/// Sealed: the only implementations are [`JObject32`] and [`JObject64`].
/// A zero value is the provider's distinguished "no object" sentinel.
/// The `u64` raw form is wide enough for either width and is what the
/// width-independent host layer stores; a reference only regains its native
/// width inside the generic dispatch client, so a value of the wrong width
/// can never reach a provider call.
pub trait NativeRef:
    sealed::Sealed + Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static
{
    /// The "no object" sentinel
    const NULL: Self;
    /// The ABI variant this width belongs to
    const VARIANT: AbiVariant;

    /// Reconstruct a reference from its width-opaque raw form
    fn from_raw(raw: u64) -> Self;

    /// Widen to the width-opaque raw form
    fn to_raw(self) -> u64;

    /// Whether this is the "no object" sentinel
    fn is_null(self) -> bool {
        self == Self::NULL
    }
}

/// 4-byte object reference (legacy ABI)
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct JObject32(pub u32);

/// 8-byte object reference (current ABI)
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct JObject64(pub u64);

impl NativeRef for JObject32 {
    const NULL: Self = JObject32(0);
    const VARIANT: AbiVariant = AbiVariant::Legacy32;

    fn from_raw(raw: u64) -> Self {
        JObject32(raw as u32)
    }

    fn to_raw(self) -> u64 {
        u64::from(self.0)
    }
}

impl NativeRef for JObject64 {
    const NULL: Self = JObject64(0);
    const VARIANT: AbiVariant = AbiVariant::Current64;

    fn from_raw(raw: u64) -> Self {
        JObject64(raw)
    }

    fn to_raw(self) -> u64 {
        self.0
    }
}

/// A native window handle supplied by the window-enumeration collaborator.
///
/// Opaque to this crate; only ever passed back to the provider.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Hwnd(pub isize);

impl Hwnd {
    /// The null window handle
    pub const NULL: Hwnd = Hwnd(0);

    /// Whether this is the null window handle
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        let r32 = JObject32::from_raw(0xDEAD_BEEF);
        assert_eq!(r32.to_raw(), 0xDEAD_BEEF);

        let r64 = JObject64::from_raw(0xDEAD_BEEF_CAFE_F00D);
        assert_eq!(r64.to_raw(), 0xDEAD_BEEF_CAFE_F00D);
    }

    #[test]
    fn test_null_sentinel() {
        assert!(JObject32::NULL.is_null());
        assert!(JObject64::NULL.is_null());
        assert!(!JObject32::from_raw(1).is_null());
        assert!(!JObject64::from_raw(1).is_null());
    }

    #[test]
    fn test_legacy_width_truncates_to_four_bytes() {
        // A 4-byte reference only ever carries 32 bits; widening and
        // narrowing must agree with the provider's own truncation.
        let r = JObject32::from_raw(0xFFFF_FFFF_0000_0001);
        assert_eq!(r.to_raw(), 0x0000_0001);
    }

    #[test]
    fn test_variant_widths() {
        assert_eq!(AbiVariant::Legacy32.ref_width(), 4);
        assert_eq!(AbiVariant::Current64.ref_width(), 8);
        assert_eq!(JObject32::VARIANT, AbiVariant::Legacy32);
        assert_eq!(JObject64::VARIANT, AbiVariant::Current64);
    }
}
