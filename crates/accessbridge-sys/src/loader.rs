//! Dynamic library loading for the accessibility provider
//!
//! Cross-platform support for loading the provider's shared library
//! (.dll on Windows, .so elsewhere) and resolving its exports by name.

use std::ffi::{CStr, CString};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading the provider library or resolving
/// its exports.
///
/// All of these are fatal for the bridge subsystem: a provider with a
/// missing export is unusable, and construction never partially succeeds.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Library file not found or could not be loaded
    #[error("provider library not found: {path}")]
    NotFound {
        /// Path that was attempted
        path: String,
    },

    /// A required export is absent from the provider library
    #[error("missing provider export: {symbol} in {library}")]
    MissingExport {
        /// Export name that was not found
        symbol: String,
        /// Library path
        library: String,
    },

    /// Platform-specific error
    #[error("platform error: {0}")]
    Platform(String),

    /// Invalid path encoding
    #[error("invalid UTF-8 in library path: {0}")]
    InvalidPath(String),
}

/// The file name of the provider library matching this process's pointer
/// width.
///
/// The provider ships two alternate libraries, one per ABI width; a 64-bit
/// process must load the 64-bit one and vice versa.
pub fn provider_library_name() -> &'static str {
    #[cfg(all(windows, target_pointer_width = "64"))]
    {
        "WindowsAccessBridge-64.dll"
    }
    #[cfg(all(windows, target_pointer_width = "32"))]
    {
        "WindowsAccessBridge-32.dll"
    }
    #[cfg(all(unix, target_pointer_width = "64"))]
    {
        "libwindowsaccessbridge-64.so"
    }
    #[cfg(all(unix, target_pointer_width = "32"))]
    {
        "libwindowsaccessbridge-32.so"
    }
}

/// Cross-platform handle to the loaded provider library.
///
/// The handle stays open for the life of this value; every function pointer
/// resolved from it is only valid while it is alive. The bridge keeps one
/// `Library` per process, loaded once at startup.
pub struct Library {
    handle: LibraryHandle,
    path: String,
}

impl Library {
    /// Load the provider library from the given path.
    ///
    /// # Platform-specific behavior
    ///
    /// - **Unix**: `dlopen(RTLD_NOW | RTLD_LOCAL)` — all exports resolved
    ///   immediately, so a broken provider fails here rather than mid-call
    /// - **Windows**: `LoadLibraryW`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path_ref = path.as_ref();
        let path_str = path_ref
            .to_str()
            .ok_or_else(|| LoadError::InvalidPath(format!("{:?}", path_ref)))?;

        let handle = LibraryHandle::load(path_str)?;
        tracing::debug!(target: "accessbridge::loader", path = path_str, "provider library loaded");

        Ok(Library {
            handle,
            path: path_str.to_string(),
        })
    }

    /// Resolve an export by exact name.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    /// - the function signature `T` matches the export's actual signature
    /// - the library remains loaded while the pointer is used
    pub unsafe fn get<T>(&self, symbol: &str) -> Result<T, LoadError> {
        self.handle.symbol(symbol, &self.path)
    }

    /// The path this library was loaded from
    pub fn path(&self) -> &str {
        &self.path
    }
}

// Platform-specific implementations

#[cfg(unix)]
type LibraryHandle = UnixLibrary;

#[cfg(windows)]
type LibraryHandle = WindowsLibrary;

// ============================================================================
// Unix Implementation (Linux, macOS, BSD)
// ============================================================================

#[cfg(unix)]
struct UnixLibrary {
    handle: *mut std::ffi::c_void,
}

#[cfg(unix)]
impl UnixLibrary {
    fn load(path: &str) -> Result<Self, LoadError> {
        let c_path = CString::new(path)
            .map_err(|e| LoadError::Platform(format!("invalid path: {}", e)))?;

        let handle = unsafe {
            // RTLD_NOW: resolve all symbols immediately
            // RTLD_LOCAL: symbols not visible to subsequently loaded libraries
            libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL)
        };

        if handle.is_null() {
            let error = unsafe {
                let err_ptr = libc::dlerror();
                if err_ptr.is_null() {
                    "unknown error".to_string()
                } else {
                    CStr::from_ptr(err_ptr).to_string_lossy().into_owned()
                }
            };

            return Err(LoadError::NotFound {
                path: format!("{}: {}", path, error),
            });
        }

        Ok(UnixLibrary { handle })
    }

    unsafe fn symbol<T>(&self, name: &str, lib_path: &str) -> Result<T, LoadError> {
        let c_name = CString::new(name)
            .map_err(|e| LoadError::Platform(format!("invalid symbol name: {}", e)))?;

        // Clear any previous error state
        libc::dlerror();

        let symbol = libc::dlsym(self.handle, c_name.as_ptr());

        let err_ptr = libc::dlerror();
        if !err_ptr.is_null() {
            let error = CStr::from_ptr(err_ptr).to_string_lossy().into_owned();
            return Err(LoadError::MissingExport {
                symbol: name.to_string(),
                library: format!("{}: {}", lib_path, error),
            });
        }

        if symbol.is_null() {
            return Err(LoadError::MissingExport {
                symbol: name.to_string(),
                library: lib_path.to_string(),
            });
        }

        Ok(std::mem::transmute_copy(&symbol))
    }
}

#[cfg(unix)]
impl Drop for UnixLibrary {
    fn drop(&mut self) {
        unsafe {
            libc::dlclose(self.handle);
        }
    }
}

#[cfg(unix)]
unsafe impl Send for UnixLibrary {}
#[cfg(unix)]
unsafe impl Sync for UnixLibrary {}

// ============================================================================
// Windows Implementation
// ============================================================================

#[cfg(windows)]
struct WindowsLibrary {
    handle: *mut std::ffi::c_void,
}

#[cfg(windows)]
impl WindowsLibrary {
    fn load(path: &str) -> Result<Self, LoadError> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;

        let wide: Vec<u16> = OsStr::new(path)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let handle = unsafe { LoadLibraryW(wide.as_ptr()) };

        if handle.is_null() {
            let error = unsafe { GetLastError() };
            return Err(LoadError::NotFound {
                path: format!("{} (error code: {})", path, error),
            });
        }

        Ok(WindowsLibrary { handle })
    }

    unsafe fn symbol<T>(&self, name: &str, lib_path: &str) -> Result<T, LoadError> {
        let c_name = CString::new(name)
            .map_err(|e| LoadError::Platform(format!("invalid symbol name: {}", e)))?;

        let symbol = GetProcAddress(self.handle, c_name.as_ptr());

        if symbol.is_null() {
            let error = GetLastError();
            return Err(LoadError::MissingExport {
                symbol: name.to_string(),
                library: format!("{} (error code: {})", lib_path, error),
            });
        }

        Ok(std::mem::transmute_copy(&symbol))
    }
}

#[cfg(windows)]
impl Drop for WindowsLibrary {
    fn drop(&mut self) {
        unsafe {
            FreeLibrary(self.handle);
        }
    }
}

#[cfg(windows)]
unsafe impl Send for WindowsLibrary {}
#[cfg(windows)]
unsafe impl Sync for WindowsLibrary {}

// Windows FFI declarations
#[cfg(windows)]
extern "system" {
    fn LoadLibraryW(filename: *const u16) -> *mut std::ffi::c_void;
    fn GetProcAddress(
        module: *mut std::ffi::c_void,
        procname: *const i8,
    ) -> *mut std::ffi::c_void;
    fn FreeLibrary(module: *mut std::ffi::c_void) -> i32;
    fn GetLastError() -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_not_found() {
        let result = Library::open("/nonexistent/provider.so");
        assert!(result.is_err());
        match result {
            Err(LoadError::NotFound { .. }) => {}
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_non_library_file_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("garbage.so");
        std::fs::write(&path, b"not a shared library").expect("write");
        assert!(matches!(
            Library::open(&path),
            Err(LoadError::NotFound { .. })
        ));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_missing_export_reported_by_name() {
        // Resolved by soname through the system search path; skip quietly
        // on systems without it.
        let lib = match Library::open("libm.so.6") {
            Ok(lib) => lib,
            Err(_) => return,
        };
        let result = unsafe { lib.get::<unsafe extern "C" fn()>("getAccessibleContextInfo") };
        match result {
            Err(LoadError::MissingExport { symbol, .. }) => {
                assert_eq!(symbol, "getAccessibleContextInfo");
            }
            other => panic!("expected MissingExport, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_library_name_matches_pointer_width() {
        let name = provider_library_name();
        #[cfg(target_pointer_width = "64")]
        assert!(name.contains("64"));
        #[cfg(target_pointer_width = "32")]
        assert!(name.contains("32"));
    }
}
