//! Purpose: Locate and open the netif tool library at runtime.
//! Exports: `ToolLibrary`, `LIB_ENV`.
//! Role: Turns a shared object on disk into the injected `NetifTool` capability.
//! Invariants: All three entry points must resolve; a partial library is refused.
//! Invariants: The handle stays open for the lifetime of the value.

use std::ffi::CString;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, ErrorKind};
use crate::ffi::{NetifTool, ToolApi, ToolReply};

/// Environment override consulted when no explicit path is given.
pub const LIB_ENV: &str = "NETIFCTL_LIB";

#[cfg(target_os = "macos")]
const CANDIDATES: &[&str] = &["libforgeffi_net_ffi.dylib", "libforgeffi_ffi.dylib"];
#[cfg(all(unix, not(target_os = "macos")))]
const CANDIDATES: &[&str] = &["libforgeffi_net_ffi.so", "libforgeffi_ffi.so"];

#[derive(Debug)]
pub struct ToolLibrary {
    handle: *mut libc::c_void,
    api: ToolApi,
    path: PathBuf,
}

impl ToolLibrary {
    /// Opens the tool library. An explicit path wins, then `NETIFCTL_LIB`,
    /// then the platform candidate names on the default search path.
    #[cfg(unix)]
    pub fn open(explicit: Option<&Path>) -> Result<Self, Error> {
        let override_path = explicit
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(LIB_ENV).map(PathBuf::from));
        if let Some(path) = override_path {
            return Self::open_at(&path);
        }
        for name in CANDIDATES {
            if let Ok(lib) = Self::open_at(Path::new(name)) {
                return Ok(lib);
            }
        }
        Err(Error::new(ErrorKind::Boundary)
            .with_message("could not load the netif tool library")
            .with_hint(format!(
                "Place {} where the dynamic loader finds it, or point --lib or {LIB_ENV} at it.",
                CANDIDATES[0]
            )))
    }

    #[cfg(not(unix))]
    pub fn open(_explicit: Option<&Path>) -> Result<Self, Error> {
        Err(Error::new(ErrorKind::Unsupported)
            .with_message("dynamic loading of the tool library is unix-only"))
    }

    #[cfg(unix)]
    fn open_at(path: &Path) -> Result<Self, Error> {
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            Error::new(ErrorKind::Usage).with_message("library path contains a NUL byte")
        })?;
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        if handle.is_null() {
            return Err(Error::new(ErrorKind::Boundary)
                .with_message("dlopen failed")
                .with_path(path));
        }
        let api = match resolve_api(handle) {
            Ok(api) => api,
            Err(err) => {
                unsafe {
                    libc::dlclose(handle);
                }
                return Err(err.with_path(path));
            }
        };
        tracing::debug!(path = %path.display(), "tool library loaded");
        Ok(Self {
            handle,
            api,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn api(&self) -> ToolApi {
        self.api
    }
}

impl Drop for ToolLibrary {
    fn drop(&mut self) {
        #[cfg(unix)]
        unsafe {
            libc::dlclose(self.handle);
        }
        #[cfg(not(unix))]
        let _ = self.handle;
    }
}

impl NetifTool for ToolLibrary {
    fn list_json(&self) -> Result<ToolReply, Error> {
        self.api.list_json()
    }

    fn apply_json(&self, request: &[u8]) -> Result<ToolReply, Error> {
        self.api.apply_json(request)
    }
}

#[cfg(unix)]
fn resolve_api(handle: *mut libc::c_void) -> Result<ToolApi, Error> {
    use crate::ffi::{ApplyJsonFn, FreeFn, ListJsonFn};

    let list = resolve(handle, "tool_netif_list_json")?;
    let apply = resolve(handle, "tool_netif_apply_json")?;
    let free = resolve(handle, "tool_free")?;
    unsafe {
        Ok(ToolApi {
            list: std::mem::transmute::<*mut libc::c_void, ListJsonFn>(list),
            apply: std::mem::transmute::<*mut libc::c_void, ApplyJsonFn>(apply),
            free: std::mem::transmute::<*mut libc::c_void, FreeFn>(free),
        })
    }
}

#[cfg(unix)]
fn resolve(handle: *mut libc::c_void, symbol: &str) -> Result<*mut libc::c_void, Error> {
    let c_symbol = CString::new(symbol)
        .map_err(|_| Error::new(ErrorKind::Internal).with_message("symbol name contains NUL"))?;
    let sym = unsafe { libc::dlsym(handle, c_symbol.as_ptr()) };
    if sym.is_null() {
        return Err(
            Error::new(ErrorKind::Boundary).with_message(format!("missing symbol: {symbol}"))
        );
    }
    Ok(sym)
}

#[cfg(all(test, unix))]
mod tests {
    use super::ToolLibrary;
    use crate::core::error::ErrorKind;
    use std::path::Path;

    #[test]
    fn open_missing_library_reports_boundary_error() {
        let err = ToolLibrary::open(Some(Path::new("/nonexistent/libnetif_missing.so")))
            .expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Boundary);
    }
}
