//! Binary interface to libretro core plugins.
//!
//! A core is a dynamic library exporting
//!
//! ```c
//! void retro_get_system_info(struct retro_system_info *info);
//! ```
//!
//! where the record is laid out, in order, as:
//!
//! | field              | C type         |
//! |--------------------|----------------|
//! | `library_name`     | `const char *` |
//! | `library_version`  | `const char *` |
//! | `valid_extensions` | `const char *` (pipe-delimited, e.g. `"smc\|sfc"`) |
//! | `need_fullpath`    | `bool`         |
//! | `block_extract`    | `bool`         |
//!
//! Strings are null-terminated and owned by the core. This module is the only place
//! raw pointers are touched: [`read_system_info`] copies everything into an owned
//! [`SystemInfo`] before the library is unloaded.

use camino::Utf8Path;
use libloading::{Library, Symbol};
use std::ffi::{CStr, c_char};
use std::ptr;

use crate::services::cores::CoreError;

/// Exported symbol name, null-terminated for `dlsym`
const SYSTEM_INFO_SYMBOL: &[u8] = b"retro_get_system_info\0";

/// `struct retro_system_info` from libretro.h
#[repr(C)]
struct RetroSystemInfo {
    library_name: *const c_char,
    library_version: *const c_char,
    valid_extensions: *const c_char,
    need_fullpath: bool,
    block_extract: bool,
}

impl Default for RetroSystemInfo {
    fn default() -> Self {
        Self {
            library_name: ptr::null(),
            library_version: ptr::null(),
            valid_extensions: ptr::null(),
            need_fullpath: false,
            block_extract: false,
        }
    }
}

type RetroGetSystemInfo = unsafe extern "C" fn(info: *mut RetroSystemInfo);

/// Owned copy of a core's `retro_system_info`.
///
/// Null string pointers are read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInfo {
    pub library_name: String,
    pub library_version: String,
    pub valid_extensions: String,
    pub need_fullpath: bool,
    pub block_extract: bool,
}

/// Source of core metadata.
///
/// The production implementation is [`DynamicLibraryReader`]; tests substitute a mock so
/// core discovery can run without real plugins on disk.
#[cfg_attr(test, mockall::automock)]
pub trait SystemInfoReader {
    fn read(&self, path: &Utf8Path) -> Result<SystemInfo, CoreError>;
}

/// Reads metadata by loading the plugin with the platform's dynamic loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicLibraryReader;

impl SystemInfoReader for DynamicLibraryReader {
    fn read(&self, path: &Utf8Path) -> Result<SystemInfo, CoreError> {
        read_system_info(path)
    }
}

/// Load a core and call its `retro_get_system_info` export.
pub fn read_system_info(path: &Utf8Path) -> Result<SystemInfo, CoreError> {
    // SAFETY: loading runs the library's initialisers. Cores come from RetroArch's own
    // cores directory and are trusted to the same degree RetroArch trusts them.
    let library = unsafe { Library::new(path.as_std_path()) }.map_err(|source| {
        CoreError::Load {
            path: path.to_path_buf(),
            source,
        }
    })?;

    // SAFETY: the libretro ABI fixes the signature of this export.
    let get_system_info: Symbol<'_, RetroGetSystemInfo> =
        unsafe { library.get(SYSTEM_INFO_SYMBOL) }.map_err(|source| CoreError::MissingSymbol {
            path: path.to_path_buf(),
            source,
        })?;

    // SAFETY: the symbol is a libretro `retro_get_system_info` and the library stays
    // loaded until `library` drops at the end of this function.
    let info = unsafe { call_system_info(*get_system_info) };

    tracing::debug!(
        "Read system info from {}: {} {} [{}]",
        path,
        info.library_name,
        info.library_version,
        info.valid_extensions
    );

    Ok(info)
}

/// Call a `retro_get_system_info` implementation and copy the result out.
///
/// # Safety
/// `get_system_info` must follow the libretro contract: fill the record with null or
/// null-terminated strings that stay valid for the duration of this call.
unsafe fn call_system_info(get_system_info: RetroGetSystemInfo) -> SystemInfo {
    let mut raw = RetroSystemInfo::default();

    // SAFETY: `raw` is a valid, writable retro_system_info for the duration of the call.
    unsafe { get_system_info(&mut raw) };

    // SAFETY: the strings are valid per the caller's contract; they are copied out here.
    unsafe {
        SystemInfo {
            library_name: read_c_string(raw.library_name),
            library_version: read_c_string(raw.library_version),
            valid_extensions: read_c_string(raw.valid_extensions),
            need_fullpath: raw.need_fullpath,
            block_extract: raw.block_extract,
        }
    }
}

/// # Safety
/// `ptr` must be null or point to a null-terminated string that outlives the call.
unsafe fn read_c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: non-null and null-terminated per the caller's contract.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}
