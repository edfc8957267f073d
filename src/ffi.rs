//! C-ABI FFI bindings for cross-language integration.
//!
//! Lets a host application (desktop or web shell) run the filter without
//! linking Rust directly. Strings cross the boundary as null-terminated
//! UTF-8 and must be released with the matching free function.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

use crate::model::JsonFormat;
use crate::{detect, filter_file, BandFilter, FilterMode, RunOutcome};

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct BandfilterResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Whether the run kept no pages (only meaningful on success).
    pub no_matches: bool,
    /// JSON report (null if failed). Must be freed with `bandfilter_free_result`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `bandfilter_free_result`.
    pub error: *mut c_char,
}

impl BandfilterResult {
    fn success(data: String, no_matches: bool) -> Self {
        Self {
            success: true,
            no_matches,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            no_matches: false,
            data: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }
}

unsafe fn str_arg<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{} cannot be null", name));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 {}", name))
}

/// Filter a PDF file and write the kept pages to `output_path`.
///
/// `mode` is `both`, `band` or `orchestra`. On success `data` holds the JSON
/// report; when no page matched, nothing is written and `no_matches` is set.
///
/// # Safety
///
/// `path`, `mode` and `output_path` must be valid null-terminated UTF-8
/// strings. The returned result must be freed with `bandfilter_free_result`.
#[no_mangle]
pub unsafe extern "C" fn bandfilter_filter_file(
    path: *const c_char,
    mode: *const c_char,
    output_path: *const c_char,
) -> BandfilterResult {
    let args = str_arg(path, "path").and_then(|path| {
        let mode = str_arg(mode, "mode")?;
        let output = str_arg(output_path, "output_path")?;
        Ok((path, mode, output))
    });

    let (path, mode, output) = match args {
        Ok(args) => args,
        Err(message) => return BandfilterResult::error(message),
    };

    match filter_internal(Path::new(path), mode, Path::new(output)) {
        Ok((json, no_matches)) => BandfilterResult::success(json, no_matches),
        Err(e) => BandfilterResult::error(e.to_string()),
    }
}

fn filter_internal(path: &Path, mode: &str, output: &Path) -> crate::Result<(String, bool)> {
    let mode: FilterMode = mode.parse()?;
    finish(filter_file(path, mode)?, output)
}

/// Filter an uploaded PDF held in memory and write the kept pages to
/// `output_path`.
///
/// `mime_type` is the type the upload declared; anything but
/// `application/pdf` is rejected before the data is read.
///
/// # Safety
///
/// `data` must point to `len` readable bytes. `mime_type`, `mode` and
/// `output_path` must be valid null-terminated UTF-8 strings. The returned
/// result must be freed with `bandfilter_free_result`.
#[no_mangle]
pub unsafe extern "C" fn bandfilter_filter_upload(
    data: *const u8,
    len: usize,
    mime_type: *const c_char,
    mode: *const c_char,
    output_path: *const c_char,
) -> BandfilterResult {
    if data.is_null() {
        return BandfilterResult::error("data cannot be null".to_string());
    }

    let args = str_arg(mime_type, "mime_type").and_then(|mime| {
        let mode = str_arg(mode, "mode")?;
        let output = str_arg(output_path, "output_path")?;
        Ok((mime, mode, output))
    });

    let (mime, mode, output) = match args {
        Ok(args) => args,
        Err(message) => return BandfilterResult::error(message),
    };

    let bytes = std::slice::from_raw_parts(data, len);
    let result = BandFilter::new()
        .mode_name(mode)
        .and_then(|filter| filter.filter_upload(bytes, mime))
        .and_then(|outcome| finish(outcome, Path::new(output)));

    match result {
        Ok((json, no_matches)) => BandfilterResult::success(json, no_matches),
        Err(e) => BandfilterResult::error(e.to_string()),
    }
}

/// Write the filtered PDF, if any, and return the JSON report.
fn finish(outcome: RunOutcome, output: &Path) -> crate::Result<(String, bool)> {
    if let RunOutcome::Filtered(ref pdf) = outcome {
        pdf.write_to(output)?;
    }

    let json = outcome.report().to_json(JsonFormat::Compact)?;
    Ok((json, outcome.is_no_matches()))
}

/// Check if a file starts with a PDF header.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn bandfilter_is_pdf(path: *const c_char) -> bool {
    match str_arg(path, "path") {
        Ok(path) => detect::detect_format_from_path(Path::new(path)).is_ok(),
        Err(_) => false,
    }
}

/// Free a result returned by any bandfilter function.
///
/// # Safety
///
/// The `result` must have been returned by a bandfilter function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn bandfilter_free_result(result: BandfilterResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Get the version of the bandfilter library.
///
/// The returned string is statically allocated and must not be freed.
#[no_mangle]
pub extern "C" fn bandfilter_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let version = bandfilter_version();
        assert!(!version.is_null());
    }

    #[test]
    fn test_null_path() {
        unsafe {
            let mode = CString::new("both").unwrap();
            let out = CString::new("out.pdf").unwrap();
            let result = bandfilter_filter_file(ptr::null(), mode.as_ptr(), out.as_ptr());
            assert!(!result.success);
            assert!(!result.error.is_null());
            bandfilter_free_result(result);
        }
    }

    #[test]
    fn test_unknown_mode() {
        unsafe {
            let path = CString::new("missing.pdf").unwrap();
            let mode = CString::new("choir").unwrap();
            let out = CString::new("out.pdf").unwrap();
            let result = bandfilter_filter_file(path.as_ptr(), mode.as_ptr(), out.as_ptr());
            assert!(!result.success);
            let message = CStr::from_ptr(result.error).to_str().unwrap().to_string();
            assert!(message.contains("choir"));
            bandfilter_free_result(result);
        }
    }

    #[test]
    fn test_is_pdf_null() {
        unsafe {
            assert!(!bandfilter_is_pdf(ptr::null()));
        }
    }

    #[test]
    fn test_upload_rejects_wrong_mime_type() {
        let data = b"%PDF-1.7\n";
        unsafe {
            let mime = CString::new("text/html").unwrap();
            let mode = CString::new("both").unwrap();
            let out = CString::new("out.pdf").unwrap();
            let result = bandfilter_filter_upload(
                data.as_ptr(),
                data.len(),
                mime.as_ptr(),
                mode.as_ptr(),
                out.as_ptr(),
            );
            assert!(!result.success);
            let message = CStr::from_ptr(result.error).to_str().unwrap().to_string();
            assert!(message.contains("text/html"));
            bandfilter_free_result(result);
        }
    }

    #[test]
    fn test_upload_null_data() {
        unsafe {
            let mime = CString::new("application/pdf").unwrap();
            let mode = CString::new("both").unwrap();
            let out = CString::new("out.pdf").unwrap();
            let result = bandfilter_filter_upload(
                ptr::null(),
                0,
                mime.as_ptr(),
                mode.as_ptr(),
                out.as_ptr(),
            );
            assert!(!result.success);
            bandfilter_free_result(result);
        }
    }
}
