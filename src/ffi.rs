//! FFI bindings for Quiz Sentinel
//!
//! C-compatible functions for calling the analyzer from a host application.
//! Inputs are null-terminated UTF-8 strings; returned strings are allocated
//! here and must be released with `sentinel_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::DetectorConfig;
use crate::error::AnalysisError;
use crate::pipeline::{analyze, session_to_report, SessionAnalyzer};
use crate::schema::{parse_events, ParseMode};

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Convert a Rust string to an owned C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Hand a result across the boundary, recording the error on failure
fn into_c_result(result: Result<String, AnalysisError>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Analyze a `QuizSession` JSON document and return the JSON report.
///
/// # Safety
/// - `session_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `sentinel_free_string`.
/// - Returns NULL on error; call `sentinel_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn sentinel_analyze_session(session_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json = match cstr_to_string(session_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid session JSON string pointer");
            return ptr::null_mut();
        }
    };

    into_c_result(session_to_report(json))
}

/// Analyze a bare event stream (JSON array or NDJSON) and return the verdict JSON.
///
/// # Safety
/// - `events_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `sentinel_free_string`.
/// - Returns NULL on error; call `sentinel_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn sentinel_analyze_events(
    events_json: *const c_char,
    score: u32,
    total_questions: u32,
    session_start_ms: i64,
) -> *mut c_char {
    clear_last_error();

    let input = match cstr_to_string(events_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid events string pointer");
            return ptr::null_mut();
        }
    };

    let result = parse_events(&input, ParseMode::Lenient).and_then(|events| {
        let verdict = analyze(&events, score, total_questions, session_start_ms);
        serde_json::to_string(&verdict).map_err(AnalysisError::JsonError)
    });
    into_c_result(result)
}

// ============================================================================
// Stateful Analyzer API
// ============================================================================

/// Opaque handle to a SessionAnalyzer
pub struct SentinelAnalyzerHandle {
    analyzer: SessionAnalyzer,
}

/// Create an analyzer, optionally from a (partial) configuration JSON.
///
/// # Safety
/// - `config_json` may be NULL for the default configuration.
/// - Must be freed with `sentinel_analyzer_free`.
/// - Returns NULL on an invalid configuration.
#[no_mangle]
pub unsafe extern "C" fn sentinel_analyzer_new(
    config_json: *const c_char,
) -> *mut SentinelAnalyzerHandle {
    clear_last_error();

    let analyzer = if config_json.is_null() {
        Ok(SessionAnalyzer::new())
    } else {
        match cstr_to_string(config_json) {
            Some(json) => {
                DetectorConfig::from_json(&json).and_then(SessionAnalyzer::with_config)
            }
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        }
    };

    match analyzer {
        Ok(analyzer) => Box::into_raw(Box::new(SentinelAnalyzerHandle { analyzer })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free an analyzer.
///
/// # Safety
/// - `analyzer` must be a pointer returned by `sentinel_analyzer_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn sentinel_analyzer_free(analyzer: *mut SentinelAnalyzerHandle) {
    if !analyzer.is_null() {
        drop(Box::from_raw(analyzer));
    }
}

/// Analyze a session document with an existing analyzer.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `sentinel_analyzer_new`.
/// - `session_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `sentinel_free_string`.
#[no_mangle]
pub unsafe extern "C" fn sentinel_analyzer_process(
    analyzer: *const SentinelAnalyzerHandle,
    session_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if analyzer.is_null() {
        set_last_error("Null analyzer handle");
        return ptr::null_mut();
    }

    let json = match cstr_to_string(session_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid session JSON string pointer");
            return ptr::null_mut();
        }
    };

    into_c_result((*analyzer).analyzer.process_json(&json))
}

// ============================================================================
// Memory and errors
// ============================================================================

/// Free a string returned by a sentinel function.
///
/// # Safety
/// - `ptr` must be a pointer returned by a sentinel function, or NULL.
#[no_mangle]
pub unsafe extern "C" fn sentinel_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message.
///
/// # Safety
/// - The returned pointer is thread-local and valid until the next sentinel call
///   on this thread. Do NOT free it.
/// - Returns NULL if the last call succeeded.
#[no_mangle]
pub unsafe extern "C" fn sentinel_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn sentinel_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
