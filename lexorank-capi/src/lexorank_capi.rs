use anyhow::{anyhow, Result};
use lexorank::{LexoRank, Settings};
use std::cmp::Ordering;
use std::ffi::{c_int, CStr, CString};

use std::os::raw::c_char;

const DEFAULT_ERROR: &str = "Unknown error";

#[no_mangle]
/// Load settings from the default configuration files
///
/// `lr_init_default_settings()` reads lexorank.conf and lexorank.yaml from the
/// default configuration directories. The settings define the bucket used by
/// `lr_parse()` for ranks given without one.
///
/// In case of error, `*error` is set to a newly allocated string containing the
/// error message unless NULL was passed.
///
/// # Safety
///
/// The caller must free the error string by calling `lr_free_error()` in case
/// of error.
///
/// # Return value
///
/// Returns 0 on success, -1 on error.
///
pub unsafe extern "C" fn lr_init_default_settings(error: *mut *mut c_char) -> c_int {
    let res = (|| -> Result<()> {
        Settings::set_global(Settings::from_config()?);
        Ok(())
    })();

    match res {
        Ok(_) => 0,
        Err(e) => {
            unsafe { ffi_error(e, error) };
            -1
        }
    }
}

#[no_mangle]
/// Parse a rank
///
/// `lr_parse()` parses `rank`, either in its canonical `bucket|value` form or
/// as a bare value placed in the default bucket. In case of error, NULL is
/// returned and `*error` is set to a newly allocated string containing the
/// error message unless NULL was passed.
///
/// # Safety
///
/// `rank` must be a valid NUL-terminated string.
///
/// The caller must free the rank by calling `lr_free_rank()` in case of
/// success.
///
/// The caller must free the error string by calling `lr_free_error()` in case
/// of error.
///
pub unsafe extern "C" fn lr_parse(rank: *const c_char, error: *mut *mut c_char) -> *mut LexoRank {
    let res = (|| -> Result<*mut LexoRank> {
        let rank = unsafe { CStr::from_ptr(rank) }.to_str()?;
        let rank = Settings::get_global().parse_rank(rank)?;
        Ok(Box::into_raw(Box::new(rank)))
    })();

    match res {
        Ok(res) => res,
        Err(e) => {
            unsafe { ffi_error(e, error) };
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
/// Format a rank
///
/// `lr_to_string()` returns a newly allocated string containing the canonical
/// representation of `rank`. NULL is returned if an error occured and `*error`
/// is set to a newly allocated string containing the error message unless NULL
/// was passed.
///
/// # Safety
///
/// `rank` must be a valid rank returned by this library.
///
/// The caller must free the string by calling `lr_free_string()`.
///
pub unsafe extern "C" fn lr_to_string(
    rank: *const LexoRank,
    error: *mut *mut c_char,
) -> *mut c_char {
    let res = (|| -> Result<CString> {
        let rank = unsafe { rank.as_ref() }.ok_or_else(|| anyhow!("NULL rank"))?;
        Ok(CString::new(rank.to_string())?)
    })();

    match res {
        Ok(res) => res.into_raw(),
        Err(e) => {
            unsafe { ffi_error(e, error) };
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
/// Increment a rank
///
/// `lr_increment()` returns a new rank following `rank`.
///
/// # Safety
///
/// `rank` must be a valid rank returned by this library.
///
/// The resulting rank must be freed by calling `lr_free_rank()`.
///
pub unsafe extern "C" fn lr_increment(rank: *const LexoRank) -> *mut LexoRank {
    match unsafe { rank.as_ref() } {
        Some(rank) => Box::into_raw(Box::new(rank.increment())),
        None => std::ptr::null_mut(),
    }
}

#[no_mangle]
/// Decrement a rank
///
/// `lr_decrement()` returns a new rank preceding `rank`. In case of error,
/// NULL is returned and `*error` is set to a newly allocated string containing
/// the error message unless NULL was passed.
///
/// # Safety
///
/// `rank` must be a valid rank returned by this library.
///
/// The resulting rank must be freed by calling `lr_free_rank()`.
///
pub unsafe extern "C" fn lr_decrement(
    rank: *const LexoRank,
    error: *mut *mut c_char,
) -> *mut LexoRank {
    let res = (|| -> Result<LexoRank> {
        let rank = unsafe { rank.as_ref() }.ok_or_else(|| anyhow!("NULL rank"))?;
        Ok(rank.decrement()?)
    })();

    match res {
        Ok(res) => Box::into_raw(Box::new(res)),
        Err(e) => {
            unsafe { ffi_error(e, error) };
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
/// Compute a rank between two ranks
///
/// `lr_between()` returns a new rank sorting after `before` and before
/// `after`. Either bound may be NULL to insert at the start or at the end of
/// a list, but not both. In case of error, NULL is returned and `*error` is set
/// to a newly allocated string containing the error message unless NULL was
/// passed.
///
/// # Safety
///
/// `before` and `after` must be NULL or valid ranks returned by this library.
///
/// The resulting rank must be freed by calling `lr_free_rank()`.
///
pub unsafe extern "C" fn lr_between(
    before: *const LexoRank,
    after: *const LexoRank,
    error: *mut *mut c_char,
) -> *mut LexoRank {
    let res = (|| -> Result<LexoRank> {
        let (before, after) = unsafe { (before.as_ref(), after.as_ref()) };
        Ok(LexoRank::between(before, after)?)
    })();

    match res {
        Ok(res) => Box::into_raw(Box::new(res)),
        Err(e) => {
            unsafe { ffi_error(e, error) };
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
/// Compare two ranks
///
/// Ranks are ordered by bucket first, then by value. NULL sorts before any
/// rank and is equal to NULL.
///
/// # Safety
///
/// `rank1` and `rank2` must be NULL or valid ranks returned by this library.
///
/// # Return value
///
/// Returns -1, 0 or 1 when `rank1` sorts before, equal to or after `rank2`.
///
pub unsafe extern "C" fn lr_compare(rank1: *const LexoRank, rank2: *const LexoRank) -> c_int {
    let (rank1, rank2) = unsafe { (rank1.as_ref(), rank2.as_ref()) };
    match rank1.cmp(&rank2) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

unsafe fn ffi_error(rust_error: impl std::fmt::Debug, c_error: *mut *mut c_char) {
    if !c_error.is_null() {
        unsafe {
            *c_error = CString::new(format!("{:?}", rust_error))
                .or_else(|_| CString::new(DEFAULT_ERROR))
                .map_or(std::ptr::null_mut(), CString::into_raw);
        }
    }
}

#[no_mangle]
/// Free a rank returned by this library
///
/// # Safety
///
/// `rank` must be NULL or a valid rank returned by this library.
///
pub unsafe extern "C" fn lr_free_rank(rank: *mut LexoRank) {
    if !rank.is_null() {
        unsafe {
            let _ = Box::from_raw(rank);
        };
    }
}

#[no_mangle]
/// Free a string returned by `lr_to_string()`
///
/// # Safety
///
/// `string` must be NULL or a valid string returned by `lr_to_string()`.
///
pub unsafe extern "C" fn lr_free_string(string: *mut c_char) {
    if !string.is_null() {
        unsafe {
            let _ = CString::from_raw(string);
        };
    }
}

#[no_mangle]
/// Free an error string returned by any function in this library
///
/// # Safety
///
/// `error` must be NULL or a valid error string returned by this library.
///
pub unsafe extern "C" fn lr_free_error(error: *mut c_char) {
    unsafe {
        if !error.is_null() {
            let _ = CString::from_raw(error);
        }
    };
}
