mod bind;
mod cbox;
mod connection;
mod driver;
mod extract;
mod sql_writer;

use libsqlite3_sys::{sqlite3, sqlite3_errmsg};
use quarry_core::{Error, MappingError};
use std::{
    ffi::{CStr, c_char, c_int},
    ptr,
};

pub(crate) use cbox::*;
pub use connection::*;
pub use driver::*;
pub use sql_writer::*;

pub(crate) fn error_message_from_ptr<'a>(ptr: *const c_char) -> &'a str {
    if ptr != ptr::null() {
        unsafe { CStr::from_ptr(ptr) }
            .to_str()
            .unwrap_or("Unknown error (the error message was not a valid C string)")
    } else {
        "Unknown error (could not extract the error message)"
    }
}

/// Error reported by SQLite on `connection` with result code `code`.
pub(crate) fn store_error(connection: *mut sqlite3, code: c_int) -> Error {
    let message = if connection.is_null() {
        "Out of memory".to_string()
    } else {
        error_message_from_ptr(unsafe { sqlite3_errmsg(connection) }).to_string()
    };
    MappingError::Store { code, message }.into()
}
