use libsqlite3_sys::*;
use quarry_core::{Error, Result, Value};
use std::{
    ffi::{CStr, c_int},
    slice,
};

unsafe fn column_bytes<'s>(statement: *mut sqlite3_stmt, ptr: *const u8, index: c_int) -> &'s [u8] {
    let len = unsafe { sqlite3_column_bytes(statement, index) } as usize;
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(ptr, len) }
    }
}

pub(crate) fn extract_value(statement: *mut sqlite3_stmt, index: c_int) -> Result<Value> {
    unsafe {
        let column_type = sqlite3_column_type(statement, index);
        Ok(match column_type {
            SQLITE_NULL => Value::Null,
            SQLITE_INTEGER => Value::Integer(sqlite3_column_int64(statement, index)),
            SQLITE_FLOAT => Value::Real(sqlite3_column_double(statement, index)),
            SQLITE_BLOB => {
                let ptr = sqlite3_column_blob(statement, index) as *const u8;
                Value::Blob(column_bytes(statement, ptr, index).into())
            }
            SQLITE_TEXT => {
                let ptr = sqlite3_column_text(statement, index);
                let bytes = column_bytes(statement, ptr, index);
                Value::Text(String::from_utf8(bytes.to_vec()).map_err(|e| {
                    Error::new(e).context(format!("Column {} does not hold valid UTF-8", index))
                })?)
            }
            _ => {
                return Err(Error::msg(format!(
                    "Unexpected column type {}",
                    column_type
                )));
            }
        })
    }
}

pub(crate) fn extract_name(statement: *mut sqlite3_stmt, index: c_int) -> Result<String> {
    unsafe {
        let name = sqlite3_column_name(statement, index);
        if name.is_null() {
            return Err(Error::msg(format!("Column {} has no name", index)));
        }
        Ok(CStr::from_ptr(name).to_str()?.into())
    }
}
