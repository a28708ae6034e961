use crate::store_error;
use libsqlite3_sys::*;
use quarry_core::{Error, Result, Value};
use std::{
    ffi::{c_char, c_int, c_void},
    ptr,
};

fn length(len: usize) -> Result<c_int> {
    c_int::try_from(len).map_err(|_| Error::msg(format!("Value of {} bytes is too large to bind", len)))
}

/// Bind `params` to the placeholders of `statement`, in order starting from 1.
pub(crate) fn bind_params(statement: *mut sqlite3_stmt, params: &[Value]) -> Result<()> {
    let expected = unsafe { sqlite3_bind_parameter_count(statement) } as usize;
    if expected != params.len() {
        return Err(Error::msg(format!(
            "The statement has {} placeholders but {} values were supplied",
            expected,
            params.len()
        )));
    }
    for (i, value) in params.iter().enumerate() {
        let index = (i + 1) as c_int;
        let rc = unsafe {
            match value {
                Value::Null => sqlite3_bind_null(statement, index),
                Value::Integer(v) => sqlite3_bind_int64(statement, index, *v),
                Value::Real(v) => sqlite3_bind_double(statement, index, *v),
                Value::Text(v) => sqlite3_bind_text(
                    statement,
                    index,
                    v.as_ptr() as *const c_char,
                    length(v.len())?,
                    SQLITE_TRANSIENT(),
                ),
                Value::Blob(v) => sqlite3_bind_blob(
                    statement,
                    index,
                    if v.is_empty() {
                        ptr::dangling::<c_void>()
                    } else {
                        v.as_ptr() as *const c_void
                    },
                    length(v.len())?,
                    SQLITE_TRANSIENT(),
                ),
            }
        };
        if rc != SQLITE_OK {
            let error = store_error(unsafe { sqlite3_db_handle(statement) }, rc)
                .context(format!("Cannot bind parameter {} ({})", index, value));
            log::error!("{:#}", error);
            return Err(error);
        }
    }
    Ok(())
}
