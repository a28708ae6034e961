mod introspection;
mod membership;
mod nullability;
mod products;
mod rows;
mod strict;

use crate::{
    introspection::introspection, membership::membership, nullability::nullability,
    products::products, rows::rows, strict::strict,
};
use log::LevelFilter;
use quarry::Connection;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run every behavioural scenario against `connection`.
pub fn execute_tests<C: Connection>(mut connection: C) {
    products(&mut connection);
    membership(&mut connection);
    nullability(&mut connection);
    rows(&mut connection);
    introspection(&mut connection);
    strict(&mut connection);
}

/// Run the code with logging turned off, evaluating to its value. Useful
/// around operations expected to fail, they log their errors.
#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        let result = { $($code)+ };
        log::set_max_level(level);
        result
    }};
}
