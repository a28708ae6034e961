mod as_value;
mod builder;
mod column_info;
mod connection;
mod decode_type;
mod descriptor;
mod driver;
mod entity;
mod error;
mod executor;
mod hydrate;
mod primary_key;
mod query;
mod resolver;
pub mod scaffold;
mod storage_type;
mod util;
mod value;
mod value_set;
mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use builder::*;
pub use column_info::*;
pub use connection::*;
pub use decode_type::*;
pub use descriptor::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use hydrate::*;
pub use primary_key::*;
pub use query::*;
pub use resolver::*;
pub use storage_type::*;
pub use util::*;
pub use value::*;
pub use value_set::*;
pub use writer::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
