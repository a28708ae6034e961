//! Quarry: declare a record type once, get DDL, parameterized DML and typed
//! row hydration against a relational store.
//!
//! ```ignore
//! use quarry::{Entity, Projection};
//!
//! #[derive(Debug, Default, Entity)]
//! struct Product {
//!     #[quarry(primary_key, auto_increment)]
//!     id: Option<i64>,
//!     #[quarry(not_null)]
//!     name: String,
//!     #[quarry(not_null)]
//!     price: f64,
//! }
//!
//! Product::create_table(&mut connection, true)?;
//! Product { id: None, name: "widget".into(), price: 9.99 }
//!     .insert(&mut connection, Some(&Projection::of(["name", "price"])))?;
//! ```

pub use quarry_core::*;
pub use quarry_macros::Entity;
