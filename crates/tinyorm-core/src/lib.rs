//! # tinyorm-core — Key Casing and Deep Case Conversion
//!
//! The leaf crate of the tinyorm workspace. It owns the two pieces of
//! logic every other crate needs when moving model data across a storage
//! boundary:
//!
//! 1. **Key casing.** `to_snake_case` / `to_camel_case` and the [`KeyCase`]
//!    selector. Models speak camelCase; row/column stores speak snake_case.
//!
//! 2. **Deep case conversion.** [`change_case_deep`] rebuilds a JSON value
//!    with every object key renamed, recursing through nested objects and
//!    arrays. Converting to snake_case and back reproduces the input.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tinyorm-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod casing;
pub mod convert;

pub use casing::{to_camel_case, to_snake_case, KeyCase, UnknownKeyCase};
pub use convert::{change_case_deep, to_camel_case_deep, to_snake_case_deep};
