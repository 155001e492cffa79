// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

pub use error::Error;
pub use table::{Column, ColumnType, MAX_ROWS, Table, check_capacity};
pub use value::Value;

mod error;
mod table;
mod value;

pub type Result<T> = std::result::Result<T, Error>;
