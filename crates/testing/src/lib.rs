// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

//! Table fixtures shared by the matlink test suites.

use matlink_type::{Column, ColumnType, Table, Value};

/// A three-column table (int4, float8, utf8) with a missing cell in every
/// column, the shape most bridge tests care about.
pub fn mixed_table() -> Table {
	Table::with_rows(
		vec![
			Column::new("count", ColumnType::Int4),
			Column::new("ratio", ColumnType::Float8),
			Column::new("label", ColumnType::Utf8),
		],
		vec![
			vec![Value::int4(1), Value::float8(0.25), Value::utf8("alpha")],
			vec![Value::Undefined, Value::float8(0.5), Value::utf8("beta")],
			vec![Value::int4(3), Value::Undefined, Value::Undefined],
			vec![Value::int4(4), Value::float8(1.0), Value::utf8("delta")],
		],
	)
	.expect("fixture rows match fixture columns")
}

/// A two-column (float8, utf8) three-row table, matching the remote
/// push scenario the transport tests script against.
pub fn push_table() -> Table {
	Table::with_rows(
		vec![
			Column::new("value", ColumnType::Float8),
			Column::new("name", ColumnType::Utf8),
		],
		vec![
			vec![Value::float8(1.5), Value::utf8("one")],
			vec![Value::float8(2.5), Value::utf8("two")],
			vec![Value::float8(3.5), Value::utf8("three")],
		],
	)
	.expect("fixture rows match fixture columns")
}
