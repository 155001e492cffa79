// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use matlink_type::{ColumnType, Error, Result, Table, check_capacity};

use crate::{WorkspaceMap, WorkspaceValue};

enum ColumnBuffer {
	Float8(Vec<Option<f64>>),
	Utf8(Vec<Option<String>>),
}

/// Converts a table into a workspace map with one fixed-length array per
/// column.
///
/// Text columns are read through the nominal accessor into `utf8[]`;
/// integer and float columns are read through the numeric accessor into
/// `float8[]`, which is where the integer-to-float collapse on the
/// round-trip comes from. Boolean columns have no workspace mapping and
/// fail the whole conversion; there is no silent coercion on this path.
///
/// Column order and row order are preserved exactly. The input is not
/// mutated.
pub fn table_to_workspace(table: &Table) -> Result<WorkspaceMap> {
	check_capacity(table.row_count() as u64)?;
	let rows = table.row_count();

	let mut buffers = Vec::with_capacity(table.column_count());
	for column in table.columns() {
		let buffer = match column.ty {
			ColumnType::Utf8 => ColumnBuffer::Utf8(vec![None; rows]),
			ColumnType::Int4 | ColumnType::Float8 => {
				ColumnBuffer::Float8(vec![None; rows])
			}
			ColumnType::Boolean => {
				return Err(Error::unsupported(&column.name, "boolean"));
			}
		};
		buffers.push(buffer);
	}

	for (row_index, row) in table.rows().enumerate() {
		for (buffer, cell) in buffers.iter_mut().zip(row) {
			match buffer {
				ColumnBuffer::Float8(values) => {
					values[row_index] = cell.as_float8();
				}
				ColumnBuffer::Utf8(values) => {
					values[row_index] = cell.as_utf8().map(str::to_string);
				}
			}
		}
	}

	let mut map = WorkspaceMap::with_capacity(table.column_count());
	for (column, buffer) in table.columns().iter().zip(buffers) {
		let value = match buffer {
			ColumnBuffer::Float8(values) => WorkspaceValue::Float8Array(values),
			ColumnBuffer::Utf8(values) => WorkspaceValue::Utf8Array(values),
		};
		map.insert(column.name.clone(), value);
	}
	Ok(map)
}

#[cfg(test)]
mod tests {
	use matlink_type::{Column, ColumnType, Table, Value};

	use super::*;

	fn sample_table() -> Table {
		Table::with_rows(
			vec![
				Column::new("count", ColumnType::Int4),
				Column::new("ratio", ColumnType::Float8),
				Column::new("label", ColumnType::Utf8),
			],
			vec![
				vec![Value::int4(1), Value::float8(0.5), Value::utf8("a")],
				vec![Value::Undefined, Value::float8(1.5), Value::Undefined],
				vec![Value::int4(3), Value::Undefined, Value::utf8("c")],
			],
		)
		.unwrap()
	}

	#[test]
	fn test_one_entry_per_column_in_order() {
		let map = table_to_workspace(&sample_table()).unwrap();
		let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
		assert_eq!(names, vec!["count", "ratio", "label"]);
	}

	#[test]
	fn test_int_column_widens_to_float8_array() {
		let map = table_to_workspace(&sample_table()).unwrap();
		assert_eq!(
			map.get("count"),
			Some(&WorkspaceValue::Float8Array(vec![Some(1.0), None, Some(3.0)]))
		);
	}

	#[test]
	fn test_utf8_column_keeps_missing_slots() {
		let map = table_to_workspace(&sample_table()).unwrap();
		assert_eq!(
			map.get("label"),
			Some(&WorkspaceValue::Utf8Array(vec![
				Some("a".to_string()),
				None,
				Some("c".to_string())
			]))
		);
	}

	#[test]
	fn test_boolean_column_is_fatal() {
		let table = Table::with_rows(
			vec![Column::new("flag", ColumnType::Boolean)],
			vec![vec![Value::bool(true)]],
		)
		.unwrap();
		let err = table_to_workspace(&table).unwrap_err();
		assert!(matches!(err, Error::UnsupportedType { column, ty }
			if column == "flag" && ty == "boolean"));
	}

	#[test]
	fn test_empty_table() {
		let table = Table::new(vec![Column::new("a", ColumnType::Float8)]);
		let map = table_to_workspace(&table).unwrap();
		assert_eq!(map.get("a"), Some(&WorkspaceValue::Float8Array(vec![])));
	}
}
