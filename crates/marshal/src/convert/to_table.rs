// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use matlink_type::{Error, Result, Table, Value};
use tracing::warn;

use crate::{Resolved, WorkspaceMap, WorkspaceValue, resolve};

/// Rebuilds a table from a workspace map.
///
/// Column specs come from resolving every entry in map order. An entry the
/// resolver cannot type is dropped with a warning and conversion continues;
/// this is the only recoverable failure on this path, because the remaining
/// columns are still convertible.
///
/// The row count is taken from the first resolved entry alone: its array
/// length, 1 if it is a scalar, 0 if it is a null entry. Every later array
/// entry must match that count exactly or the conversion fails with
/// [`Error::InconsistentColumnLength`]; the check is per column so a short
/// array can never silently truncate the cell matrix.
pub fn workspace_to_table(map: &WorkspaceMap) -> Result<Table> {
	let mut resolved = Vec::with_capacity(map.len());
	for (name, value) in map.iter() {
		match resolve(name, value) {
			Ok(entry) => resolved.push(entry),
			Err(error) => {
				warn!(column = name, %error, "dropping unresolvable column");
			}
		}
	}

	let row_count = resolved.first().map_or(0, |entry| entry.value.row_span());

	let mut cells = vec![vec![Value::Undefined; resolved.len()]; row_count];
	for (column_index, entry) in resolved.iter().enumerate() {
		write_column(&mut cells, column_index, entry, row_count)?;
	}

	let columns = resolved.into_iter().map(|entry| entry.column).collect();
	Table::with_rows(columns, cells)
}

fn write_column(
	cells: &mut [Vec<Value>],
	column_index: usize,
	entry: &Resolved,
	row_count: usize,
) -> Result<()> {
	if entry.value.is_array() {
		let actual = entry.value.row_span();
		if actual != row_count {
			return Err(Error::InconsistentColumnLength {
				column: entry.column.name.clone(),
				expected: row_count,
				actual,
			});
		}
	}

	match &entry.value {
		// A null entry contributes no cells; the column stays all-missing.
		WorkspaceValue::Undefined => {}
		WorkspaceValue::Float8Array(values) => {
			for (row, value) in values.iter().enumerate() {
				if let Some(v) = value {
					cells[row][column_index] = Value::Float8(*v);
				}
			}
		}
		WorkspaceValue::Int4Array(values) => {
			for (row, value) in values.iter().enumerate() {
				if let Some(v) = value {
					cells[row][column_index] = Value::Int4(*v);
				}
			}
		}
		WorkspaceValue::Utf8Array(values) => {
			for (row, value) in values.iter().enumerate() {
				cells[row][column_index] = utf8_cell(value.as_deref());
			}
		}
		WorkspaceValue::Utf8List(values) => {
			for (row, value) in values.iter().enumerate() {
				cells[row][column_index] = utf8_cell(Some(value));
			}
		}
		WorkspaceValue::Float8(v) => {
			if row_count > 0 {
				cells[0][column_index] = Value::Float8(*v);
			}
		}
		WorkspaceValue::Int4(v) => {
			if row_count > 0 {
				cells[0][column_index] = Value::Int4(*v);
			}
		}
		WorkspaceValue::Utf8(v) => {
			if row_count > 0 {
				cells[0][column_index] = utf8_cell(Some(v));
			}
		}
		// The resolver rejected booleans and normalized dynamics.
		WorkspaceValue::Boolean(_)
		| WorkspaceValue::BooleanArray(_)
		| WorkspaceValue::Dynamic(_) => unreachable!("unresolved value in cell writer"),
	}
	Ok(())
}

/// A null or empty string becomes a missing cell. This conflates "absent"
/// and "empty", which is long-standing observable behavior.
fn utf8_cell(value: Option<&str>) -> Value {
	match value {
		None => Value::Undefined,
		Some("") => Value::Undefined,
		Some(v) => Value::Utf8(v.to_string()),
	}
}
