// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Value};

/// Upper bound on the number of rows a table may carry across the bridge.
///
/// The workspace side addresses array elements with 4-byte signed indices,
/// so anything beyond this cannot be represented there.
pub const MAX_ROWS: u64 = i32::MAX as u64;

/// Fails with [`Error::CapacityExceeded`] if `rows` cannot be addressed on
/// the workspace side.
pub fn check_capacity(rows: u64) -> Result<()> {
	if rows > MAX_ROWS {
		return Err(Error::CapacityExceeded {
			rows,
			max: MAX_ROWS,
		});
	}
	Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
	Boolean,
	Int4,
	Float8,
	Utf8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
	pub name: String,
	pub ty: ColumnType,
}

impl Column {
	pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
		Self {
			name: name.into(),
			ty,
		}
	}
}

/// An ordered sequence of typed columns plus an ordered sequence of rows.
///
/// Every row carries exactly one cell per column; column order defines
/// positional alignment with workspace arrays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
	columns: Vec<Column>,
	rows: Vec<Vec<Value>>,
}

impl Table {
	pub fn new(columns: Vec<Column>) -> Self {
		Self {
			columns,
			rows: Vec::new(),
		}
	}

	pub fn with_rows(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self> {
		let mut table = Self::new(columns);
		for row in rows {
			table.push_row(row)?;
		}
		Ok(table)
	}

	pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
		if row.len() != self.columns.len() {
			return Err(Error::RowArityMismatch {
				expected: self.columns.len(),
				actual: row.len(),
			});
		}
		check_capacity(self.rows.len() as u64 + 1)?;
		self.rows.push(row);
		Ok(())
	}

	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
		self.rows.iter().map(|row| row.as_slice())
	}

	pub fn row_count(&self) -> usize {
		self.rows.len()
	}

	pub fn column_count(&self) -> usize {
		self.columns.len()
	}

	pub fn cell(&self, row: usize, column: usize) -> &Value {
		&self.rows[row][column]
	}
}

impl Index<usize> for Table {
	type Output = [Value];

	fn index(&self, index: usize) -> &Self::Output {
		&self.rows[index]
	}
}
