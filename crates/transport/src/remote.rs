// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use matlink_marshal::WorkspaceValue;
use matlink_type::{Column, ColumnType, Error, Result, Table, Value};
use tracing::debug;

use crate::CodeGen;

/// The live remote session boundary: synchronous, blocking, and capable of
/// failing any round-trip with [`Error::RemoteInvocation`].
pub trait RemoteWorkspace {
	/// Evaluates a command for its side effect.
	fn eval(&mut self, command: &str) -> Result<()>;

	/// Fetches a single workspace variable.
	fn get_variable(&mut self, query: &str) -> Result<WorkspaceValue>;

	/// Fetches one value per output variable, as a row query returns them.
	fn get_row(&mut self, query: &str) -> Result<Vec<WorkspaceValue>>;
}

/// Pushes tables into and pulls tables out of a live remote workspace,
/// row by row.
///
/// Every row is one blocking round-trip; there is no pipelining and no
/// batching, and the protocol relies on append commands arriving in table
/// row order. A failed round-trip aborts the whole transfer and leaves any
/// partially pushed or pulled state to the caller; this adapter assumes
/// exclusive use of the remote session for the duration of one operation.
pub struct RemoteTransport<R, G> {
	remote: R,
	generator: G,
}

impl<R: RemoteWorkspace, G: CodeGen> RemoteTransport<R, G> {
	pub fn new(remote: R, generator: G) -> Self {
		Self {
			remote,
			generator,
		}
	}

	pub fn into_remote(self) -> R {
		self.remote
	}

	/// Pushes `table` into the remote workspace: one instantiation
	/// command, one append command per row in table order, one metadata
	/// command.
	pub fn push(&mut self, table: &Table) -> Result<()> {
		let column_names: Vec<String> =
			table.columns().iter().map(|column| column.name.clone()).collect();
		let column_types: Vec<ColumnType> =
			table.columns().iter().map(|column| column.ty).collect();
		let variables = self.generator.variable_names(&column_names);

		self.remote.eval(&self.generator.instantiation_command(&variables, &column_types))?;

		for row in table.rows() {
			self.remote.eval(&self.generator.append_row_command(&variables, row))?;
		}

		self.remote.eval(&self.generator.metadata_command(&variables, &column_names))?;

		debug!(rows = table.row_count(), columns = column_names.len(), "pushed table");
		Ok(())
	}

	/// Pulls the output table from the remote workspace: names and type
	/// strings first, then the row count, then one row query per 1-based
	/// row index.
	pub fn pull(&mut self) -> Result<Table> {
		let names = expect_strings(
			self.remote.get_variable(&self.generator.output_names_query())?,
			"output variable names",
		)?;
		let types = expect_strings(
			self.remote.get_variable(&self.generator.output_types_query())?,
			"output variable types",
		)?;
		if names.len() != types.len() {
			return Err(Error::remote(format!(
				"{} output names but {} type strings",
				names.len(),
				types.len()
			)));
		}

		let rows = expect_row_count(
			self.remote.get_variable(&self.generator.output_row_count_query())?,
		)?;

		let mut columns = Vec::with_capacity(names.len());
		for (name, ty) in names.iter().zip(&types) {
			columns.push(Column::new(name, map_remote_type(name, ty)?));
		}

		let mut table = Table::new(columns);
		for row in 1..=rows {
			let values = self.remote.get_row(&self.generator.output_row_query(row, &names))?;
			if values.len() != table.column_count() {
				return Err(Error::remote(format!(
					"row {} returned {} values for {} columns",
					row,
					values.len(),
					table.column_count()
				)));
			}
			let mut cells = Vec::with_capacity(values.len());
			for (value, column) in values.iter().zip(table.columns()) {
				cells.push(unwrap_cell(value, column)?);
			}
			table.push_row(cells)?;
		}

		debug!(rows = table.row_count(), columns = table.column_count(), "pulled table");
		Ok(table)
	}
}

/// Maps a workspace-reported type string to a column type. Anything beyond
/// numeric and text containers has no table mapping.
fn map_remote_type(column: &str, ty: &str) -> Result<ColumnType> {
	match ty {
		"double" => Ok(ColumnType::Float8),
		"char" | "cell" => Ok(ColumnType::Utf8),
		other => Err(Error::unsupported(column, other)),
	}
}

fn expect_strings(value: WorkspaceValue, what: &str) -> Result<Vec<String>> {
	match value {
		WorkspaceValue::Utf8(v) => Ok(vec![v]),
		WorkspaceValue::Utf8List(values) => Ok(values),
		WorkspaceValue::Utf8Array(values) => values
			.into_iter()
			.map(|value| value.ok_or_else(|| Error::remote(format!("null entry in {}", what))))
			.collect(),
		other => Err(Error::remote(format!("expected {} as strings, got {}", what, other.type_name()))),
	}
}

fn expect_row_count(value: WorkspaceValue) -> Result<usize> {
	let count = match value {
		WorkspaceValue::Float8(v) => v,
		WorkspaceValue::Float8Array(values) => match values.first() {
			Some(Some(v)) => *v,
			_ => return Err(Error::remote("empty row count result")),
		},
		WorkspaceValue::Int4(v) => v as f64,
		other => {
			return Err(Error::remote(format!(
				"expected numeric row count, got {}",
				other.type_name()
			)));
		}
	};
	if !(0.0..=i32::MAX as f64).contains(&count) {
		return Err(Error::remote(format!("row count {} out of range", count)));
	}
	// A fractional count means the remote returned something that was
	// never a row count; truncating it would silently drop rows.
	if count.fract() != 0.0 {
		return Err(Error::remote(format!("row count {} is not an integer", count)));
	}
	Ok(count as usize)
}

/// Each row query returns a single-element array per column; unwrap it into
/// one cell.
fn unwrap_cell(value: &WorkspaceValue, column: &Column) -> Result<Value> {
	match (column.ty, value) {
		(ColumnType::Float8, WorkspaceValue::Float8Array(values)) => match values.first() {
			Some(Some(v)) => Ok(Value::Float8(*v)),
			Some(None) => Ok(Value::Undefined),
			None => Err(empty_cell(column)),
		},
		(ColumnType::Float8, WorkspaceValue::Float8(v)) => Ok(Value::Float8(*v)),
		(ColumnType::Utf8, WorkspaceValue::Utf8Array(values)) => match values.first() {
			Some(Some(v)) => Ok(Value::Utf8(v.clone())),
			Some(None) => Ok(Value::Undefined),
			None => Err(empty_cell(column)),
		},
		(ColumnType::Utf8, WorkspaceValue::Utf8List(values)) => match values.first() {
			Some(v) => Ok(Value::Utf8(v.clone())),
			None => Err(empty_cell(column)),
		},
		(ColumnType::Utf8, WorkspaceValue::Utf8(v)) => Ok(Value::Utf8(v.clone())),
		(ty, other) => Err(Error::remote(format!(
			"column '{}' expected {:?} data, got {}",
			column.name,
			ty,
			other.type_name()
		))),
	}
}

fn empty_cell(column: &Column) -> Error {
	Error::remote(format!("empty value for column '{}'", column.name))
}

#[cfg(test)]
mod tests {
	use std::collections::VecDeque;

	use matlink_testing::push_table;
	use matlink_type::{ColumnType, Error, Value};

	use super::*;

	/// Joins cells with commas; enough structure for the scripted remote
	/// to assert against.
	struct PlainCodeGen;

	impl CodeGen for PlainCodeGen {
		fn variable_names(&self, column_names: &[String]) -> Vec<String> {
			column_names.iter().map(|name| format!("in_{}", name)).collect()
		}

		fn instantiation_command(
			&self,
			variables: &[String],
			_column_types: &[ColumnType],
		) -> String {
			format!("init {}", variables.join(","))
		}

		fn append_row_command(&self, _variables: &[String], row: &[Value]) -> String {
			let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
			format!("append {}", cells.join(","))
		}

		fn metadata_command(&self, _variables: &[String], column_names: &[String]) -> String {
			format!("names {}", column_names.join(","))
		}

		fn output_names_query(&self) -> String {
			"out_names".to_string()
		}

		fn output_types_query(&self) -> String {
			"out_types".to_string()
		}

		fn output_row_count_query(&self) -> String {
			"out_rows".to_string()
		}

		fn output_row_query(&self, row: usize, _variables: &[String]) -> String {
			format!("row {}", row)
		}
	}

	#[derive(Default)]
	struct ScriptedRemote {
		evals: Vec<String>,
		variables: Vec<(String, WorkspaceValue)>,
		rows: VecDeque<Vec<WorkspaceValue>>,
		row_queries: Vec<String>,
		fail_eval_at: Option<usize>,
	}

	impl RemoteWorkspace for ScriptedRemote {
		fn eval(&mut self, command: &str) -> Result<()> {
			if self.fail_eval_at == Some(self.evals.len()) {
				return Err(Error::remote("engine rejected command"));
			}
			self.evals.push(command.to_string());
			Ok(())
		}

		fn get_variable(&mut self, query: &str) -> Result<WorkspaceValue> {
			self.variables
				.iter()
				.find(|(name, _)| name == query)
				.map(|(_, value)| value.clone())
				.ok_or_else(|| Error::remote(format!("no variable '{}'", query)))
		}

		fn get_row(&mut self, query: &str) -> Result<Vec<WorkspaceValue>> {
			self.row_queries.push(query.to_string());
			self.rows.pop_front().ok_or_else(|| Error::remote("no more rows"))
		}
	}

	fn pull_remote(rows: usize) -> ScriptedRemote {
		let mut remote = ScriptedRemote::default();
		remote.variables = vec![
			(
				"out_names".to_string(),
				WorkspaceValue::Utf8List(vec!["a".to_string(), "b".to_string()]),
			),
			(
				"out_types".to_string(),
				WorkspaceValue::Utf8List(vec!["double".to_string(), "char".to_string()]),
			),
			("out_rows".to_string(), WorkspaceValue::Float8Array(vec![Some(rows as f64)])),
		];
		for row in 0..rows {
			remote.rows.push_back(vec![
				WorkspaceValue::Float8Array(vec![Some(row as f64 + 0.5)]),
				WorkspaceValue::Utf8Array(vec![Some(format!("r{}", row))]),
			]);
		}
		remote
	}

	#[test]
	fn test_push_command_sequence() {
		let mut transport = RemoteTransport::new(ScriptedRemote::default(), PlainCodeGen);
		transport.push(&push_table()).unwrap();

		let remote = transport.into_remote();
		assert_eq!(remote.evals.len(), 5);
		assert_eq!(remote.evals[0], "init in_value,in_name");
		assert_eq!(remote.evals[1], "append 1.5,one");
		assert_eq!(remote.evals[2], "append 2.5,two");
		assert_eq!(remote.evals[3], "append 3.5,three");
		assert_eq!(remote.evals[4], "names value,name");
	}

	#[test]
	fn test_push_aborts_on_remote_failure() {
		let remote = ScriptedRemote {
			fail_eval_at: Some(2),
			..ScriptedRemote::default()
		};
		let mut transport = RemoteTransport::new(remote, PlainCodeGen);

		let err = transport.push(&push_table()).unwrap_err();
		assert!(matches!(err, Error::RemoteInvocation { .. }));

		// One instantiation and one append made it out before the abort.
		let remote = transport.into_remote();
		assert_eq!(remote.evals.len(), 2);
	}

	#[test]
	fn test_pull_two_rows() {
		let mut transport = RemoteTransport::new(pull_remote(2), PlainCodeGen);
		let table = transport.pull().unwrap();

		assert_eq!(table.columns()[0], Column::new("a", ColumnType::Float8));
		assert_eq!(table.columns()[1], Column::new("b", ColumnType::Utf8));
		assert_eq!(table.row_count(), 2);
		assert_eq!(table.cell(0, 0), &Value::float8(0.5));
		assert_eq!(table.cell(1, 1), &Value::utf8("r1"));

		let remote = transport.into_remote();
		assert_eq!(remote.row_queries, vec!["row 1", "row 2"]);
	}

	#[test]
	fn test_pull_zero_rows() {
		let mut transport = RemoteTransport::new(pull_remote(0), PlainCodeGen);
		let table = transport.pull().unwrap();
		assert_eq!(table.row_count(), 0);
		assert_eq!(table.column_count(), 2);
	}

	#[test]
	fn test_pull_unsupported_type_string() {
		let mut remote = pull_remote(1);
		remote.variables[1].1 =
			WorkspaceValue::Utf8List(vec!["double".to_string(), "struct".to_string()]);
		let mut transport = RemoteTransport::new(remote, PlainCodeGen);

		let err = transport.pull().unwrap_err();
		assert!(matches!(err, Error::UnsupportedType { column, ty }
			if column == "b" && ty == "struct"));
	}

	#[test]
	fn test_pull_aborts_when_row_fetch_fails() {
		let mut remote = pull_remote(3);
		remote.rows.truncate(1);
		let mut transport = RemoteTransport::new(remote, PlainCodeGen);

		let err = transport.pull().unwrap_err();
		assert!(matches!(err, Error::RemoteInvocation { .. }));
	}

	#[test]
	fn test_row_count_unwrap() {
		assert_eq!(expect_row_count(WorkspaceValue::Float8(4.0)).unwrap(), 4);
		assert_eq!(
			expect_row_count(WorkspaceValue::Float8Array(vec![Some(2.0)])).unwrap(),
			2
		);
		assert!(expect_row_count(WorkspaceValue::Float8(-1.0)).is_err());
		assert!(expect_row_count(WorkspaceValue::Utf8("2".to_string())).is_err());
	}

	#[test]
	fn test_row_count_rejects_fractional() {
		let err = expect_row_count(WorkspaceValue::Float8(2.9)).unwrap_err();
		assert!(matches!(err, Error::RemoteInvocation { .. }));
		assert!(expect_row_count(WorkspaceValue::Float8Array(vec![Some(0.5)])).is_err());
	}
}
