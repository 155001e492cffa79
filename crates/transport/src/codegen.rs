// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use matlink_type::{ColumnType, Value};

/// Produces the command text the remote engine evaluates.
///
/// The transport treats command generation as opaque: an implementation
/// encapsulates one target container convention (struct-of-arrays, dataset,
/// map, ...) and the transport never interprets the returned text itself.
pub trait CodeGen {
	/// Workspace variable names matching the target convention, one per
	/// column, aligned with `column_names`.
	fn variable_names(&self, column_names: &[String]) -> Vec<String>;

	/// One command declaring empty receptacles for every variable.
	fn instantiation_command(&self, variables: &[String], column_types: &[ColumnType]) -> String;

	/// One command appending one row of cell values to the receptacles.
	fn append_row_command(&self, variables: &[String], row: &[Value]) -> String;

	/// One command attaching column-name metadata to the receptacles.
	fn metadata_command(&self, variables: &[String], column_names: &[String]) -> String;

	/// Query returning the output variable names as a string array.
	fn output_names_query(&self) -> String;

	/// Query returning the workspace-reported type string per output
	/// variable.
	fn output_types_query(&self) -> String;

	/// Query returning the output row count as a numeric value.
	fn output_row_count_query(&self) -> String;

	/// Query returning one value per output variable for `row`. Row
	/// indices are 1-based on the remote side.
	fn output_row_query(&self, row: usize, variables: &[String]) -> String;
}
