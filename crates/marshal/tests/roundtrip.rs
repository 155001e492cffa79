// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

//! Table -> workspace map -> (store) -> workspace map -> table, end to end.
//!
//! Two documented collapses are expected on the way back: integer columns
//! come back as float8 (the forward path reads all numerics through the
//! float accessor), and missing/empty strings are indistinguishable.

use matlink_marshal::{Session, SessionState, convert};
use matlink_testing::mixed_table;
use matlink_type::{ColumnType, Value};

#[test]
fn round_trip_through_map() {
	let table = mixed_table();
	let map = convert::table_to_workspace(&table).unwrap();
	let back = convert::workspace_to_table(&map).unwrap();

	assert_eq!(back.column_count(), table.column_count());
	assert_eq!(back.row_count(), table.row_count());
	for (original, rebuilt) in table.columns().iter().zip(back.columns()) {
		assert_eq!(original.name, rebuilt.name);
	}

	// Integer-to-float collapse on the numeric columns.
	assert_eq!(back.columns()[0].ty, ColumnType::Float8);
	assert_eq!(back.cell(0, 0), &Value::float8(1.0));
	assert_eq!(back.cell(1, 0), &Value::Undefined);
	assert_eq!(back.cell(3, 0), &Value::float8(4.0));

	// Float column survives value for value.
	assert_eq!(back.cell(0, 1), &Value::float8(0.25));
	assert_eq!(back.cell(2, 1), &Value::Undefined);

	// Text column: values survive, missing stays missing.
	assert_eq!(back.cell(0, 2), &Value::utf8("alpha"));
	assert_eq!(back.cell(2, 2), &Value::Undefined);
}

#[test]
fn round_trip_through_store() {
	let table = mixed_table();
	let mut session = Session::from_table(table.clone());

	session.write_store().unwrap();
	assert_eq!(session.state(), SessionState::HoldsStore);

	session.read_store().unwrap();
	let back = session.into_table().unwrap();

	assert_eq!(back.row_count(), table.row_count());
	assert_eq!(back.cell(3, 2), &Value::utf8("delta"));
	assert_eq!(back.cell(0, 0), &Value::float8(1.0));
}
