// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use matlink_type::{Column, ColumnType, Error, Result, Value};

use crate::WorkspaceValue;

/// Outcome of resolving one workspace map entry: the inferred column plus
/// the value with any coercion applied, so downstream conversion never sees
/// a [`WorkspaceValue::Dynamic`] again.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
	pub column: Column,
	pub value: WorkspaceValue,
}

/// Infers a column from a workspace value.
///
/// Incoming values may arrive with an imprecise declared type from the host
/// bridge; this is the single place that re-types them so the converters
/// can assume a resolved type. Concretely tagged values match strictly;
/// [`WorkspaceValue::Dynamic`] payloads go through the coercion chain
/// float8, then int4, then utf8, first success winning. Boolean values have
/// no workspace mapping and fail.
///
/// Callers rebuilding a table treat any error from here as "drop the
/// column", not as a fatal failure; see `convert::workspace_to_table`.
pub fn resolve(name: &str, value: &WorkspaceValue) -> Result<Resolved> {
	let ty = match value {
		WorkspaceValue::Int4(_) | WorkspaceValue::Int4Array(_) => ColumnType::Int4,
		WorkspaceValue::Float8(_) | WorkspaceValue::Float8Array(_) => ColumnType::Float8,
		WorkspaceValue::Utf8(_) | WorkspaceValue::Utf8Array(_) | WorkspaceValue::Utf8List(_) => {
			ColumnType::Utf8
		}
		WorkspaceValue::Boolean(_) | WorkspaceValue::BooleanArray(_) => {
			return Err(Error::unsupported(name, value.type_name()));
		}
		// A null entry slides through the coercion chain at its first
		// stage and contributes no cells.
		WorkspaceValue::Undefined => ColumnType::Float8,
		WorkspaceValue::Dynamic(values) => {
			return coerce(name, values);
		}
	};
	Ok(Resolved {
		column: Column::new(name, ty),
		value: value.clone(),
	})
}

/// Coercion chain for imprecisely typed payloads: float8[], then int4[],
/// then utf8[]. Each stage accepts exactly its own element type, with
/// `Undefined` elements becoming missing slots.
fn coerce(name: &str, values: &[Value]) -> Result<Resolved> {
	if let Some(value) = coerce_float8(values) {
		return Ok(Resolved {
			column: Column::new(name, ColumnType::Float8),
			value,
		});
	}
	if let Some(value) = coerce_int4(values) {
		return Ok(Resolved {
			column: Column::new(name, ColumnType::Int4),
			value,
		});
	}
	if let Some(value) = coerce_utf8(values) {
		return Ok(Resolved {
			column: Column::new(name, ColumnType::Utf8),
			value,
		});
	}
	Err(Error::unsupported(name, "dynamic[]"))
}

fn coerce_float8(values: &[Value]) -> Option<WorkspaceValue> {
	let mut out = Vec::with_capacity(values.len());
	for value in values {
		match value {
			Value::Float8(v) => out.push(Some(*v)),
			Value::Undefined => out.push(None),
			_ => return None,
		}
	}
	Some(WorkspaceValue::Float8Array(out))
}

fn coerce_int4(values: &[Value]) -> Option<WorkspaceValue> {
	let mut out = Vec::with_capacity(values.len());
	for value in values {
		match value {
			Value::Int4(v) => out.push(Some(*v)),
			Value::Undefined => out.push(None),
			_ => return None,
		}
	}
	Some(WorkspaceValue::Int4Array(out))
}

fn coerce_utf8(values: &[Value]) -> Option<WorkspaceValue> {
	let mut out = Vec::with_capacity(values.len());
	for value in values {
		match value {
			Value::Utf8(v) => out.push(Some(v.clone())),
			Value::Undefined => out.push(None),
			_ => return None,
		}
	}
	Some(WorkspaceValue::Utf8Array(out))
}
