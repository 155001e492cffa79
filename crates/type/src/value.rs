// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// A single table cell, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined: a cell explicitly marked missing.
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// A 4-byte signed integer.
	Int4(i32),
	/// An 8-byte floating point.
	Float8(f64),
	/// A UTF-8 encoded text.
	Utf8(String),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn float8(v: impl Into<f64>) -> Self {
		Value::Float8(v.into())
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	/// Reads the cell through the numeric accessor, widening `Int4` to
	/// `f64`. A missing cell reads as `None`.
	pub fn as_float8(&self) -> Option<f64> {
		match self {
			Value::Int4(v) => Some(*v as f64),
			Value::Float8(v) => Some(*v),
			_ => None,
		}
	}

	/// Reads the cell through the nominal accessor. A missing cell reads
	/// as `None`.
	pub fn as_utf8(&self) -> Option<&str> {
		match self {
			Value::Utf8(v) => Some(v.as_str()),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Undefined => f.write_str("Undefined"),
			Value::Boolean(v) => write!(f, "{}", v),
			Value::Int4(v) => write!(f, "{}", v),
			Value::Float8(v) => write!(f, "{}", v),
			Value::Utf8(v) => f.write_str(v),
		}
	}
}
