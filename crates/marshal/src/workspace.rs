// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use std::fmt::{self, Debug, Formatter};

use indexmap::IndexMap;
use matlink_type::Value;
use serde::{Deserialize, Serialize};

/// A workspace variable, as the external engine models it: an array or a
/// scalar, with no column semantics attached.
///
/// Array slots are optional because the workspace representation has to
/// carry missing cells through the boundary; a `None` slot is a cell that
/// was missing in the source table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorkspaceValue {
	/// A null-valued map entry. Resolves to a column that contributes no
	/// cells.
	Undefined,
	Boolean(bool),
	Int4(i32),
	Float8(f64),
	Utf8(String),
	BooleanArray(Vec<bool>),
	Int4Array(Vec<Option<i32>>),
	Float8Array(Vec<Option<f64>>),
	Utf8Array(Vec<Option<String>>),
	/// A list of strings, as delivered by engines that model text columns
	/// as cell arrays rather than char arrays.
	Utf8List(Vec<String>),
	/// An array whose declared type was too imprecise for the host bridge
	/// to tag. The resolver coerces it, or drops the column.
	Dynamic(Vec<Value>),
}

impl WorkspaceValue {
	/// The number of rows this value spans: array length, 1 for scalars,
	/// 0 for a null entry.
	pub fn row_span(&self) -> usize {
		match self {
			WorkspaceValue::Undefined => 0,
			WorkspaceValue::Boolean(_)
			| WorkspaceValue::Int4(_)
			| WorkspaceValue::Float8(_)
			| WorkspaceValue::Utf8(_) => 1,
			WorkspaceValue::BooleanArray(values) => values.len(),
			WorkspaceValue::Int4Array(values) => values.len(),
			WorkspaceValue::Float8Array(values) => values.len(),
			WorkspaceValue::Utf8Array(values) => values.len(),
			WorkspaceValue::Utf8List(values) => values.len(),
			WorkspaceValue::Dynamic(values) => values.len(),
		}
	}

	pub fn is_array(&self) -> bool {
		matches!(
			self,
			WorkspaceValue::BooleanArray(_)
				| WorkspaceValue::Int4Array(_)
				| WorkspaceValue::Float8Array(_)
				| WorkspaceValue::Utf8Array(_)
				| WorkspaceValue::Utf8List(_)
				| WorkspaceValue::Dynamic(_)
		)
	}

	/// Name of the variant as the error taxonomy reports it.
	pub fn type_name(&self) -> &'static str {
		match self {
			WorkspaceValue::Undefined => "undefined",
			WorkspaceValue::Boolean(_) => "boolean",
			WorkspaceValue::Int4(_) => "int4",
			WorkspaceValue::Float8(_) => "float8",
			WorkspaceValue::Utf8(_) => "utf8",
			WorkspaceValue::BooleanArray(_) => "boolean[]",
			WorkspaceValue::Int4Array(_) => "int4[]",
			WorkspaceValue::Float8Array(_) => "float8[]",
			WorkspaceValue::Utf8Array(_) => "utf8[]",
			WorkspaceValue::Utf8List(_) => "utf8 list",
			WorkspaceValue::Dynamic(_) => "dynamic[]",
		}
	}
}

/// Ordered column-name to workspace-value mapping.
///
/// Insertion order is preserved and is treated as column order when a table
/// is rebuilt from the map.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceMap {
	entries: IndexMap<String, WorkspaceValue>,
}

impl WorkspaceMap {
	pub fn new() -> Self {
		Self {
			entries: IndexMap::new(),
		}
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: IndexMap::with_capacity(capacity),
		}
	}

	/// Inserts an entry, keeping the position of `name` if it is already
	/// present.
	pub fn insert(&mut self, name: impl Into<String>, value: WorkspaceValue) {
		self.entries.insert(name.into(), value);
	}

	pub fn get(&self, name: &str) -> Option<&WorkspaceValue> {
		self.entries.get(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &WorkspaceValue)> {
		self.entries.iter().map(|(name, value)| (name.as_str(), value))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Debug for WorkspaceMap {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.entries.iter()).finish()
	}
}

impl FromIterator<(String, WorkspaceValue)> for WorkspaceMap {
	fn from_iter<I: IntoIterator<Item = (String, WorkspaceValue)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}
