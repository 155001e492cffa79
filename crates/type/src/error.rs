// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

/// Everything that can go wrong while moving a table across the workspace
/// boundary.
///
/// Only one failure is recoverable, and it is not represented here: a column
/// whose workspace value cannot be resolved to a column type is dropped with
/// a warning by the reconstruction path. Every variant below is fatal for
/// the operation that raised it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("cannot process tables with more than {max} rows, got {rows}")]
	CapacityExceeded {
		rows: u64,
		max: u64,
	},

	#[error("unsupported type '{ty}' for column '{column}'")]
	UnsupportedType {
		column: String,
		ty: String,
	},

	#[error("column '{column}' has {actual} rows, expected {expected}")]
	InconsistentColumnLength {
		column: String,
		expected: usize,
		actual: usize,
	},

	#[error("row has {actual} cells, expected {expected}")]
	RowArityMismatch {
		expected: usize,
		actual: usize,
	},

	#[error("corrupt store: {reason}")]
	CorruptStore {
		reason: String,
	},

	#[error("unknown type tag {tag:#04x} in store")]
	UnknownTypeTag {
		tag: u8,
	},

	#[error("{operation} requires a session holding {expected}, found {actual}")]
	InvalidSessionState {
		operation: &'static str,
		expected: &'static str,
		actual: &'static str,
	},

	#[error("remote invocation failed: {reason}")]
	RemoteInvocation {
		reason: String,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl Error {
	pub fn corrupt(reason: impl Into<String>) -> Self {
		Error::CorruptStore {
			reason: reason.into(),
		}
	}

	pub fn remote(reason: impl Into<String>) -> Self {
		Error::RemoteInvocation {
			reason: reason.into(),
		}
	}

	pub fn unsupported(column: impl Into<String>, ty: impl Into<String>) -> Self {
		Error::UnsupportedType {
			column: column.into(),
			ty: ty.into(),
		}
	}
}
