// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use std::{mem, path::Path};

use matlink_type::{Error, Result, Table};

use crate::{StoreHandle, WorkspaceMap, codec, convert};

/// What a conversion session currently holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
	Empty,
	HoldsTable,
	HoldsMap,
	HoldsStore,
}

impl SessionState {
	fn name(&self) -> &'static str {
		match self {
			SessionState::Empty => "nothing",
			SessionState::HoldsTable => "a table",
			SessionState::HoldsMap => "a workspace map",
			SessionState::HoldsStore => "a store handle",
		}
	}
}

enum Holding {
	Empty,
	Table(Table),
	Map(WorkspaceMap),
	Store(StoreHandle),
}

/// One conversion session.
///
/// A session owns exactly one of: a table, a workspace map, or a store
/// handle. Every operation below is a transition between those states, and
/// a consumed representation is gone afterwards; there is no way to reuse a
/// map after it has been serialized, or a store handle after it has been
/// read back.
pub struct Session {
	holding: Holding,
}

impl Session {
	pub fn new() -> Self {
		Self {
			holding: Holding::Empty,
		}
	}

	pub fn from_table(table: Table) -> Self {
		Self {
			holding: Holding::Table(table),
		}
	}

	pub fn from_map(map: WorkspaceMap) -> Self {
		Self {
			holding: Holding::Map(map),
		}
	}

	pub fn from_store(handle: StoreHandle) -> Self {
		Self {
			holding: Holding::Store(handle),
		}
	}

	pub fn state(&self) -> SessionState {
		match &self.holding {
			Holding::Empty => SessionState::Empty,
			Holding::Table(_) => SessionState::HoldsTable,
			Holding::Map(_) => SessionState::HoldsMap,
			Holding::Store(_) => SessionState::HoldsStore,
		}
	}

	/// Converts the held table into a workspace map.
	pub fn convert_to_map(&mut self) -> Result<()> {
		match &self.holding {
			Holding::Table(table) => {
				let map = convert::table_to_workspace(table)?;
				self.holding = Holding::Map(map);
				Ok(())
			}
			_ => Err(self.invalid("convert_to_map", SessionState::HoldsTable)),
		}
	}

	/// Converts the held workspace map into a table.
	pub fn convert_to_table(&mut self) -> Result<()> {
		match &self.holding {
			Holding::Map(map) => {
				let table = convert::workspace_to_table(map)?;
				self.holding = Holding::Table(table);
				Ok(())
			}
			_ => Err(self.invalid("convert_to_table", SessionState::HoldsMap)),
		}
	}

	/// Serializes the held workspace map to a fresh store file, consuming
	/// the map. A session still holding a table converts it first.
	pub fn write_store(&mut self) -> Result<()> {
		if matches!(self.holding, Holding::Table(_)) {
			self.convert_to_map()?;
		}
		match &self.holding {
			Holding::Map(map) => {
				let handle = StoreHandle::write(map)?;
				self.holding = Holding::Store(handle);
				Ok(())
			}
			_ => Err(self.invalid("write_store", SessionState::HoldsMap)),
		}
	}

	/// Reads the held store back and materializes the table in one coupled
	/// step, deleting the backing file.
	pub fn read_store(&mut self) -> Result<()> {
		match mem::replace(&mut self.holding, Holding::Empty) {
			Holding::Store(handle) => {
				let map = handle.read()?;
				let table = convert::workspace_to_table(&map)?;
				self.holding = Holding::Table(table);
				Ok(())
			}
			other => {
				self.holding = other;
				Err(self.invalid("read_store", SessionState::HoldsStore))
			}
		}
	}

	/// Encodes the held workspace map to an in-memory byte buffer for
	/// streaming to a remote peer. The map stays live; nothing is deleted
	/// or consumed.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		match &self.holding {
			Holding::Map(map) => Ok(codec::encode(map)),
			_ => Err(self.invalid("to_bytes", SessionState::HoldsMap)),
		}
	}

	pub fn table(&self) -> Result<&Table> {
		match &self.holding {
			Holding::Table(table) => Ok(table),
			_ => Err(self.invalid("table", SessionState::HoldsTable)),
		}
	}

	pub fn into_table(self) -> Result<Table> {
		match self.holding {
			Holding::Table(table) => Ok(table),
			_ => Err(self.invalid("into_table", SessionState::HoldsTable)),
		}
	}

	pub fn map(&self) -> Result<&WorkspaceMap> {
		match &self.holding {
			Holding::Map(map) => Ok(map),
			_ => Err(self.invalid("map", SessionState::HoldsMap)),
		}
	}

	/// Path of the held store file, for handing to the remote engine.
	pub fn store_path(&self) -> Result<&Path> {
		match &self.holding {
			Holding::Store(handle) => Ok(handle.path()),
			_ => Err(self.invalid("store_path", SessionState::HoldsStore)),
		}
	}

	/// Drops whatever the session holds, deleting a held store file.
	pub fn cleanup(&mut self) {
		if let Holding::Store(handle) = mem::replace(&mut self.holding, Holding::Empty) {
			handle.delete();
		}
	}

	fn invalid(&self, operation: &'static str, expected: SessionState) -> Error {
		Error::InvalidSessionState {
			operation,
			expected: expected.name(),
			actual: self.state().name(),
		}
	}
}

impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}
