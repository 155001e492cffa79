// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use matlink_type::Result;
use tracing::warn;
use uuid::Uuid;

use crate::{WorkspaceMap, codec};

/// Handle to a disk-backed transient store holding one encoded workspace
/// map.
///
/// The backing file lives in the system temp directory under a uniquely
/// named path. It is deleted by whichever operation consumes it; if the
/// handle is dropped while the file is still live, deletion is attempted as
/// a best effort so an abnormal exit does not leak table dumps.
#[derive(Debug)]
pub struct StoreHandle {
	path: PathBuf,
	live: bool,
}

impl StoreHandle {
	/// Encodes `map` into a freshly created, uniquely named temporary
	/// file.
	pub fn write(map: &WorkspaceMap) -> Result<Self> {
		let mut path = env::temp_dir();
		path.push(format!("matlink-{}.bin", Uuid::new_v4()));
		fs::write(&path, codec::encode(map))?;
		Ok(Self {
			path,
			live: true,
		})
	}

	/// Path to the backing file, for collaborators that hand the store to
	/// the remote engine by name.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Decodes the stored map and deletes the backing file. A deletion
	/// failure is logged, not fatal, since the decoded map is already
	/// safe.
	pub fn read(mut self) -> Result<WorkspaceMap> {
		let bytes = fs::read(&self.path)?;
		let map = codec::decode(&bytes)?;
		self.remove();
		Ok(map)
	}

	/// Explicit cleanup without reading the contents back.
	pub fn delete(mut self) {
		self.remove();
	}

	fn remove(&mut self) {
		if !self.live {
			return;
		}
		self.live = false;
		if let Err(error) = fs::remove_file(&self.path) {
			warn!(path = %self.path.display(), %error, "failed to delete store file");
		}
	}
}

impl Drop for StoreHandle {
	fn drop(&mut self) {
		if self.live {
			let _ = fs::remove_file(&self.path);
		}
	}
}
