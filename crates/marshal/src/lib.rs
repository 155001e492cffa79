// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

//! Marshaling engine between the typed table model and the untyped
//! workspace value model.
//!
//! The lingua franca is the [`WorkspaceMap`]: an insertion-ordered mapping
//! from column name to an array-or-scalar [`WorkspaceValue`]. Tables are
//! converted into it column by column, it round-trips through a binary
//! store encoding, and tables are rebuilt from it by resolving each entry
//! back to a column type.

pub use codec::{decode, encode};
pub use resolve::{Resolved, resolve};
pub use session::{Session, SessionState};
pub use store::StoreHandle;
pub use workspace::{WorkspaceMap, WorkspaceValue};

pub mod convert;

mod codec;
mod resolve;
mod session;
mod store;
mod workspace;
