// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

//! Direct table exchange with a live remote workspace session, bypassing
//! the map/persistence path. Used when interactive evaluation is available:
//! rows are pushed one blocking round-trip at a time, and pulled back the
//! same way.

pub use codegen::CodeGen;
pub use remote::{RemoteTransport, RemoteWorkspace};

mod codegen;
mod remote;
