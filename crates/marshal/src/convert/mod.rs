// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

pub use to_table::workspace_to_table;
pub use to_workspace::table_to_workspace;

mod to_table;
mod to_workspace;
