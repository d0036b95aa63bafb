// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store adapters.
//!
//! [`MemorySessionStore`] keeps values for the process lifetime.
//! [`JsonFileSessionStore`] mirrors them to a single JSON file so a CLI
//! session can be resumed.

pub mod file;
pub mod memory;

pub use file::JsonFileSessionStore;
pub use memory::MemorySessionStore;
