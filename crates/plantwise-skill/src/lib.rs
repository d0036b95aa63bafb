// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Function-calling tools for the Plantwise assistant.
//!
//! [`Tool`] is the interface, [`ToolRegistry`] the lookup table and the source
//! of model function declarations, and [`ToolDispatcher`] runs the calls of one
//! model reply: audit, side effect, then acknowledgement to the model.

pub mod builtin;
pub mod dispatch;
pub mod tickets;
pub mod tool;

pub use builtin::{CreateTicketTool, GenerateQuizTool, default_registry};
pub use dispatch::{ToolDispatcher, ToolEffects};
pub use tickets::TicketBoard;
pub use tool::{Tool, ToolContext, ToolOutcome, ToolRegistry};
