// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt context for the Plantwise assistant.
//!
//! - [`SystemInstruction`]: the fixed instruction a model session is opened with
//! - [`prompt`]: turns ranked documents, the user query and an optional image
//!   into the parts of one model turn

pub mod instruction;
pub mod prompt;

pub use instruction::{CLARIFICATION_SENTINEL, MEDIA_FLAG, SystemInstruction};
pub use prompt::{ImageAttachment, assemble, context_block};
