// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembly of one RAG turn.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use plantwise_core::{KnowledgeDocument, PlantwiseError, PromptPart};

use crate::instruction::MEDIA_FLAG;

const FOLLOW_UP_INSTRUCTION: &str = "NOTE: this may be a follow-up question. Check the \
CONVERSATION HISTORY. If the user refers to \"this\", \"that\" or \"the aforementioned\", \
resolve it against the earlier topics. ";

/// An image sent along with a query, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub data: String,
}

impl ImageAttachment {
    /// Wraps already-encoded data after checking it decodes.
    pub fn from_base64(
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, PlantwiseError> {
        let data = data.into();
        STANDARD
            .decode(data.as_bytes())
            .map_err(|e| PlantwiseError::Validation(format!("image is not valid base64: {e}")))?;
        Ok(Self {
            mime_type: mime_type.into(),
            data,
        })
    }

    /// Encodes raw image bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// JPEG unless the file name says otherwise.
    pub fn mime_for_path(path: &std::path::Path) -> &'static str {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "image/jpeg",
        }
    }
}

/// Context text for the ranked documents, one block per document.
pub fn context_block(docs: &[KnowledgeDocument]) -> String {
    docs.iter()
        .map(|doc| {
            let flag = if doc.has_media() { MEDIA_FLAG } else { "" };
            format!(
                "--- INTERNAL DOCUMENT (ID: {}) ---\nTITLE: {}\nCATEGORY: {}\n{flag}\nCONTENT: {}\n",
                doc.id, doc.title, doc.category, doc.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parts of one user turn.
///
/// Text queries get the closed-system instruction, plus the follow-up hint
/// when the session has prior turns. Image queries get the analysis header
/// and the image as a second part.
pub fn assemble(
    query: &str,
    docs: &[KnowledgeDocument],
    image: Option<&ImageAttachment>,
    has_history: bool,
) -> Vec<PromptPart> {
    let context = context_block(docs);
    match image {
        Some(image) => vec![
            PromptPart::Text(format!(
                "[SYSTEM]: Analyzing user image.\nCONTEXT FROM MEMORY:\n{context}\n\nUSER QUERY:\n{query}"
            )),
            PromptPart::InlineImage {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            },
        ],
        None => {
            let follow_up = if has_history { FOLLOW_UP_INSTRUCTION } else { "" };
            vec![PromptPart::Text(format!(
                "CONTEXT (INTERNAL DATABASE ONLY):\n{context}\n\nUSER QUERY:\n{query}\n\n\
INSTRUCTION: Use ONLY the CONTEXT above. If the context is empty, {follow_up}If you still \
do not know, refuse to answer (unless the question is about your identity)."
            ))]
        }
    }
}
