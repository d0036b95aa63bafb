// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plantwise shell` command implementation.
//!
//! Interactive REPL over the RAG engine. Lines starting with `/` are shell
//! commands, everything else is a question for the assistant.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use plantwise_agent::RagEngine;
use plantwise_config::PlantwiseConfig;
use plantwise_context::ImageAttachment;
use plantwise_core::{ModelBackend, PlantwiseError, SessionStore};
use plantwise_gemini::GeminiBackend;
use plantwise_retrieval::{DocumentFilter, KnowledgeBase, seed_documents};
use plantwise_storage::{JsonFileSessionStore, MemorySessionStore};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use crate::render;

const HELP: &str = "\
/history               show the conversation
/image <path> <text>   ask about a photo
/feedback <id> up|down rate an answer
/docs [text]           list knowledge documents
/tickets               list maintenance tickets
/audit                 show the audit log
/verify                check the audit hash chain
/gaps                  list refused questions
/reset                 start a new conversation
/forget                erase conversation, audit log and refused questions
/quit                  leave";

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand<'a> {
    Ask(&'a str),
    Image { path: &'a str, query: &'a str },
    Feedback { id: &'a str, positive: bool },
    Docs(Option<&'a str>),
    History,
    Tickets,
    Audit,
    Verify,
    Gaps,
    Reset,
    Forget,
    Help,
    Quit,
    Usage(&'static str),
    Unknown(&'a str),
}

pub fn parse_command(line: &str) -> ShellCommand<'_> {
    let line = line.trim();
    if !line.starts_with('/') {
        return ShellCommand::Ask(line);
    }

    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "/quit" | "/exit" => ShellCommand::Quit,
        "/help" => ShellCommand::Help,
        "/history" => ShellCommand::History,
        "/tickets" => ShellCommand::Tickets,
        "/audit" => ShellCommand::Audit,
        "/verify" => ShellCommand::Verify,
        "/gaps" => ShellCommand::Gaps,
        "/reset" => ShellCommand::Reset,
        "/forget" => ShellCommand::Forget,
        "/docs" => ShellCommand::Docs((!rest.is_empty()).then_some(rest)),
        "/image" => match rest.split_once(char::is_whitespace) {
            Some((path, query)) => ShellCommand::Image {
                path,
                query: query.trim(),
            },
            None if !rest.is_empty() => ShellCommand::Image { path: rest, query: "" },
            None => ShellCommand::Usage("/image <path> <question>"),
        },
        "/feedback" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(id), Some("up"), None) => ShellCommand::Feedback { id, positive: true },
                (Some(id), Some("down"), None) => ShellCommand::Feedback { id, positive: false },
                _ => ShellCommand::Usage("/feedback <message id> up|down"),
            }
        }
        other => ShellCommand::Unknown(other),
    }
}

/// Builds the engine from configuration. `history` overrides
/// `session.history_file`; with neither, the session lives in memory.
pub async fn build_engine(
    config: &PlantwiseConfig,
    history: Option<PathBuf>,
) -> Result<RagEngine, PlantwiseError> {
    let backend: Arc<dyn ModelBackend> = Arc::new(GeminiBackend::new(config).inspect_err(|_| {
        eprintln!(
            "error: Gemini API key required. Set gemini.api_key in the config or the GEMINI_API_KEY env var"
        );
    })?);

    let history = history.or_else(|| config.session.history_file.as_ref().map(PathBuf::from));
    let store: Arc<dyn SessionStore> = match history {
        Some(path) => Arc::new(JsonFileSessionStore::open(&path).await?),
        None => Arc::new(MemorySessionStore::new()),
    };

    let knowledge = Arc::new(KnowledgeBase::in_memory(seed_documents(), &config.retrieval));
    Ok(RagEngine::new(config, backend, store, knowledge).await)
}

/// Runs the `plantwise shell` interactive REPL.
pub async fn run_shell(
    config: PlantwiseConfig,
    history: Option<PathBuf>,
) -> Result<(), PlantwiseError> {
    let engine = build_engine(&config, history).await?;
    let restored = engine.start().await?;
    info!(restored, "shell session started");

    let mut rl = DefaultEditor::new()
        .map_err(|e| PlantwiseError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{} shell", config.assistant.name).bold().green());
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());
    for message in engine.history().await {
        println!("{}", render::history_line(&message));
    }

    let prompt = format!("{}> ", "plantwise".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let command = parse_command(&line);
                if command == ShellCommand::Quit {
                    break;
                }
                if let Err(e) = handle_command(&engine, command).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn handle_command(engine: &RagEngine, command: ShellCommand<'_>) -> Result<(), PlantwiseError> {
    match command {
        ShellCommand::Ask(query) => {
            let result = engine.submit(query, None).await?;
            println!("{}\n", render::submit_result(&result));
        }
        ShellCommand::Image { path, query } => {
            let image = read_image(Path::new(path)).await?;
            let result = engine.submit(query, Some(image)).await?;
            println!("{}\n", render::submit_result(&result));
        }
        ShellCommand::Feedback { id, positive } => {
            engine.feedback(id, positive).await?;
            println!("{}", "thanks for the feedback".dimmed());
        }
        ShellCommand::Docs(text) => {
            let filter = DocumentFilter {
                text: text.map(str::to_string),
                category: None,
            };
            let docs = engine.knowledge().search(&filter).await?;
            if docs.is_empty() {
                println!("{}", "no documents".dimmed());
            }
            for doc in &docs {
                println!("{}", render::document_line(doc));
            }
        }
        ShellCommand::History => {
            for message in engine.history().await {
                println!("{}", render::history_line(&message));
            }
        }
        ShellCommand::Tickets => {
            let tickets = engine.tickets().await;
            if tickets.is_empty() {
                println!("{}", "no tickets".dimmed());
            }
            for ticket in &tickets {
                println!("{}", render::ticket_line(ticket));
            }
        }
        ShellCommand::Audit => {
            for entry in engine.audit_log().await {
                println!("{}", render::audit_line(&entry));
            }
        }
        ShellCommand::Verify => match engine.verify_audit().await {
            Ok(()) => println!("{}", "audit chain intact".green()),
            Err(brk) => println!(
                "{} at {}: {}",
                "audit chain broken".red().bold(),
                brk.entry_id,
                brk.reason
            ),
        },
        ShellCommand::Gaps => {
            for gap in engine.knowledge_gaps().await {
                println!("{} {}", gap.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(), gap.query);
            }
        }
        ShellCommand::Reset => {
            engine.reset().await;
            for message in engine.history().await {
                println!("{}", render::history_line(&message));
            }
        }
        ShellCommand::Forget => {
            engine.forget_me().await;
            println!("{}", "your data has been erased".yellow());
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Usage(usage) => println!("usage: {usage}"),
        ShellCommand::Unknown(cmd) => {
            println!("unknown command {cmd}, type {} for a list", "/help".yellow());
        }
        ShellCommand::Quit => {}
    }
    Ok(())
}

async fn read_image(path: &Path) -> Result<ImageAttachment, PlantwiseError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PlantwiseError::Validation(format!("cannot read {}: {e}", path.display())))?;
    Ok(ImageAttachment::from_bytes(
        ImageAttachment::mime_for_path(path),
        &bytes,
    ))
}
