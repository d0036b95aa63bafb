// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared ticket board.

use plantwise_core::Ticket;
use tokio::sync::RwLock;

/// Tickets created during the session, newest first.
#[derive(Debug, Default)]
pub struct TicketBoard {
    tickets: RwLock<Vec<Ticket>>,
}

impl TicketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a ticket at the head of the board.
    pub async fn push(&self, ticket: Ticket) {
        self.tickets.write().await.insert(0, ticket);
    }

    pub async fn list(&self) -> Vec<Ticket> {
        self.tickets.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}
