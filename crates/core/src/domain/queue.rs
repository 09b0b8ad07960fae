// Queue State - ordered tickets with derived position/ETA

use std::collections::{BTreeMap, HashMap};

use crate::domain::error::{DomainError, Result};
use crate::domain::{QueueConfig, Ticket, TicketId, TicketStatus, TokenNumber};

/// In-memory view of one organization's open tickets
///
/// Invariant: waiting tickets ordered by token number carry positions `1..=N`
/// and `estimated_wait_minutes == config.estimate_wait(position)`. Every
/// mutation re-derives both fields for the whole waiting set. Only waiting and
/// processing tickets are held; a ticket leaves the state once it completes.
#[derive(Debug, Clone)]
pub struct QueueState {
    config: QueueConfig,
    tickets: BTreeMap<TokenNumber, Ticket>,
    by_id: HashMap<TicketId, TokenNumber>,
}

impl QueueState {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            tickets: BTreeMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Rebuild state from persisted tickets
    ///
    /// Stored positions are ignored and completed tickets are skipped.
    pub fn hydrate(config: QueueConfig, tickets: impl IntoIterator<Item = Ticket>) -> Result<Self> {
        let mut state = Self::new(config);
        for ticket in tickets {
            if ticket.status != TicketStatus::Completed {
                state.insert(ticket)?;
            }
        }
        state.recompute();
        Ok(state)
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Number of open (waiting or processing) tickets held
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn waiting_count(&self) -> u32 {
        self.tickets.values().filter(|t| t.is_waiting()).count() as u32
    }

    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.by_id.get(id).and_then(|token| self.tickets.get(token))
    }

    pub fn by_token(&self, token: TokenNumber) -> Option<&Ticket> {
        self.tickets.get(&token)
    }

    pub fn find_waiting_by_contact(&self, contact: &str) -> Option<&Ticket> {
        self.tickets
            .values()
            .find(|t| t.is_waiting() && t.contact == contact)
    }

    /// Waiting ticket with the lowest token number
    pub fn head(&self) -> Option<&Ticket> {
        self.tickets.values().find(|t| t.is_waiting())
    }

    /// All waiting tickets, ordered by token number ascending
    pub fn list_waiting(&self) -> Vec<Ticket> {
        self.tickets
            .values()
            .filter(|t| t.is_waiting())
            .cloned()
            .collect()
    }

    /// Admit a freshly issued waiting ticket
    pub fn admit(&mut self, ticket: Ticket) -> Result<Ticket> {
        if !ticket.is_waiting() {
            return Err(DomainError::Validation(format!(
                "Only waiting tickets can be admitted (got {})",
                ticket.status
            )));
        }
        let token = ticket.token_number;
        self.insert(ticket)?;
        self.recompute();
        Ok(self.tickets[&token].clone())
    }

    /// Replace a known ticket with its transitioned copy
    ///
    /// The token number and ID must match the stored ticket. A completed
    /// ticket is dropped and returned as-is.
    pub fn replace(&mut self, ticket: Ticket) -> Result<Ticket> {
        match self.by_id.get(&ticket.id) {
            Some(token) if *token == ticket.token_number => {}
            _ => {
                return Err(DomainError::Validation(format!(
                    "Ticket {} is not part of this queue",
                    ticket.id
                )))
            }
        }
        let token = ticket.token_number;
        if ticket.status == TicketStatus::Completed {
            self.tickets.remove(&token);
            self.by_id.remove(&ticket.id);
            self.recompute();
            return Ok(ticket);
        }
        self.tickets.insert(token, ticket);
        self.recompute();
        Ok(self.tickets[&token].clone())
    }

    /// Swap queue settings and re-derive every waiting ETA
    pub fn set_config(&mut self, config: QueueConfig) {
        self.config = config;
        self.recompute();
    }

    fn insert(&mut self, ticket: Ticket) -> Result<()> {
        if self.tickets.contains_key(&ticket.token_number) {
            return Err(DomainError::DuplicateToken(ticket.token_number));
        }
        if self.by_id.contains_key(&ticket.id) {
            return Err(DomainError::Validation(format!(
                "Ticket {} already exists",
                ticket.id
            )));
        }
        self.by_id.insert(ticket.id.clone(), ticket.token_number);
        self.tickets.insert(ticket.token_number, ticket);
        Ok(())
    }

    fn recompute(&mut self) {
        let mut position = 0;
        for ticket in self.tickets.values_mut() {
            if ticket.is_waiting() {
                position += 1;
                ticket.position = position;
                ticket.estimated_wait_minutes = self.config.estimate_wait(position);
            } else {
                ticket.position = 0;
                ticket.estimated_wait_minutes = 0;
            }
        }
    }
}
