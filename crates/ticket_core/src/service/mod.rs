//! Core use-case services.
//!
//! # Responsibility
//! - Turn generic store operations into the typed API callers consume.
//! - Keep presentation code decoupled from storage details.

pub mod ticket_service;

pub use ticket_service::TicketService;
