//! Board ordering engine for the taskdeck kanban task manager.
//!
//! The interesting part of a drag-and-drop board is not the CRUD around it
//! but keeping the order arrays honest: `listOrder` on a board and
//! `taskOrder` on each list may reference members that no longer exist, and
//! a single drag gesture can touch two order arrays plus a task's owning
//! list at once. This crate owns that protocol:
//!
//! - [`order::OrderStore`] — raw ordered-id sequences per container
//! - [`reconcile`] — orphan cleanup against the authoritative member set
//! - [`moves`] — the move-event transition (reorder / cross-list relocate)
//! - [`sync`] — when and how order mutations reach the persistence layer
//! - [`session::BoardSession`] — the owned state container tying it together
//!
//! Persistence is a trait ([`sync::BoardPersistence`]); any document-store
//! backend (or an in-process test double) can sit behind it.

pub mod moves;
pub mod order;
pub mod reconcile;
pub mod session;
pub mod sync;
pub mod types;
