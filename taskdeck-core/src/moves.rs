//! Move Executor: applies one discrete drag-completion event to order state.
//!
//! A move event is already resolved to "member X left position P in
//! container A for position Q in container B" — intermediate drag positions
//! are never observed here. Processing is a single synchronous transition;
//! there is no intermediate observable state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::order::OrderStore;

/// What kind of entity was dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    List,
    Task,
}

/// One completed drag gesture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEvent {
    pub moved_id: String,
    pub kind: MoveKind,
    pub source_container: String,
    pub source_index: usize,
    pub dest_container: String,
    pub dest_index: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The dragged item no longer exists (deleted mid-drag by another
    /// actor). The caller must discard the event and resynchronize from the
    /// persistence layer; partial repair is not attempted.
    #[error("moved item {0} no longer exists")]
    StaleReference(String),

    /// The item exists but is missing from its declared source order array.
    /// Guessing a position would compound an already-inconsistent view, so
    /// the caller must resynchronize instead.
    #[error("item {id} not found in order of container {container}")]
    OrderDesync { id: String, container: String },
}

/// What a successful move did, and which containers now need persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source and destination were identical; nothing was mutated.
    Noop,
    /// Reorder within a single container.
    Reordered { container: String },
    /// Cross-container relocation; the moved member's owning-container
    /// reference must be updated to `dest` by the caller.
    Relocated { source: String, dest: String },
}

/// Apply `event` to `store`. `is_live` is the caller's membership oracle:
/// it must answer whether `moved_id` currently exists as an entity of the
/// declared kind.
///
/// An out-of-range destination index is a caller bug and trips a
/// `debug_assert`; release builds clamp to `[0, len]` to preserve
/// availability.
pub fn apply_move<F>(
    store: &mut OrderStore,
    event: &MoveEvent,
    is_live: F,
) -> Result<MoveOutcome, MoveError>
where
    F: Fn(&str) -> bool,
{
    if !is_live(&event.moved_id) {
        return Err(MoveError::StaleReference(event.moved_id.clone()));
    }

    if event.source_container == event.dest_container && event.source_index == event.dest_index {
        return Ok(MoveOutcome::Noop);
    }

    if event.source_container == event.dest_container {
        let container = &event.source_container;
        if store.position(container, &event.moved_id).is_none() {
            return Err(MoveError::OrderDesync {
                id: event.moved_id.clone(),
                container: container.clone(),
            });
        }
        store.remove_by_id(container, &event.moved_id);
        debug_assert!(
            event.dest_index <= store.len(container),
            "destination index {} out of range for container {}",
            event.dest_index,
            container
        );
        store.insert_clamped(container, &event.moved_id, event.dest_index);
        return Ok(MoveOutcome::Reordered {
            container: container.clone(),
        });
    }

    // Cross-container: absence from the source is tolerated — a concurrent
    // repair may already have dropped the id there.
    if !store.remove_by_id(&event.source_container, &event.moved_id) {
        log::warn!(
            "[moves] {} not found in source container {}, inserting into destination only",
            event.moved_id,
            event.source_container
        );
    }
    debug_assert!(
        event.dest_index <= store.len(&event.dest_container),
        "destination index {} out of range for container {}",
        event.dest_index,
        event.dest_container
    );
    store.insert_clamped(&event.dest_container, &event.moved_id, event.dest_index);

    Ok(MoveOutcome::Relocated {
        source: event.source_container.clone(),
        dest: event.dest_container.clone(),
    })
}
