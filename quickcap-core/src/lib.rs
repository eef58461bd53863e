//! Core of the quickcap task and event capture tool.
//!
//! - `item`: the task/event record and its invariants
//! - `quick_entry`: free-text phrase → draft fields
//! - `validate` and `form`: the capture form and its required-field rules
//! - `store`: the persistence interface, its three adapters and merge
//! - `sync`, `backup`, `share`: moving whole collections around
//! - `config`: user configuration and store selection

pub mod backup;
pub mod config;
pub mod error;
pub mod form;
pub mod item;
pub mod quick_entry;
pub mod share;
pub mod store;
pub mod sync;
pub mod validate;

pub use error::{CaptureError, CaptureResult};
pub use form::Form;
pub use item::{
    DeadlineType, Draft, Due, Event, EventStart, Item, ItemKind, ItemType, Priority, Span, Status,
    TagSet, Task,
};
pub use store::{Deleted, Snapshot, Store};
pub use validate::{FieldErrors, validate};
