//! Trellis: a headless interactive combobox.
//!
//! Trellis implements the interaction logic of a combobox widget - the
//! dropdown open/close lifecycle, keyboard navigation, selection semantics,
//! and focus intent - without rendering anything. The host owns the pixels
//! and the platform focus; Trellis owns the state machine and tells the host
//! what to do through signals.
//!
//! # Architecture
//!
//! - [`model`]: choices and the pure selection reducer
//! - [`widget`]: the [`ComboboxController`] plus its supporting pieces
//!   (registry, navigation, variants, events)
//!
//! Timer and signal primitives come from the `trellis-core` crate and are
//! re-exported here for convenience.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use trellis::model::Choice;
//! use trellis::widget::{ComboProps, ComboboxController, Key, KeyPressEvent, OpenDropdownRegistry};
//! use trellis::DeferredQueue;
//!
//! // One registry and one timer queue per widget tree.
//! let registry = Arc::new(OpenDropdownRegistry::new());
//! let timers = Arc::new(DeferredQueue::new());
//!
//! let props = ComboProps::default()
//!     .with_options(vec![
//!         Choice::new("1", "Apple"),
//!         Choice::new("2", "Banana"),
//!     ])
//!     .with_multiple(true);
//! let combo = ComboboxController::new(props, registry, timers.clone());
//!
//! combo.signals().selection_changed.connect(|selection| {
//!     println!("new selection: {selection:?}");
//! });
//!
//! // Feed it events; pump `timers` from the host's event loop.
//! combo.handle_key_press(&KeyPressEvent::plain(Key::ArrowDown));
//! combo.handle_key_press(&KeyPressEvent::plain(Key::Enter));
//! timers.process_expired();
//! ```

pub mod model;
pub mod widget;

pub use widget::ComboboxController;

// Core primitives, re-exported so hosts depend on one crate.
pub use trellis_core::{
    ConnectionGuard, ConnectionId, DeferredQueue, Result, SchedulerError, Signal, TaskId,
    TrellisError,
};
