//! Core systems for Trellis.
//!
//! This crate provides the foundational components of the Trellis widget
//! toolkit:
//!
//! - **Signal/Slot System**: Type-safe controller-to-host notifications
//! - **Deferred Queue**: Manually-pumped, cancellable one-shot tasks
//!
//! Everything here is synchronous and cooperative: slots run inside the
//! `emit` that triggered them, and deferred tasks run inside the pump call
//! that reaches their deadline. There is no event loop and no async I/O.
//!
//! # Signal/Slot Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Deferred Task Example
//!
//! ```
//! use trellis_core::DeferredQueue;
//! use std::time::Duration;
//!
//! let queue = DeferredQueue::new();
//! let task_id = queue.schedule(Duration::from_millis(200), || {
//!     println!("fired");
//! });
//!
//! // The host pumps the queue; nothing runs until the deadline passes.
//! queue.process_expired();
//!
//! // A pending task can be cancelled before it fires.
//! let _ = queue.cancel(task_id);
//! ```

mod error;
mod scheduler;
pub mod signal;

pub use error::{Result, SchedulerError, TrellisError};
pub use scheduler::{DeferredQueue, TaskId};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
