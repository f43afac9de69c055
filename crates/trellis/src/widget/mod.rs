//! Interactive combobox machinery.
//!
//! The widget layer is split along the lines of what changes together:
//!
//! - [`controller`]: the stateful orchestrator consuming host events
//! - [`registry`]: at-most-one-open coordination between instances
//! - [`nav`]: pure index stepping for the menu and the pill strip
//! - [`variant`]: display-mode parsing and presenter resolution
//! - [`events`]: the event and intent types exchanged with the host

pub mod controller;
pub mod events;
pub mod nav;
pub mod registry;
pub mod variant;

pub use controller::{
    BLUR_CLOSE_DELAY, ComboProps, ComboSignals, ComboState, ComboboxController,
};
pub use events::{FocusTarget, Key, KeyPressEvent, KeyboardModifiers};
pub use nav::{IndexWrap, NO_INDEX, next_index};
pub use registry::{ComboId, OpenDropdownRegistry};
pub use variant::{DisplayMode, PresenterVariant};
