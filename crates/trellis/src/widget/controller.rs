//! Combobox interaction controller.
//!
//! [`ComboboxController`] owns the interaction state of one combobox: the
//! open/closed dropdown, the highlighted menu option, and the focused pill
//! in the selected-items strip. It consumes keyboard, pointer, and
//! focus/blur events from the host, runs the pure navigation and selection
//! computations, and notifies the host of every intent through signals.
//!
//! The controller never touches the presentation layer directly. It does not
//! position the dropdown, move platform focus, or render anything; it emits
//! `focus_moved` / `opened` / `closed` / `selection_changed` and the host
//! acts on them.
//!
//! # Controlled vs. uncontrolled open state
//!
//! With `props.open == None` the controller manages the dropdown itself and
//! participates in the shared [`OpenDropdownRegistry`], which keeps at most
//! one dropdown open across all instances sharing that registry. With
//! `props.open == Some(_)` the host owns the flag: the controller suppresses
//! its own mutations and only emits `open_requested` / `close_requested`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::model::Choice;
//! use trellis::widget::{ComboProps, ComboboxController, Key, KeyPressEvent, OpenDropdownRegistry};
//! use trellis_core::DeferredQueue;
//!
//! let registry = Arc::new(OpenDropdownRegistry::new());
//! let timers = Arc::new(DeferredQueue::new());
//!
//! let props = ComboProps::default()
//!     .with_options(vec![Choice::new("1", "Apple"), Choice::new("2", "Banana")])
//!     .with_multiple(true);
//! let combo = ComboboxController::new(props, registry, timers);
//!
//! combo.signals().selection_changed.connect(|selection| {
//!     println!("selected {} items", selection.len());
//! });
//!
//! combo.handle_key_press(&KeyPressEvent::plain(Key::ArrowDown));
//! combo.handle_key_press(&KeyPressEvent::plain(Key::Enter));
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use trellis_core::{DeferredQueue, Signal, TaskId};

use crate::model::Choice;
use crate::model::selection::{reduce_selection, without_index};

use super::events::{FocusTarget, Key, KeyPressEvent};
use super::nav::{IndexWrap, NO_INDEX, next_index};
use super::registry::{ComboId, OpenDropdownRegistry};
use super::variant::{DisplayMode, PresenterVariant};

/// Delay before a blur-triggered close fires.
///
/// Losing input focus must not close the dropdown immediately: a click on a
/// menu item blurs the input first, and the click has to be processed before
/// the close. The close is scheduled instead; by the time it fires, a commit
/// has already forced the close and the deferred transition is a no-op.
pub const BLUR_CLOSE_DELAY: Duration = Duration::from_millis(200);

/// Externally supplied configuration for a combobox.
#[derive(Debug, Clone, Default)]
pub struct ComboProps {
    /// The options shown in the dropdown menu, in display order.
    pub options: Vec<Choice>,
    /// The currently chosen options, in pill order.
    pub selection: Vec<Choice>,
    /// Whether more than one option may be selected.
    pub multiple: bool,
    /// How the widget is presented.
    pub display_mode: DisplayMode,
    /// When true, free-text submission is disabled and menu navigation
    /// mirrors the highlighted option's label into the input.
    pub predefined_options_only: bool,
    /// When `Some`, open/close is host-controlled and the controller only
    /// emits requests.
    pub open: Option<bool>,
}

impl ComboProps {
    /// Set the options using the builder pattern.
    pub fn with_options(mut self, options: Vec<Choice>) -> Self {
        self.options = options;
        self
    }

    /// Set the initial selection using the builder pattern.
    pub fn with_selection(mut self, selection: Vec<Choice>) -> Self {
        self.selection = selection;
        self
    }

    /// Set multiple-selection mode using the builder pattern.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set the display mode using the builder pattern.
    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    /// Restrict input to predefined options using the builder pattern.
    pub fn with_predefined_options_only(mut self, predefined: bool) -> Self {
        self.predefined_options_only = predefined;
        self
    }

    /// Put the open flag under host control using the builder pattern.
    pub fn with_open(mut self, open: Option<bool>) -> Self {
        self.open = open;
        self
    }
}

/// The interaction state of a combobox.
///
/// `active_option` / `active_option_index` always agree: when the index is
/// not [`NO_INDEX`], the option equals `options[index]`. The same holds for
/// the active pill against the selection.
#[derive(Debug, Clone)]
pub struct ComboState {
    /// Whether the dropdown is shown (internal flag; see
    /// [`ComboboxController::is_open_resolved`] for the merged value).
    pub is_open: bool,
    /// The highlighted option within the menu.
    pub active_option: Option<Choice>,
    /// Index of the highlighted option, or [`NO_INDEX`].
    pub active_option_index: i32,
    /// The focused pill within the selected-items strip.
    pub active_selected_option: Option<Choice>,
    /// Index of the focused pill, or [`NO_INDEX`].
    pub active_selected_index: i32,
    /// Whether logical focus resides in the pill strip rather than the
    /// text input.
    pub listbox_has_focus: bool,
    /// The current text input value.
    pub input_value: String,
}

/// Notifications emitted by the controller.
///
/// All signals dispatch synchronously, inside the controller call that
/// triggered them.
#[derive(Default)]
pub struct ComboSignals {
    /// The dropdown was opened (uncontrolled mode).
    pub opened: Signal<()>,
    /// The dropdown was closed.
    pub closed: Signal<()>,
    /// The host should open the dropdown (controlled mode).
    pub open_requested: Signal<()>,
    /// The host should close the dropdown (controlled mode).
    pub close_requested: Signal<()>,
    /// The text input value changed.
    pub input_changed: Signal<String>,
    /// A selection commit produced this new selection.
    pub selection_changed: Signal<Vec<Choice>>,
    /// Free text was submitted.
    pub submitted: Signal<String>,
    /// A pill removal produced this new selection.
    pub remove_requested: Signal<Vec<Choice>>,
    /// The text input gained focus.
    pub focused: Signal<()>,
    /// The text input lost focus.
    pub blurred: Signal<()>,
    /// The host should move logical focus to the given target.
    pub focus_moved: Signal<FocusTarget>,
}

struct Inner {
    props: ComboProps,
    state: ComboState,
}

struct Shared {
    inner: Mutex<Inner>,
    signals: ComboSignals,
}

/// Full close transition: reset the menu highlight, clear the open flag
/// (unless host-controlled), and notify. Returns whether anything happened.
///
/// This is the procedure the registry runs when another instance claims the
/// open slot, and the deferred blur close runs when it fires; both reach it
/// through weak handles, so it must be callable without the controller.
fn transition_closed(shared: &Shared) -> bool {
    {
        let mut inner = shared.inner.lock();
        let open = inner.props.open.unwrap_or(inner.state.is_open);
        if !open {
            return false;
        }
        inner.state.active_option = None;
        inner.state.active_option_index = NO_INDEX;
        if inner.props.open.is_none() {
            inner.state.is_open = false;
        }
    }
    tracing::debug!(target: "trellis::combobox", "dropdown closed");
    shared.signals.closed.emit(());
    true
}

/// The stateful orchestrator for one combobox instance.
///
/// All methods take `&self`; the interaction state lives behind a mutex so
/// the registry cascade and deferred tasks can reach it through weak
/// handles. Signal emission always happens after internal locks are
/// released, so a connected slot may call back into the controller.
pub struct ComboboxController {
    id: ComboId,
    shared: Arc<Shared>,
    registry: Arc<OpenDropdownRegistry>,
    timers: Arc<DeferredQueue>,
    /// The in-flight blur close, if any.
    pending_close: Mutex<Option<TaskId>>,
}

impl ComboboxController {
    /// Create a controller for the given props.
    ///
    /// The registry and timer queue are injected; instances that should obey
    /// the at-most-one-open rule together must share the same registry.
    pub fn new(
        props: ComboProps,
        registry: Arc<OpenDropdownRegistry>,
        timers: Arc<DeferredQueue>,
    ) -> Self {
        let state = ComboState {
            is_open: false,
            active_option: None,
            active_option_index: NO_INDEX,
            active_selected_option: props.selection.first().cloned(),
            active_selected_index: if props.selection.is_empty() { NO_INDEX } else { 0 },
            listbox_has_focus: false,
            input_value: String::new(),
        };
        Self {
            id: ComboId::next(),
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner { props, state }),
                signals: ComboSignals::default(),
            }),
            registry,
            timers,
            pending_close: Mutex::new(None),
        }
    }

    /// This instance's id, as seen by the registry.
    pub fn id(&self) -> ComboId {
        self.id
    }

    /// The notification signals.
    pub fn signals(&self) -> &ComboSignals {
        &self.shared.signals
    }

    /// A snapshot of the current interaction state.
    pub fn state(&self) -> ComboState {
        self.shared.inner.lock().state.clone()
    }

    /// A snapshot of the current props.
    pub fn props(&self) -> ComboProps {
        self.shared.inner.lock().props.clone()
    }

    /// The presenter resolved from display mode and cardinality.
    pub fn presenter(&self) -> PresenterVariant {
        let inner = self.shared.inner.lock();
        PresenterVariant::resolve(inner.props.display_mode, inner.props.multiple)
    }

    /// Whether the open flag is host-controlled.
    pub fn is_controlled(&self) -> bool {
        self.shared.inner.lock().props.open.is_some()
    }

    /// The merged open flag: the host-controlled value when present,
    /// otherwise the internal one.
    pub fn is_open_resolved(&self) -> bool {
        let inner = self.shared.inner.lock();
        inner.props.open.unwrap_or(inner.state.is_open)
    }

    /// Whether a menu option is currently highlighted.
    pub fn has_active_option(&self) -> bool {
        self.shared.inner.lock().state.active_option_index != NO_INDEX
    }

    // =========================================================================
    // Open / close
    // =========================================================================

    /// Open the dropdown if the variant policy permits auto-opening.
    ///
    /// The policy is deliberately an enumeration, not a rule: multiple
    /// selection always may open, read-only always may open, the inline
    /// listbox single-select only while nothing is selected, and base
    /// single-select never auto-opens (clicks open it unconditionally
    /// instead, see [`Self::handle_input_click`]).
    pub fn request_open(&self) {
        let permitted = {
            let inner = self.shared.inner.lock();
            Self::may_auto_open(&inner)
        };
        if permitted {
            self.open_now();
        }
    }

    /// Ask the host to close, and close locally when uncontrolled.
    pub fn request_close(&self) {
        self.shared.signals.close_requested.emit(());
        if !self.is_controlled() {
            self.close();
        }
    }

    /// Close the dropdown: release the registry claim, reset the menu
    /// highlight, clear the open flag, and notify. No-op when already
    /// closed. In controlled mode the flag itself is left to the host but
    /// the reset and the notification still happen.
    pub fn close(&self) {
        if !self.is_open_resolved() {
            return;
        }
        self.registry.release(self.id);
        transition_closed(&self.shared);
    }

    fn may_auto_open(inner: &Inner) -> bool {
        if inner.props.multiple {
            return true;
        }
        match inner.props.display_mode {
            DisplayMode::ReadOnly => true,
            DisplayMode::InlineListbox => inner.props.selection.is_empty(),
            DisplayMode::Base => false,
        }
    }

    /// Open regardless of the auto-open policy.
    ///
    /// Controlled mode only emits `open_requested`. Uncontrolled mode claims
    /// the registry first, so another instance's close notification fires
    /// before our opened notification.
    fn open_now(&self) {
        if self.is_open_resolved() {
            return;
        }
        if self.is_controlled() {
            self.shared.signals.open_requested.emit(());
            return;
        }

        let shared = Arc::downgrade(&self.shared);
        self.registry.claim(
            self.id,
            Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    transition_closed(&shared);
                }
            }),
        );

        self.shared.inner.lock().state.is_open = true;
        tracing::debug!(target: "trellis::combobox", id = ?self.id, "dropdown opened");
        self.shared.signals.opened.emit(());
    }

    // =========================================================================
    // Keyboard dispatch
    // =========================================================================

    /// Dispatch a key press aimed at the text input.
    ///
    /// Returns `true` when the key was consumed; unrecognized keys pass
    /// through untouched.
    pub fn handle_key_press(&self, event: &KeyPressEvent) -> bool {
        match event.key {
            Key::ArrowDown if !event.modifiers.shift => {
                self.request_open();
                self.navigate_options(1);
                true
            }
            Key::ArrowUp if !event.modifiers.shift => {
                if self.is_open_resolved() {
                    self.navigate_options(-1);
                    true
                } else {
                    false
                }
            }
            Key::Escape => {
                if self.is_open_resolved() {
                    self.close();
                    true
                } else {
                    false
                }
            }
            Key::Enter => {
                let (active, free_text) = {
                    let inner = self.shared.inner.lock();
                    let free_text = (!inner.props.predefined_options_only
                        && !inner.state.input_value.is_empty())
                    .then(|| inner.state.input_value.clone());
                    (inner.state.active_option.clone(), free_text)
                };
                if let Some(choice) = active {
                    self.commit_selection(choice);
                    true
                } else if let Some(text) = free_text {
                    tracing::debug!(target: "trellis::combobox", "free text submitted");
                    self.shared.signals.submitted.emit(text);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Move the menu highlight by `offset`, clamped to the option list.
    fn navigate_options(&self, offset: i32) {
        let mut inner = self.shared.inner.lock();
        let len = inner.props.options.len();
        let index = next_index(inner.state.active_option_index, offset, len, IndexWrap::Clamp);
        inner.state.active_option_index = index;
        inner.state.active_option = usize::try_from(index)
            .ok()
            .and_then(|index| inner.props.options.get(index).cloned());

        // With predefined options only, the input mirrors the highlight.
        if inner.props.predefined_options_only
            && let Some(choice) = &inner.state.active_option
        {
            inner.state.input_value = choice.label.clone();
        }
    }

    // =========================================================================
    // Pointer and focus dispatch
    // =========================================================================

    /// A click on the text input.
    ///
    /// Base and read-only variants open unconditionally on click; the others
    /// follow the auto-open policy.
    pub fn handle_input_click(&self) {
        let permitted = {
            let inner = self.shared.inner.lock();
            matches!(
                inner.props.display_mode,
                DisplayMode::Base | DisplayMode::ReadOnly
            ) || Self::may_auto_open(&inner)
        };
        if permitted {
            self.open_now();
        }
    }

    /// A click on the menu option at `index`.
    ///
    /// A stale index (beyond the current option list) is a no-op.
    pub fn handle_option_click(&self, index: usize) {
        let choice = self.shared.inner.lock().props.options.get(index).cloned();
        if let Some(choice) = choice {
            self.commit_selection(choice);
        }
    }

    /// The text input gained focus.
    pub fn handle_input_focus(&self) {
        self.shared.signals.focused.emit(());
    }

    /// The text input lost focus.
    ///
    /// The close is deferred by [`BLUR_CLOSE_DELAY`] so that a menu-item
    /// click racing the blur is processed first. The scheduled task holds
    /// only weak handles and re-checks the open flag, so it is a no-op when
    /// the widget was torn down or the dropdown already closed; teardown
    /// additionally cancels it outright.
    pub fn handle_input_blur(&self) {
        self.shared.signals.blurred.emit(());

        let mut pending = self.pending_close.lock();
        if let Some(task) = pending.take() {
            let _ = self.timers.cancel(task);
        }

        let id = self.id;
        let shared = Arc::downgrade(&self.shared);
        let registry = Arc::downgrade(&self.registry);
        let task = self.timers.schedule(BLUR_CLOSE_DELAY, move || {
            let (Some(shared), Some(registry)) = (shared.upgrade(), registry.upgrade()) else {
                return;
            };
            let (controlled, open) = {
                let inner = shared.inner.lock();
                (
                    inner.props.open.is_some(),
                    inner.props.open.unwrap_or(inner.state.is_open),
                )
            };
            if !open {
                return;
            }
            if controlled {
                shared.signals.close_requested.emit(());
            } else {
                registry.release(id);
                transition_closed(&shared);
            }
        });
        *pending = Some(task);
    }

    /// The text input value changed (user typed).
    ///
    /// Typing requests an open under the same policy as
    /// [`Self::request_open`].
    pub fn handle_input_changed(&self, value: impl Into<String>) {
        let value = value.into();
        self.shared.inner.lock().state.input_value = value.clone();
        self.shared.signals.input_changed.emit(value);
        self.request_open();
    }

    // =========================================================================
    // Selection commit
    // =========================================================================

    /// Commit `choice`: compute the new selection, notify, close the
    /// dropdown, and return logical focus to the input.
    ///
    /// A choice that is no longer in the option list (stale highlight) is a
    /// no-op.
    fn commit_selection(&self, choice: Choice) {
        let new_selection = {
            let inner = self.shared.inner.lock();
            if !inner.props.options.contains(&choice) {
                return;
            }
            reduce_selection(&inner.props.selection, &choice, inner.props.multiple)
        };
        tracing::debug!(
            target: "trellis::combobox",
            selected = new_selection.len(),
            "selection committed"
        );
        self.shared.signals.selection_changed.emit(new_selection);
        self.close();
        self.shared.signals.focus_moved.emit(FocusTarget::Input);
    }

    // =========================================================================
    // Pill strip
    // =========================================================================

    /// Dispatch a key press aimed at the pill strip.
    pub fn handle_pill_key_press(&self, event: &KeyPressEvent) -> bool {
        match event.key {
            Key::ArrowLeft => {
                self.navigate_pills(-1);
                true
            }
            Key::ArrowRight => {
                self.navigate_pills(1);
                true
            }
            Key::Delete | Key::Backspace => {
                let index = self.shared.inner.lock().state.active_selected_index;
                match usize::try_from(index) {
                    Ok(index) => {
                        self.remove_selected_at(index);
                        true
                    }
                    Err(_) => false,
                }
            }
            _ => false,
        }
    }

    /// Move the pill focus by `offset`, wrapping at both ends.
    pub fn navigate_pills(&self, offset: i32) {
        let target = {
            let mut inner = self.shared.inner.lock();
            inner.state.listbox_has_focus = true;
            let len = inner.props.selection.len();
            let index = next_index(
                inner.state.active_selected_index,
                offset,
                len,
                IndexWrap::Wrap,
            );
            inner.state.active_selected_index = index;
            inner.state.active_selected_option = usize::try_from(index)
                .ok()
                .and_then(|index| inner.props.selection.get(index).cloned());
            usize::try_from(index).ok()
        };
        if let Some(index) = target {
            self.shared.signals.focus_moved.emit(FocusTarget::Pill(index));
        }
    }

    /// Remove the pill at `index`.
    ///
    /// Emits `remove_requested` with the selection minus the removed entry,
    /// then moves pill focus: back to the input when the strip is emptying
    /// (one pill left, or two in read-only multi-select), to the new last
    /// pill when the removed pill was last, otherwise staying at the same
    /// index (now the next pill). An index beyond the selection is a no-op.
    pub fn remove_selected_at(&self, index: usize) {
        let (new_selection, focus_after) = {
            let inner = self.shared.inner.lock();
            let Some(new_selection) = without_index(&inner.props.selection, index) else {
                return;
            };
            let before = inner.props.selection.len();
            let readonly_multiple = inner.props.display_mode == DisplayMode::ReadOnly
                && inner.props.multiple;
            let focus_after = if before == 1 || (readonly_multiple && before == 2) {
                FocusTarget::Input
            } else if index == before - 1 {
                FocusTarget::Pill(before - 2)
            } else {
                FocusTarget::Pill(index)
            };
            (new_selection, focus_after)
        };

        tracing::debug!(target: "trellis::combobox", index, "pill removal requested");
        self.shared.signals.remove_requested.emit(new_selection.clone());

        {
            let mut inner = self.shared.inner.lock();
            match focus_after {
                FocusTarget::Input => {
                    inner.state.active_selected_option = None;
                    inner.state.active_selected_index = NO_INDEX;
                    inner.state.listbox_has_focus = false;
                }
                FocusTarget::Pill(pill) => {
                    inner.state.active_selected_index = pill as i32;
                    inner.state.active_selected_option = new_selection.get(pill).cloned();
                }
            }
        }
        self.shared.signals.focus_moved.emit(focus_after);
    }

    // =========================================================================
    // Property updates
    // =========================================================================

    /// Replace the option list, reconciling the menu highlight.
    ///
    /// If the previously highlighted option still exists (by value) in the
    /// new list, the index follows it to its new position; otherwise the
    /// highlight is cleared.
    pub fn set_options(&self, options: Vec<Choice>) {
        let mut inner = self.shared.inner.lock();
        if let Some(active) = inner.state.active_option.clone() {
            match options.iter().position(|choice| *choice == active) {
                Some(position) => inner.state.active_option_index = position as i32,
                None => {
                    inner.state.active_option = None;
                    inner.state.active_option_index = NO_INDEX;
                }
            }
        }
        inner.props.options = options;
    }

    /// Replace the selection, reconciling the pill focus.
    ///
    /// The focused pill follows its value-equal entry to its new position;
    /// if it is gone, the focus clamps to the last pill, or clears when the
    /// selection emptied.
    pub fn set_selection(&self, selection: Vec<Choice>) {
        let mut inner = self.shared.inner.lock();
        if let Some(active) = inner.state.active_selected_option.clone() {
            match selection.iter().position(|choice| *choice == active) {
                Some(position) => inner.state.active_selected_index = position as i32,
                None if selection.is_empty() => {
                    inner.state.active_selected_option = None;
                    inner.state.active_selected_index = NO_INDEX;
                    inner.state.listbox_has_focus = false;
                }
                None => {
                    let clamped =
                        (inner.state.active_selected_index.max(0) as usize).min(selection.len() - 1);
                    inner.state.active_selected_index = clamped as i32;
                    inner.state.active_selected_option = selection.get(clamped).cloned();
                }
            }
        }
        inner.props.selection = selection;
    }

    /// Update the host-controlled open flag.
    ///
    /// Moving the resolved flag from open to closed resets the menu
    /// highlight, like any other close; no notifications fire, since the
    /// host drove the change.
    pub fn set_open(&self, open: Option<bool>) {
        let mut inner = self.shared.inner.lock();
        let was_open = inner.props.open.unwrap_or(inner.state.is_open);
        inner.props.open = open;
        let now_open = inner.props.open.unwrap_or(inner.state.is_open);
        if was_open && !now_open {
            inner.state.active_option = None;
            inner.state.active_option_index = NO_INDEX;
        }
    }
}

impl Drop for ComboboxController {
    fn drop(&mut self) {
        if let Some(task) = self.pending_close.lock().take() {
            let _ = self.timers.cancel(task);
        }
        self.registry.release(self.id);
    }
}

static_assertions::assert_impl_all!(ComboboxController: Send, Sync);
