//! Presentation variant selection.
//!
//! The widget renders through one of five presenters chosen by display mode
//! and cardinality. The controller only resolves which presenter applies;
//! the presenters themselves live in the rendering layer.

/// How the widget is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Text input with a dropdown menu.
    #[default]
    Base,
    /// Inline listbox with a pill strip for selected items.
    InlineListbox,
    /// Picklist-like presentation; the input is not editable.
    ReadOnly,
}

impl DisplayMode {
    /// Parse a display-mode token as supplied by the host.
    ///
    /// Unrecognized tokens deliberately fall back to [`DisplayMode::Base`];
    /// a misconfigured host gets the base presentation instead of a broken
    /// widget.
    pub fn from_token(token: &str) -> Self {
        match token {
            "inline-listbox" => Self::InlineListbox,
            "readonly" => Self::ReadOnly,
            _ => Self::Base,
        }
    }
}

/// The resolved presenter for a display mode and cardinality.
///
/// [`PresenterVariant::Base`] handles both cardinalities, which also makes
/// it the fallback arm for any mode/cardinality pairing outside the
/// recognized table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterVariant {
    /// Base presenter (single and multiple).
    Base,
    /// Inline listbox, single selection.
    InlineSingle,
    /// Inline listbox, multiple selection.
    InlineMultiple,
    /// Read-only picklist, single selection.
    ReadOnlySingle,
    /// Read-only picklist, multiple selection.
    ReadOnlyMultiple,
}

impl PresenterVariant {
    /// Resolve the presenter for a display mode and cardinality.
    pub fn resolve(mode: DisplayMode, multiple: bool) -> Self {
        match (mode, multiple) {
            (DisplayMode::Base, _) => Self::Base,
            (DisplayMode::InlineListbox, false) => Self::InlineSingle,
            (DisplayMode::InlineListbox, true) => Self::InlineMultiple,
            (DisplayMode::ReadOnly, false) => Self::ReadOnlySingle,
            (DisplayMode::ReadOnly, true) => Self::ReadOnlyMultiple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parsing() {
        assert_eq!(DisplayMode::from_token("inline-listbox"), DisplayMode::InlineListbox);
        assert_eq!(DisplayMode::from_token("readonly"), DisplayMode::ReadOnly);
        assert_eq!(DisplayMode::from_token(""), DisplayMode::Base);
        // Unrecognized tokens fall back to base.
        assert_eq!(DisplayMode::from_token("picklist-like"), DisplayMode::Base);
    }

    #[test]
    fn test_resolution_table() {
        assert_eq!(PresenterVariant::resolve(DisplayMode::Base, false), PresenterVariant::Base);
        assert_eq!(PresenterVariant::resolve(DisplayMode::Base, true), PresenterVariant::Base);
        assert_eq!(
            PresenterVariant::resolve(DisplayMode::InlineListbox, false),
            PresenterVariant::InlineSingle
        );
        assert_eq!(
            PresenterVariant::resolve(DisplayMode::InlineListbox, true),
            PresenterVariant::InlineMultiple
        );
        assert_eq!(
            PresenterVariant::resolve(DisplayMode::ReadOnly, false),
            PresenterVariant::ReadOnlySingle
        );
        assert_eq!(
            PresenterVariant::resolve(DisplayMode::ReadOnly, true),
            PresenterVariant::ReadOnlyMultiple
        );
    }

    #[test]
    fn test_unrecognized_token_resolves_to_base_presenter() {
        let mode = DisplayMode::from_token("no-such-mode");
        assert_eq!(PresenterVariant::resolve(mode, true), PresenterVariant::Base);
    }
}
