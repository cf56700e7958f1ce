//! Light/dark theme, held for the session only

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the toggle control, naming the mode it switches to
    pub fn control_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark Mode",
            Theme::Dark => "Light Mode",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip_and_labels() {
        let theme = Theme::default();
        assert_eq!(theme.control_label(), "Dark Mode");
        let dark = theme.toggled();
        assert!(dark.is_dark());
        assert_eq!(dark.control_label(), "Light Mode");
        assert_eq!(dark.toggled(), Theme::Light);
    }
}
