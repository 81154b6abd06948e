//! Page selection and the screen router.

/// Pages reachable from the sidebar once logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Chat,
    Documents,
    Profile,
    Program,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Chat, Page::Documents, Page::Profile, Page::Program];

    /// Get the display title for this page.
    pub fn title(&self) -> &'static str {
        match self {
            Page::Chat => "Coach",
            Page::Documents => "Documents",
            Page::Profile => "My Profile",
            Page::Program => "My Program",
        }
    }

    /// Get the next page (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Page::Chat => Page::Documents,
            Page::Documents => Page::Profile,
            Page::Profile => Page::Program,
            Page::Program => Page::Chat,
        }
    }

    /// Get the previous page (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Page::Chat => Page::Program,
            Page::Documents => Page::Chat,
            Page::Profile => Page::Documents,
            Page::Program => Page::Profile,
        }
    }
}

/// What the shell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Page(Page),
}

impl Screen {
    /// Without a session only the login screen is reachable, whatever page
    /// was last selected.
    pub fn resolve(session_active: bool, selected: Page) -> Self {
        if session_active {
            Screen::Page(selected)
        } else {
            Screen::Login
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_requires_session() {
        for page in Page::ALL {
            assert_eq!(Screen::resolve(false, page), Screen::Login);
            assert_eq!(Screen::resolve(true, page), Screen::Page(page));
        }
    }

    #[test]
    fn test_default_page_is_chat() {
        assert_eq!(Page::default(), Page::Chat);
    }

    #[test]
    fn test_page_next() {
        assert_eq!(Page::Chat.next(), Page::Documents);
        assert_eq!(Page::Documents.next(), Page::Profile);
        assert_eq!(Page::Profile.next(), Page::Program);
        assert_eq!(Page::Program.next(), Page::Chat); // Wraps around
    }

    #[test]
    fn test_page_prev() {
        assert_eq!(Page::Chat.prev(), Page::Program); // Wraps around
        assert_eq!(Page::Program.prev(), Page::Profile);
        assert_eq!(Page::Profile.prev(), Page::Documents);
        assert_eq!(Page::Documents.prev(), Page::Chat);
    }
}
