//! Static phrase tables

/// Spoken or typed trigger for a route change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationCommand {
    /// Lowercase trigger, matched as a substring
    pub phrase: &'static str,
    pub target_path: &'static str,
}

const fn nav(phrase: &'static str, target_path: &'static str) -> NavigationCommand {
    NavigationCommand {
        phrase,
        target_path,
    }
}

/// Navigation triggers in priority order; the first contained phrase wins
pub const NAVIGATION_COMMANDS: &[NavigationCommand] = &[
    nav("go to home", "/"),
    nav("go home", "/"),
    nav("home page", "/"),
    nav("all books", "/all-books"),
    nav("show all books", "/all-books"),
    nav("browse books", "/all-books"),
    nav("add book", "/add-book"),
    nav("borrowed books", "/borrowed-books"),
    nav("my books", "/borrowed-books"),
    nav("profile", "/profile"),
    nav("my profile", "/profile"),
    nav("login", "/login"),
    nav("sign in", "/login"),
    nav("register", "/register"),
    nav("sign up", "/register"),
];

/// Markers that turn the rest of the utterance into a lookup query
pub const SEARCH_MARKERS: &[&str] = &["search for", "find"];

/// Utterances that ask for the command listing
pub const HELP_PHRASES: &[&str] = &["help", "what can i say"];

pub const HELP_TEXT: &str = "Available voice commands:
- \"Go to home\" or \"Home page\"
- \"All books\" or \"Browse books\"
- \"Add book\" (requires login)
- \"Borrowed books\" or \"My books\" (requires login)
- \"Profile\" or \"My profile\" (requires login)
- \"Login\" or \"Sign in\"
- \"Register\" or \"Sign up\"
- \"Search for [term]\" or \"Find [term]\"
- \"Help\" or \"What can I say\"";

