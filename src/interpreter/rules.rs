//! Ordered classification rules
//!
//! Classification walks [`PRECEDENCE`] front to back. Each rule either
//! commits an intent, discards the utterance, or passes to the next rule.

use tracing::debug;

use super::commands::{NavigationCommand, HELP_PHRASES, NAVIGATION_COMMANDS, SEARCH_MARKERS};
use crate::navigation::RouteTable;

/// Classified outcome of an utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Route change to a navigation command's target
    Navigate(&'static NavigationCommand),
    /// Navigation matched but the route needs a signed-in user
    NavigationDenied(&'static NavigationCommand),
    /// Book lookup with the given query
    Lookup { query: String },
    /// Show the command listing
    Help,
    /// Nothing usable in the utterance
    Unrecognized { utterance: String },
}

impl Intent {
    /// Short label used in logs and events
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Navigate(_) => "navigate",
            Intent::NavigationDenied(_) => "navigation_denied",
            Intent::Lookup { .. } => "lookup",
            Intent::Help => "help",
            Intent::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// One step of the classification procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// First navigation phrase contained in the utterance
    Navigation,
    /// "search for ..." / "find ..."
    ExplicitSearch,
    /// The whole utterance is a help phrase
    Help,
    /// Any other non-empty utterance, taken verbatim
    DirectLookup,
    /// Catch-all for blank input
    Unrecognized,
}

/// Rule evaluation order; the first rule that commits or discards wins
pub const PRECEDENCE: [Rule; 5] = [
    Rule::Navigation,
    Rule::ExplicitSearch,
    Rule::Help,
    Rule::DirectLookup,
    Rule::Unrecognized,
];

enum Verdict {
    Commit(Intent),
    Discard,
    Pass,
}

/// Utterance as typed or spoken, alongside its normalized form
struct Utterance<'a> {
    verbatim: &'a str,
    normalized: String,
}

impl<'a> Utterance<'a> {
    fn new(raw: &'a str) -> Self {
        let verbatim = raw.trim();
        Self {
            verbatim,
            normalized: normalize(verbatim),
        }
    }
}

/// Lowercase, trim and collapse runs of whitespace
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Maps utterances to intents using the static phrase tables
#[derive(Debug, Clone, Copy)]
pub struct CommandInterpreter {
    commands: &'static [NavigationCommand],
    routes: RouteTable,
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new(NAVIGATION_COMMANDS, RouteTable::default())
    }
}

impl CommandInterpreter {
    pub fn new(commands: &'static [NavigationCommand], routes: RouteTable) -> Self {
        Self { commands, routes }
    }

    /// Classify an utterance. `None` means it was discarded without feedback.
    ///
    /// The result depends only on the normalized text and `signed_in`.
    pub fn interpret(&self, utterance: &str, signed_in: bool) -> Option<Intent> {
        let utterance = Utterance::new(utterance);

        for rule in PRECEDENCE {
            match self.apply(rule, &utterance, signed_in) {
                Verdict::Commit(intent) => {
                    debug!(?rule, intent = intent.label(), "utterance classified");
                    return Some(intent);
                }
                Verdict::Discard => {
                    debug!(?rule, "utterance discarded");
                    return None;
                }
                Verdict::Pass => {}
            }
        }

        None
    }

    /// First navigation command whose phrase occurs in `normalized`
    pub fn match_navigation(&self, normalized: &str) -> Option<&'static NavigationCommand> {
        self.commands
            .iter()
            .find(|command| normalized.contains(command.phrase))
    }

    fn apply(&self, rule: Rule, utterance: &Utterance<'_>, signed_in: bool) -> Verdict {
        match rule {
            Rule::Navigation => match self.match_navigation(&utterance.normalized) {
                Some(command) if self.routes.requires_auth(command.target_path) && !signed_in => {
                    Verdict::Commit(Intent::NavigationDenied(command))
                }
                Some(command) => Verdict::Commit(Intent::Navigate(command)),
                None => Verdict::Pass,
            },
            Rule::ExplicitSearch => {
                if !SEARCH_MARKERS
                    .iter()
                    .any(|marker| utterance.normalized.contains(marker))
                {
                    return Verdict::Pass;
                }
                let query = strip_search_markers(&utterance.normalized);
                if query.is_empty() {
                    Verdict::Discard
                } else {
                    Verdict::Commit(Intent::Lookup { query })
                }
            }
            Rule::Help => {
                if HELP_PHRASES.contains(&utterance.normalized.as_str()) {
                    Verdict::Commit(Intent::Help)
                } else {
                    Verdict::Pass
                }
            }
            Rule::DirectLookup => {
                if utterance.verbatim.is_empty() {
                    Verdict::Pass
                } else {
                    Verdict::Commit(Intent::Lookup {
                        query: utterance.verbatim.to_string(),
                    })
                }
            }
            Rule::Unrecognized => Verdict::Commit(Intent::Unrecognized {
                utterance: utterance.verbatim.to_string(),
            }),
        }
    }
}

/// Remove the first occurrence of each search marker
fn strip_search_markers(normalized: &str) -> String {
    let stripped = SEARCH_MARKERS
        .iter()
        .fold(normalized.to_string(), |text, marker| text.replacen(marker, "", 1));
    normalize(&stripped)
}
