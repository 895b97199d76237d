//! Rotating example utterances shown in the search placeholder

mod rotator;

pub use rotator::{HintRotator, HintState};

/// Example utterances, in display order
pub const SEARCH_HINTS: &[&str] = &[
    "Say a book name",
    "Say a keyword",
    "Say a category: Fiction",
    "Say a category: Mystery",
    "Say a category: Biography",
    "Say 'Go to Home'",
    "Say 'Show All Books'",
    "Say 'Add Book'",
];
