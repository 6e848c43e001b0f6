//! Scans note bodies into a stream of tag, note-link and plain-text tokens.
//!
//! The grammar is composed once from the combinators in `matcher-framework`
//! and reused for every note; scanning itself is pure and total, so even
//! irregular input comes back as a finite token sequence whose spans
//! reconstruct the input exactly.

pub mod grammar;
pub mod scanner;
pub mod token;

pub use grammar::Grammar;
pub use scanner::Scanner;
pub use token::Token;
