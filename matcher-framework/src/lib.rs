//! Matcher Framework
//!
//! 提供基于不可变游标的原子匹配器和组合子，供 note-scanner 构建文法。

pub mod combinators;
pub mod cursor;
pub mod primitives;
pub mod result;
pub mod span;

pub use combinators::{Map, Matcher, Optional, Or, Repeat, Spanned, Then};
pub use cursor::Cursor;
pub use primitives::{
    char_where, end_of_input, literal, preceded_by, until_literal, CharWhere, EndOfInput, Literal,
    PrecededBy, UntilLiteral,
};
pub use result::MatchResult;
pub use span::Span;
