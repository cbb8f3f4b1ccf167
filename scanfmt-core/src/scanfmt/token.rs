//! Token types shared across the scanners, the multi-syntax layer and the writer.
//!
//!     A token is a classified span of the scan window. It carries no text of its own: the
//!     text lives in the scanner's buffer and is read back through the scanner that produced
//!     the token. Tokens are therefore cheap to copy and are not meant to outlive the scan
//!     window they point into.
//!
//! Token Id Space
//!
//!     Ids are small integers. Id `0` is reserved for the EOL pseudo-token every syntax
//!     emits when it consumes a line terminator. All other ids are private to a syntax and
//!     start at `1`. When syntaxes are composed (see
//!     [multi](crate::scanfmt::lexing::multi)) each child's ids are shifted into a range of
//!     their own so that a consumer sees one flat id space.
//!
//!     The end of the text is not a token: `next_token()` returns `None`.

pub mod core;
pub mod formatting;

pub use core::{Token, TokenId, TokenKind};
pub use formatting::{describe, detokenize};
