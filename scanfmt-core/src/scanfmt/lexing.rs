//! Lexing
//!
//!     This module holds the character-level scanners and the driver that feeds them. A
//!     scanner is split in two parts:
//!
//!         1. A `Syntax`: the hand-written state machine. It reads characters from a
//!            `ScanBuffer` and reports one `TokenKind` per call. It owns nothing but its
//!            state.
//!
//!         2. The `Scanner` driver. It owns the `ScanBuffer`, turns kinds into `Token`s with
//!            absolute offsets, and implements the streaming and snapshot protocols on top
//!            of the syntax.
//!
//!     Keeping the buffer out of the state machine is what lets the multi-syntax layer run a
//!     master and its children over the same window.
//!
//! Streaming and Pre-scan
//!
//!     Text reaches a scanner in pieces. When a piece ends in the middle of a token and more
//!     text is coming, the syntax stops and `next_token()` returns `None`. The characters of
//!     the unfinished token (the pre-scan) have already been consumed by the state machine.
//!     They must be presented again together with the next piece, in front of it, so the
//!     token can be emitted whole. `Scanner::relocate` performs that splice.
//!
//! State Marks
//!
//!     A `StateMark` captures the syntax state plus the pre-scan length at the current scan
//!     position. A different scanner instance can load the mark, receive text starting
//!     `prescan` characters before that position, and continue producing exactly the tokens
//!     the original scanner would have produced. Incremental re-highlighters compare marks
//!     to stop re-lexing as soon as the state after an edit converges with the state that
//!     was recorded before it.
//!
//! Errors
//!
//!     Malformed text never fails: every syntax has an error token and resynchronizes at the
//!     next boundary. Only API misuse (loading a mark from a different syntax, registering a
//!     child too late) surfaces as a `ScanError`.

pub mod buffer;
pub mod common;
pub mod html;
pub mod java;
pub mod keywords;
pub mod multi;
pub mod scanner;

pub use buffer::ScanBuffer;
pub use common::{MarkCompare, ScanError, StateMark, Syntax, SyntaxState};
pub use html::{HtmlSyntax, HtmlTokenId};
pub use java::{JavaSyntax, JavaTokenId};
pub use keywords::{match_keyword, match_keyword_str, match_operator, Keyword, Operator};
pub use multi::{MultiSyntax, Region};
pub use scanner::Scanner;
