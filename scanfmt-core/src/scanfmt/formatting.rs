//! Formatting
//!
//!     This module holds the line-oriented reformatting writer. Text is written to it in
//!     arbitrary pieces; it runs them through a scanner and rebuilds every line from the
//!     tokens, replacing the original indentation with the one computed by a
//!     [FormatLayer](writer::FormatLayer).
//!
//!         text pieces -> Scanner -> tokens -> FormatLayer -> LineBuffer -> TextSink
//!
//!     The writer never sees a whole document. Each line is emitted as soon as its EOL
//!     token arrives, which keeps memory flat and lets an editor stream a selection
//!     through it.
//!
//! Early Flush
//!
//!     Editors ask for the indentation of a line before the user finished typing it. A
//!     `flush()` in the middle of a line writes out what the line holds so far, including
//!     the characters of a token the scanner has not finished yet, with indentation
//!     prepended. The writer remembers that the line was flushed early so the rest of the
//!     line is appended without a second indentation.
//!
//!     On the very first line an early flush of an empty line still produces the
//!     indentation. That lets a caller that has typed nothing yet learn where the caret
//!     goes. Later empty lines stay empty.

pub mod java;
pub mod options;
pub mod sink;
pub mod writer;

pub use java::JavaFormatLayer;
pub use options::{FormatOptions, WriterOptions};
pub use sink::{IoSink, TextSink};
pub use writer::{format_text, FormatError, FormatLayer, FormatWriter, LineCtx};
