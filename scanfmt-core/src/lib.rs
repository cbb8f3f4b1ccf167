//! # scanfmt
//!
//! Incremental scanners and a line-oriented reformatting writer, meant to sit inside an
//! editor pipeline.
//!
//! File Layout
//!
//!     The scanners and the writer are separate layers that only meet through the token
//!     stream. The writer never looks at characters the scanner has not classified, and the
//!     scanners never know a writer exists.
//!
//!     src/scanfmt
//!       ├── token       Token ids, tokens and token rendering
//!       ├── lexing      Scan buffer, scanner driver, state marks and the syntaxes
//!       ├── formatting  Format options, text sinks and the incremental writer
//!       ├── indent      Document abstraction and the hot-character resolver chain
//!       └── testing     Helpers shared by unit and integration tests
//!
//! For the resumable scanning contract, see the [lexing module](scanfmt::lexing).

pub mod scanfmt;
