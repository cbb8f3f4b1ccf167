//! Indentation queries
//!
//!     An editor asks for indentation when the user types a character that can change it,
//!     e.g. a closing brace. This module answers those queries against a
//!     [Document](document::Document) the editor owns.
//!
//!     The [IndentEngine](engine::IndentEngine) keeps an ordered list of resolvers, each
//!     registered for one "hot" character. A query tries the resolvers for the character at
//!     the offset in registration order and the first one that returns an indentation wins.
//!     A resolver returning `None` passes the question on.
//!
//!     Offsets reported by the editor may be stale. A resolver hitting one returns
//!     `BadLocation`, the engine logs it and carries on as if the resolver had no answer.

pub mod document;
pub mod engine;
pub mod java;

pub use document::{BadLocation, Document, DocumentMut, TextDocument};
pub use engine::{IndentEngine, Resolver};
