// src/error.rs
//! Error handling for the one real boundary this core has: a
//! malformed triangle stream handed to `build_mesh`.
//!
//! Everything downstream of a well-formed stream (degenerate
//! triangles, singular quadrics, stale heap entries) is handled
//! locally with a principled fallback and never surfaces as an `Err` —
//! see spec §7. This is narrower than a general-purpose crate error
//! type because the domain is narrower: no file I/O, no parsing.

use thiserror::Error;

/// Errors `build_mesh` can report for a malformed caller-supplied stream.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The flat `[pos, uv, normal]` corner stream length was not a
    /// multiple of 3 corners (i.e. not a whole number of triangles).
    #[error("triangle stream has {corner_count} corners, which is not a multiple of 3")]
    MalformedTriangleStream { corner_count: usize },

    /// Rich context chaining (like anyhow but zero-cost when you control the types).
    #[error("{message}: {source}")]
    WithContext {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to any error (chainable, like `.context()` in anyhow).
    #[inline]
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext {
            message: context.into(),
            source: Box::new(self),
        }
    }

    #[inline]
    pub fn is_malformed_stream(&self) -> bool {
        matches!(self, Error::MalformedTriangleStream { .. })
    }
}

/// Convenient `Result` alias — use `crate::Result<T>` everywhere.
pub type Result<T> = std::result::Result<T, Error>;
