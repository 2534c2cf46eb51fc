//! In-memory implementation of the feedtidy host capabilities.
//!
//! [`MemoryDocument`] is a small element tree with inline styles, classes,
//! attributes and fixed layout boxes. It implements every host trait, so the
//! controller can be driven against it without a browser: tests use it
//! directly, the `feedtidy replay` command loads it from a JSON fixture.
//!
//! Layout is static: boxes come from the fixture. The only layout rule the
//! document applies itself is that an element whose inline style hides or
//! zeroes it reports a zero-height box.

mod document;
mod error;
mod fixture;
mod host;

pub mod fixtures;

pub use document::MemoryDocument;
pub use error::FixtureError;
pub use fixture::{DocumentFixture, ElementSpec};
pub use host::ObserverRecord;

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
