//! Rendering of navigation results.
//!
//! Every result type implements [`Display`](std::fmt::Display) with the
//! compact, labelled text an agent reads; [`to_json`] gives the same data
//! as JSON.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{NO_TOC_HINT, SCANNED_WARNING};
