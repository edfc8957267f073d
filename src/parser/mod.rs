//! PDF loading and text extraction.

mod backend;
mod text;

pub(crate) use backend::load_lopdf;
pub use backend::{PageAssembler, TextExtractor};
pub use text::LopdfTextExtractor;
