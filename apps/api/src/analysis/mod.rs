// Resume analysis core.
// Lexicon → extractor / scorer / suggestions → result, plus the batch
// pipeline and HTTP handler that drive it. Everything below `pipeline` is
// pure and synchronous.

pub mod extractor;
pub mod handlers;
pub mod lexicon;
pub mod pipeline;
pub mod result;
pub mod scorer;
pub mod suggestions;
