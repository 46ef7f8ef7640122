//! Corpus indexing: section splitting and overlapping-window chunking.

pub mod chunker;
