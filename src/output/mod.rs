//! Persisting rendered playbooks

pub mod writer;

pub use writer::PlaybookWriter;
