//! Desktop adapters for the archive reader: a JSON file archive and
//! log-backed feedback sinks.

pub mod feedback;
pub mod storage;
