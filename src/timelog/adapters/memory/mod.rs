//! In-memory adapters for timelog ports.

mod entry;

pub use entry::InMemoryTimeEntryRepository;
