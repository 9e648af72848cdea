pub mod memory_notes;
pub mod wishes;
