pub mod sqlite;
pub mod tables;

pub use sqlite::{Database, DbError, DbResult};
pub use tables::memory_notes::{MemoryNoteStore, NoteStore};
pub use tables::wishes::{CreateWishRequest, Wish, WishStore};
