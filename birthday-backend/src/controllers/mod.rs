pub mod health;
pub mod memories;
pub mod page;
pub mod songs;
pub mod uploads;
pub mod wishes;
