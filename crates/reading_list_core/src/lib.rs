pub mod domain;
pub mod ports;

pub use domain::{Book, BookId, BookPatch, NewBook, ReadingStatus, UnknownStatus};
pub use ports::{BookRepository, PortError, PortResult};
