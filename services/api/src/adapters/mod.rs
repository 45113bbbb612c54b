pub mod db;
pub mod memory;

pub use db::PgBookRepository;
pub use memory::InMemoryBookRepository;
