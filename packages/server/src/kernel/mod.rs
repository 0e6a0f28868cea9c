//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod dns;
pub mod memory_store;
pub mod postgres_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{MailerAdapter, ServerDeps};
pub use dns::HickoryMxResolver;
pub use memory_store::MemoryStore;
pub use postgres_store::PostgresStore;
pub use test_dependencies::TestDependencies;
pub use traits::*;
