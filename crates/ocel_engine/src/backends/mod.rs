//! Concrete backend adapters with complementary capability subsets.
mod dummy;
mod execution;
mod relation;

pub use dummy::DummyBackend;
pub use execution::ExecutionBackend;
pub use relation::RelationBackend;
