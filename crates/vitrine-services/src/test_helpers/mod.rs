//! Test helpers: in-memory implementations of the data-access and storage
//! traits, for testing services without a database or a real disk.

mod mocks;

pub use mocks::{MockMediaStore, MockStorage};
