pub mod handlers;
pub mod store;

pub use store::DocumentStore;
