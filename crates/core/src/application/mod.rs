// Application Layer - Use Cases

pub mod inference;
pub mod panic_guard;

// Re-exports
pub use inference::InferenceService;
