//! In-memory classifier adapters for tests.

mod scripted;

pub use scripted::ScriptedClassifier;
