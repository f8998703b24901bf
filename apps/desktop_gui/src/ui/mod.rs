//! UI layer: the single classification page.

pub mod app;

pub use app::ClassifierApp;
