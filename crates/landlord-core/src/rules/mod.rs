pub mod classifier;

pub use classifier::{Classification, beats, classify};
