use rand::distr::{Alphanumeric, SampleString};

/// Reader, processor and writer contracts
pub mod item;

/// Job orchestration
pub mod job;

/// Chunk-oriented step
pub mod step;

/// Generates a random name consisting of alphanumeric characters.
///
/// # Returns
///
/// A `String` containing the generated random name.
fn build_name() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 8)
}
