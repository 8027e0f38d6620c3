pub mod config;
pub mod library;
pub mod people;
pub mod session;
pub mod stats;

use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Seeded generator when `seed` is given, entropy otherwise.
pub fn rng(seed: Option<u64>) -> Mcg128Xsl64 {
    match seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    }
}
