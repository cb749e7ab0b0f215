//! CLI command implementations.

pub mod annotate;
pub mod compress;
pub mod constrain;
pub mod expand;
pub mod load;
pub mod validate;

#[cfg(test)]
mod fixtures;
