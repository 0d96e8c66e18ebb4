//! Repetition tracking across generated routes.
//!
//! Routes are reduced to fingerprints of fixed-size coordinate windows;
//! two routes that share fingerprints walk the same stretch of ground.

mod hasher;
mod scorer;

pub use hasher::{fingerprint, segmentize};
pub use scorer::{overlap, VarietyScorer};
