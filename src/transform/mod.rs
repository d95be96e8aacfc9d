//! Remote image transformation.

mod client;
pub mod providers;

pub use client::{TransformClient, TransformRequest};
