//! molcompass-web — Web UI for Molecular Compass
//! Provides a single-page candidate console with:
//!   - Target input and generate-and-evaluate trigger
//!   - 2D depiction, SMILES, and predicted-property outputs
//!   - JSON API for the same operation
//!   - SSE event stream for the activity feed

pub mod handlers;
pub mod router;
pub mod sse;
pub mod state;
