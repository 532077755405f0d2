//! molcompass-agents — The simulated discovery agents of Molecular Compass:
//! 1. Generating candidate molecule SMILES (mock generative chemist)
//! 2. Predicting binding affinity, toxicity, and bioavailability (mock predictor)
//! 3. Orchestrating generate → predict → depict into a candidate report
//!
//! Both agents are explicit placeholders: the generator picks from a fixed
//! fragment list and the predictor draws random scores. Only the SMILES
//! parsing and depiction behind them are real.

pub mod generator;
pub mod pipeline;
pub mod predictor;

pub use generator::{Candidate, GenerativeChemist};
pub use pipeline::{CandidateReport, CompassPipeline};
pub use predictor::{PredictedProperties, PropertyPredictor};
