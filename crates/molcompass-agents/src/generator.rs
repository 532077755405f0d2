//! Mock generative chemist agent.
//!
//! Stands in for a real generative model: picks a base fragment from a fixed
//! candidate list and sometimes "mutates" it by appending a modifier group.
//! The `-` in each modifier is the SMILES single-bond symbol, so plain string
//! concatenation always yields a parseable molecule.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Starting SMILES fragments the agent "generates" from.
pub const FRAGMENTS: &[&str] = &[
    "C1CC1",
    "C1=CC=C(C=C1)O",
    "CNC(=O)c1cn(C)c2ccccc12",
    "CC(C)CC(C)N",
    "c1ccccc1-c1ccccc1",
];

/// Modifier groups appended to simulate a generative step.
pub const MODIFIERS: &[&str] = &["-C(=O)O", "-N(=O)O", "-F", "-Cl"];

/// A generated candidate molecule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub smiles: String,
    pub source: String,
}

/// Generator for candidate molecules.
pub struct GenerativeChemist {
    mutation_probability: f64,
}

impl GenerativeChemist {
    /// Create a new GenerativeChemist. `mutation_probability` is the chance
    /// that a modifier group gets appended to the base fragment.
    pub fn new(mutation_probability: f64) -> Self {
        Self { mutation_probability: mutation_probability.clamp(0.0, 1.0) }
    }

    /// Generate a candidate using the thread-local RNG.
    pub fn generate(&self) -> Candidate {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a candidate using the supplied RNG (deterministic in tests).
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate {
        let base = FRAGMENTS[rng.gen_range(0..FRAGMENTS.len())];

        let (smiles, source) = if rng.gen::<f64>() < self.mutation_probability {
            let modifier = MODIFIERS[rng.gen_range(0..MODIFIERS.len())];
            (format!("{}{}", base, modifier), "fragment+modifier".to_string())
        } else {
            (base.to_string(), "fragment".to_string())
        };

        info!("Generated candidate molecule: {}", smiles);
        Candidate { id: Uuid::new_v4(), smiles, source }
    }
}
