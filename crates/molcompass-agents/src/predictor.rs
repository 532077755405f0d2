//! Mock property predictor agent.
//!
//! Stands in for a QSAR/QSPR model: scores come from random draws plus one
//! hard-coded rule (a carboxyl substructure is treated as a known liability
//! and raises toxicity before clamping). Parsing the SMILES is the real,
//! non-mocked part; an unparseable string fails here and never reaches the
//! depicter.

use molcompass_common::error::Result;
use molcompass_chem::{parse_smiles, Molecule};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Substructure treated as a known-bad fragment by the toxicity rule.
pub const BAD_FRAGMENT: &str = "C(=O)O";

/// Toxicity penalty applied when the bad fragment is present.
const BAD_FRAGMENT_PENALTY: f64 = 0.5;

/// Predicted drug properties for a candidate molecule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictedProperties {
    /// Higher is better; clamped to [0, 1].
    pub binding_affinity: f64,
    /// Lower is better; clamped to [0, 1].
    pub toxicity_score: f64,
    /// Fixed categorical label in this mock.
    pub bioavailability: String,
}

/// Predictor for key drug properties.
pub struct PropertyPredictor {}

impl PropertyPredictor {
    pub fn new() -> Self {
        Self {}
    }

    /// Predict properties for a SMILES string using the thread-local RNG.
    /// Returns the parsed molecule alongside the scores so callers can
    /// depict it without re-parsing.
    pub fn predict(&self, smiles: &str) -> Result<(Molecule, PredictedProperties)> {
        self.predict_with(smiles, &mut rand::thread_rng())
    }

    /// Predict properties using the supplied RNG (deterministic in tests).
    pub fn predict_with<R: Rng + ?Sized>(
        &self,
        smiles: &str,
        rng: &mut R,
    ) -> Result<(Molecule, PredictedProperties)> {
        let molecule = parse_smiles(smiles)?;

        let binding_affinity = 0.85 - rng.gen::<f64>() * 0.2;
        let mut toxicity_score = 0.1 + rng.gen::<f64>() * 0.3;

        if smiles.contains(BAD_FRAGMENT) {
            debug!("Known bad fragment {} present, raising toxicity", BAD_FRAGMENT);
            toxicity_score += BAD_FRAGMENT_PENALTY;
        }

        let properties = PredictedProperties {
            binding_affinity: round2(binding_affinity.clamp(0.0, 1.0)),
            toxicity_score: round2(toxicity_score.clamp(0.0, 1.0)),
            bioavailability: "Oral".to_string(),
        };

        info!(
            "Predicted properties for {}: binding {:.2}, toxicity {:.2}",
            smiles, properties.binding_affinity, properties.toxicity_score
        );
        Ok((molecule, properties))
    }
}

impl Default for PropertyPredictor {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use molcompass_common::error::CompassError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scores_stay_in_unit_interval() {
        let predictor = PropertyPredictor::new();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            for smiles in ["C1CC1", "C1CC1-C(=O)O", "c1ccccc1-c1ccccc1-N(=O)O"] {
                let (_, props) = predictor.predict_with(smiles, &mut rng).unwrap();
                assert!((0.0..=1.0).contains(&props.binding_affinity), "{}", smiles);
                assert!((0.0..=1.0).contains(&props.toxicity_score), "{}", smiles);
            }
        }
    }

    #[test]
    fn bad_fragment_raises_toxicity() {
        let predictor = PropertyPredictor::new();
        // Base toxicity is in [0.1, 0.4]; the carboxyl penalty pushes it to
        // at least 0.6 before the clamp.
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let (_, clean) = predictor.predict_with("C1CC1", &mut rng).unwrap();
            assert!(clean.toxicity_score <= 0.4 + f64::EPSILON);

            let (_, flagged) = predictor.predict_with("C1CC1-C(=O)O", &mut rng).unwrap();
            assert!(flagged.toxicity_score >= 0.6 - f64::EPSILON);
            assert!(flagged.toxicity_score <= 1.0);
        }
    }

    #[test]
    fn scores_are_rounded_to_two_decimals() {
        let predictor = PropertyPredictor::new();
        let mut rng = StdRng::seed_from_u64(3);
        let (_, props) = predictor.predict_with("CC(C)CC(C)N", &mut rng).unwrap();
        for v in [props.binding_affinity, props.toxicity_score] {
            assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn bioavailability_is_fixed_label() {
        let predictor = PropertyPredictor::new();
        let (_, props) = predictor.predict("C1CC1").unwrap();
        assert_eq!(props.bioavailability, "Oral");
    }

    #[test]
    fn invalid_smiles_is_a_typed_error() {
        let predictor = PropertyPredictor::new();
        let err = predictor.predict("not_a_molecule!").unwrap_err();
        assert!(matches!(err, CompassError::InvalidSmiles(_)));
    }
}
