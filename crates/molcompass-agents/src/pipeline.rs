//! Orchestrator for one candidate run: generate → predict → depict.

use chrono::{DateTime, Utc};
use molcompass_common::config::Config;
use molcompass_common::error::Result;
use molcompass_chem::{DepictionConfig, Depictor};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::generator::{Candidate, GenerativeChemist};
use crate::predictor::{PredictedProperties, PropertyPredictor};

/// Everything one run produces for the UI: the molecule, its mock scores,
/// and its 2D depiction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateReport {
    pub id: Uuid,
    pub target: String,
    pub smiles: String,
    pub source: String,
    pub properties: PredictedProperties,
    /// Standalone SVG document with the 2D depiction.
    pub svg: String,
    pub generated_at: DateTime<Utc>,
}

/// The full candidate pipeline. Each run is independent and stateless.
pub struct CompassPipeline {
    chemist: GenerativeChemist,
    predictor: PropertyPredictor,
    depictor: Depictor,
}

impl CompassPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            chemist: GenerativeChemist::new(config.generator.mutation_probability),
            predictor: PropertyPredictor::new(),
            depictor: Depictor::new(DepictionConfig {
                width: config.depiction.width,
                height: config.depiction.height,
                ..DepictionConfig::default()
            }),
        }
    }

    /// Run one generate-and-evaluate cycle for the given target.
    pub fn run(&self, target: &str) -> Result<CandidateReport> {
        info!("Generating and evaluating a candidate for target: {}", target);
        let candidate = self.chemist.generate();
        self.evaluate(target, candidate)
    }

    /// Evaluate an already-generated candidate. Prediction parses the SMILES
    /// first, so an unparseable string errors out before any depiction work.
    pub fn evaluate(&self, target: &str, candidate: Candidate) -> Result<CandidateReport> {
        let (molecule, properties) = self.predictor.predict(&candidate.smiles)?;
        let svg = self.depictor.depict(&molecule)?;

        Ok(CandidateReport {
            id: candidate.id,
            target: target.to_string(),
            smiles: candidate.smiles,
            source: candidate.source,
            properties,
            svg,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molcompass_common::error::CompassError;

    fn pipeline() -> CompassPipeline {
        CompassPipeline::new(&Config::default())
    }

    #[test]
    fn run_produces_a_complete_report() {
        let report = pipeline().run("SARS-CoV-2 Main Protease (M-pro)").unwrap();
        assert!(!report.smiles.is_empty());
        assert!(report.svg.starts_with("<svg"));
        assert!(report.svg.ends_with("</svg>"));
        assert!((0.0..=1.0).contains(&report.properties.binding_affinity));
        assert!((0.0..=1.0).contains(&report.properties.toxicity_score));
        assert_eq!(report.target, "SARS-CoV-2 Main Protease (M-pro)");
    }

    #[test]
    fn repeated_runs_are_independent() {
        let pipeline = pipeline();
        for _ in 0..20 {
            assert!(pipeline.run("M-pro").is_ok());
        }
    }

    #[test]
    fn unparseable_candidate_short_circuits() {
        let candidate = Candidate {
            id: Uuid::new_v4(),
            smiles: "this is not SMILES".to_string(),
            source: "test".to_string(),
        };
        let err = pipeline().evaluate("M-pro", candidate).unwrap_err();
        assert!(matches!(err, CompassError::InvalidSmiles(_)));
    }

    #[test]
    fn report_serializes_for_the_api() {
        let report = pipeline().run("M-pro").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["svg"].as_str().unwrap().starts_with("<svg"));
        assert_eq!(json["properties"]["bioavailability"], "Oral");
    }
}
