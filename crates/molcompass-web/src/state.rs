//! Shared application state for the web server.

use std::sync::Arc;

use molcompass_agents::CompassPipeline;
use molcompass_common::Config;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A candidate was generated and scored
    CandidateEvaluated {
        smiles: String,
        binding_affinity: f64,
        toxicity_score: f64,
    },
    /// General system notification
    Notification { level: String, message: String },
}

impl AppEvent {
    /// SSE event name for this variant. Kept equal to the serde `type` tag
    /// so page-side listeners and the JSON payload agree.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::CandidateEvaluated { .. } => "candidate_evaluated",
            AppEvent::Notification { .. } => "notification",
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: Config,
    pub pipeline: CompassPipeline,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        let pipeline = CompassPipeline::new(&config);
        Self { config, pipeline, event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_name_matches_the_json_tag() {
        let event = AppEvent::CandidateEvaluated {
            smiles: "C1CC1".to_string(),
            binding_affinity: 0.8,
            toxicity_score: 0.2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.name());
    }

    #[tokio::test]
    async fn broadcast_events_reach_subscribers() {
        let state = AppState::new(Config::default());
        let mut rx = state.subscribe();
        state
            .event_tx
            .send(AppEvent::Notification {
                level: "info".to_string(),
                message: "candidate run complete".to_string(),
            })
            .unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.name(), "notification");
    }
}
