//! Candidate console — the single page of the demo: target input,
//! generate-and-evaluate trigger, and the three outputs (depiction, SMILES,
//! property table).

use axum::{extract::State, response::Html, Form, Json};
use molcompass_agents::CandidateReport;
use serde::Deserialize;
use tracing::warn;

use crate::state::{AppEvent, SharedState};

const DEFAULT_TARGET: &str = "SARS-CoV-2 Main Protease (M-pro)";

/// Navigation HTML shared across pages.
pub const NAV_HTML: &str = r#"<nav class="navbar">
    <div class="brand">Molecular Compass</div>
    <div class="brand-sub">The AI-Native Drug Discovery Engine</div>
</nav>"#;

/// Inline script wiring the activity feed to the SSE stream. Kept out of the
/// page `format!` so the JavaScript braces need no escaping.
const FEED_SCRIPT: &str = r#"<script>
    const feed = document.getElementById('activity-feed');
    const status = document.getElementById('sse-status');

    function addEntry(text) {
        const li = document.createElement('li');
        li.textContent = new Date().toLocaleTimeString() + '  ' + text;
        feed.prepend(li);
        while (feed.children.length > 8) feed.removeChild(feed.lastChild);
    }

    const source = new EventSource('/api/events');
    source.addEventListener('connected', () => {
        status.textContent = 'live';
        status.className = 'badge badge-live';
    });
    source.addEventListener('candidate_evaluated', (e) => {
        const ev = JSON.parse(e.data);
        addEntry('Evaluated ' + ev.smiles
            + ' (binding ' + ev.binding_affinity.toFixed(2)
            + ', toxicity ' + ev.toxicity_score.toFixed(2) + ')');
    });
    source.addEventListener('notification', (e) => {
        const ev = JSON.parse(e.data);
        addEntry(ev.level + ': ' + ev.message);
    });
    source.onerror = () => {
        status.textContent = 'disconnected';
        status.className = 'badge badge-down';
    };
</script>"#;

#[derive(Deserialize)]
pub struct CompassForm {
    pub target: String,
}

#[derive(Deserialize)]
pub struct CandidateRunParams {
    pub target: Option<String>,
}

pub async fn compass_page(State(_state): State<SharedState>) -> Html<String> {
    Html(render_page(DEFAULT_TARGET, None))
}

pub async fn compass_submit(
    State(state): State<SharedState>,
    Form(form): Form<CompassForm>,
) -> Html<String> {
    let target = if form.target.trim().is_empty() {
        DEFAULT_TARGET.to_string()
    } else {
        form.target.trim().to_string()
    };

    match state.pipeline.run(&target) {
        Ok(report) => {
            let _ = state.event_tx.send(AppEvent::CandidateEvaluated {
                smiles: report.smiles.clone(),
                binding_affinity: report.properties.binding_affinity,
                toxicity_score: report.properties.toxicity_score,
            });
            Html(render_page(&target, Some(Ok(&report))))
        }
        Err(e) => {
            warn!("Candidate run failed: {}", e);
            let _ = state.event_tx.send(AppEvent::Notification {
                level: "error".to_string(),
                message: e.to_string(),
            });
            Html(render_page(&target, Some(Err(e.to_string()))))
        }
    }
}

/// JSON API variant of the same operation.
pub async fn api_candidate_run(
    State(state): State<SharedState>,
    Json(payload): Json<CandidateRunParams>,
) -> Json<serde_json::Value> {
    let target = payload.target.unwrap_or_else(|| DEFAULT_TARGET.to_string());
    match state.pipeline.run(&target) {
        Ok(report) => {
            let _ = state.event_tx.send(AppEvent::CandidateEvaluated {
                smiles: report.smiles.clone(),
                binding_affinity: report.properties.binding_affinity,
                toxicity_score: report.properties.toxicity_score,
            });
            Json(serde_json::json!({ "status": "success", "report": report }))
        }
        Err(e) => Json(serde_json::json!({ "status": "error", "error": e.to_string() })),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_page(target: &str, outcome: Option<Result<&CandidateReport, String>>) -> String {
    let results_html = match outcome {
        None => r#"<div class="card text-muted">
            Press <strong>Generate &amp; Evaluate Candidate</strong> to run the pipeline.
        </div>"#
            .to_string(),
        Some(Err(message)) => format!(
            r#"<div class="alert alert-danger">Candidate run failed: {}</div>"#,
            escape_html(&message)
        ),
        Some(Ok(report)) => {
            let props = &report.properties;
            format!(
                r#"<div class="grid-2">
        <div class="card">
            <div class="card-header">Generated Molecule (SMILES)</div>
            <code class="smiles">{smiles}</code>
            <div class="card-header mt-4">2D Visualization</div>
            <div class="depiction">{svg}</div>
        </div>
        <div class="card">
            <div class="card-header">Predicted Properties</div>
            <table class="table">
                <thead><tr><th>Property</th><th>Value</th></tr></thead>
                <tbody>
                    <tr><td>Binding Affinity</td><td>{binding:.2} (High is better)</td></tr>
                    <tr><td>Toxicity Score</td><td>{toxicity:.2} (Low is better)</td></tr>
                    <tr><td>Bioavailability</td><td>{bio}</td></tr>
                </tbody>
            </table>
            <p class="text-muted small">Candidate {id} · source: {source} · generated {ts}</p>
        </div>
    </div>"#,
                smiles = escape_html(&report.smiles),
                svg = report.svg,
                binding = props.binding_affinity,
                toxicity = props.toxicity_score,
                bio = escape_html(&props.bioavailability),
                id = report.id,
                source = escape_html(&report.source),
                ts = report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            )
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Molecular Compass</title>
    <link rel="stylesheet" href="/static/css/main.css?v=1.0.0">
</head>
<body>
<div class="app-container">
{nav}
<main class="main-content">
    <div class="page-header">
        <div>
            <h1 class="page-title">Candidate Console</h1>
            <p class="text-muted">Generate a molecular candidate and review its mock-predicted properties</p>
        </div>
    </div>

    <div class="grid-2 mb-4">
        <div class="card">
            <form method="POST" action="/compass">
                <label class="form-label" for="target">Target Protein</label>
                <input type="text" id="target" name="target" class="form-control"
                       placeholder="e.g., SARS-CoV-2 Main Protease (M-pro)" value="{target}">
                <button type="submit" class="btn btn-primary mt-3">Generate &amp; Evaluate Candidate</button>
            </form>
        </div>
        <div class="card">
            <div class="card-header">How It Works</div>
            <ol class="text-muted">
                <li><strong>Generative Chemist:</strong> creates a novel molecular structure.</li>
                <li><strong>Predictor Agent:</strong> simulates properties like toxicity and binding.</li>
                <li><strong>Depicter:</strong> renders the 2D structure of the candidate.</li>
            </ol>
        </div>
    </div>

    {results}

    <div class="card mt-4">
        <div class="card-header">Activity Feed <span id="sse-status" class="badge">connecting</span></div>
        <ul id="activity-feed" class="feed-list text-muted small"></ul>
    </div>
</main>
</div>
{script}
</body>
</html>"#,
        nav = NAV_HTML,
        target = escape_html(target),
        results = results_html,
        script = FEED_SCRIPT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use molcompass_agents::CompassPipeline;
    use molcompass_common::Config;

    #[test]
    fn initial_page_has_form_and_default_target() {
        let page = render_page(DEFAULT_TARGET, None);
        assert!(page.contains(r#"action="/compass""#));
        assert!(page.contains("SARS-CoV-2 Main Protease (M-pro)"));
        assert!(page.contains("Generate &amp; Evaluate Candidate"));
    }

    #[test]
    fn result_page_shows_all_three_outputs() {
        let report = CompassPipeline::new(&Config::default()).run("M-pro").unwrap();
        let page = render_page("M-pro", Some(Ok(&report)));
        assert!(page.contains("<svg"));
        assert!(page.contains("Binding Affinity"));
        assert!(page.contains("(Low is better)"));
        assert!(page.contains(&escape_html(&report.smiles)));
    }

    #[test]
    fn error_page_shows_banner_and_no_depiction() {
        let page = render_page("M-pro", Some(Err("Invalid SMILES string: x".to_string())));
        assert!(page.contains("alert-danger"));
        assert!(!page.contains("<svg"));
    }

    #[test]
    fn page_subscribes_to_the_event_stream() {
        let page = render_page(DEFAULT_TARGET, None);
        assert!(page.contains(r#"new EventSource('/api/events')"#));
        assert!(page.contains(r#"id="activity-feed""#));
        assert!(page.contains("candidate_evaluated"));
    }

    #[test]
    fn target_input_is_escaped() {
        let page = render_page(r#""><script>alert(1)</script>"#, None);
        assert!(!page.contains("<script>alert(1)"));
        assert!(page.contains("&lt;script&gt;alert(1)"));
    }
}
