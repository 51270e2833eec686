use crate::domain::model::{AnalysisOutcome, LocationGuess};
use std::fmt::Write;

/// Plain-text report: best guess first, then alternatives, clues, summary and
/// sources.
pub fn render_report(outcome: &AnalysisOutcome) -> String {
    let result = &outcome.result;
    let mut out = String::new();

    let _ = writeln!(out, "LocaLens analysis ({})", outcome.label);
    let _ = writeln!(out);

    for (rank, guess) in result.guesses.iter().enumerate() {
        let heading = if rank == 0 {
            "Best guess".to_string()
        } else {
            format!("Alternative #{}", rank)
        };
        render_guess(&mut out, &heading, guess);
    }

    if !result.artifacts.is_empty() {
        let _ = writeln!(out, "Clues");
        for artifact in &result.artifacts {
            let _ = writeln!(out, "  - {}: {}", artifact.clue, artifact.description);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "  {}", result.summary);

    if !result.sources.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Sources");
        for source in &result.sources {
            let _ = writeln!(out, "  - {} <{}>", source.title, source.uri);
        }
    }

    out
}

fn render_guess(out: &mut String, heading: &str, guess: &LocationGuess) {
    let _ = writeln!(
        out,
        "{}: {}, {}, {}",
        heading, guess.place, guess.city, guess.country
    );
    let _ = writeln!(
        out,
        "  Confidence: {}% ({})",
        guess.confidence,
        guess.confidence_tier().as_str()
    );
    let _ = writeln!(
        out,
        "  Coordinates: {:.6}, {:.6}",
        guess.latitude, guess.longitude
    );
    if guess.has_valid_coordinates() {
        let _ = writeln!(out, "  Google Maps: {}", guess.google_maps_url());
        let _ = writeln!(out, "  OpenStreetMap: {}", guess.osm_embed_url());
    } else {
        let _ = writeln!(out, "  (coordinates out of range; no map links)");
    }
    let _ = writeln!(out, "  Reasoning: {}", guess.reasoning);
    let _ = writeln!(out);
}
