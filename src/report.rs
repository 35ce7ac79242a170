use crate::core::types::{ActionKind, ReconcileSummary};
use crate::matcher::rank::MatchResult;

/// Ranked match list with a bar proportional to the similarity score, one
/// `█` per 5%.
pub fn render_matches(matches: &[MatchResult]) -> String {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let bar = "█".repeat((m.score / 5.0).round().max(0.0) as usize);
            format!(
                "{}. {:<30} | {:.2}% (distance {}) {}",
                i + 1,
                m.candidate,
                m.score,
                m.distance,
                bar
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_summary(summary: &ReconcileSummary) -> String {
    let mut lines: Vec<String> = summary
        .outcomes
        .iter()
        .map(|o| {
            let verb = match o.kind {
                ActionKind::Create => "CREATED",
                ActionKind::Update => "UPDATED",
            };
            format!("{verb} {} x{} -> {}p", o.name, o.quantity, o.platinum)
        })
        .collect();
    lines.push(format!(
        "{} succeeded (created: {} / updated: {}) / failed: {}",
        summary.success_count(),
        summary.created,
        summary.updated,
        summary.failed
    ));
    lines.join("\n")
}
