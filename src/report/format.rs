//! Plain-text rendering of a `Summary` for terminal output.

use crate::domain::LiveReading;
use crate::report::Summary;

/// Width of the share bar in `format_summary`.
const SHARE_BAR_WIDTH: usize = 30;

pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str("=== La Défense : Supervision ===\n");
    match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => {
            out.push_str(&format!("Series: {first} → {last} ({} days)\n", summary.rows));
        }
        _ => out.push_str("Series: empty\n"),
    }
    out.push_str(&format!(
        "Rows: {} historical + {} projected\n",
        summary.history_rows, summary.generated_rows
    ));
    out.push_str(&format!(
        "Seed: {}\n",
        summary
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string())
    ));
    out.push_str(&format!("Years: {}\n", join_years(&summary.years_available)));
    if summary.years_selected.is_empty() {
        out.push_str(&format!("Filter: all years ({} days)\n", summary.filtered_rows));
    } else {
        out.push_str(&format!(
            "Filter: {} ({} days)\n",
            join_years(&summary.years_selected),
            summary.filtered_rows
        ));
    }

    out.push_str("\n--- Répartition par typologie ---\n");
    out.push_str(&format!(
        "{:<16} {:>6} {:>14} {:>16} {:>7}\n",
        "Typologie", "Jours", "Moyenne/jour", "Total", "Part"
    ));
    for s in &summary.labels {
        out.push_str(&format!(
            "{:<16} {:>6} {:>14.0} {:>16} {:>6.1}% {}\n",
            s.label.as_str(),
            s.days,
            s.mean,
            s.sum,
            s.share * 100.0,
            share_bar(s.share, SHARE_BAR_WIDTH)
        ));
    }

    out
}

pub fn format_live(reading: &LiveReading) -> String {
    format!(
        "Heure: {:02}h | Taux d'occupation: {}% ({}) | Débit: {} pax/min",
        reading.hour,
        reading.load_pct,
        reading.level.display_name(),
        reading.pax_per_minute
    )
}

fn join_years(years: &[i32]) -> String {
    if years.is_empty() {
        return "-".to_string();
    }
    years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn share_bar(share: f64, width: usize) -> String {
    let filled = ((share.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    "█".repeat(filled)
}
