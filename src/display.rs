use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::cards::{Card, Suit};
use crate::engine::RunOutcome;
use crate::hand_evaluator::ALL_CATEGORIES;
use crate::tally::Tally;

/// Horizontal bar for a fraction in `[0, 1]`.
pub fn fraction_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * width as f64) as usize;
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let pct = format!("{:.2}%", fraction * 100.0);

    if fraction >= 0.5 {
        format!("{} {}", bar.green(), pct)
    } else if fraction >= 0.1 {
        format!("{} {}", bar.yellow(), pct)
    } else {
        format!("{} {}", bar.red(), pct)
    }
}

pub fn hand_display(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| {
            let text = card.pretty();
            match card.suit {
                Suit::Spades => text.white().to_string(),
                Suit::Hearts => text.red().to_string(),
                Suit::Diamonds => text.blue().to_string(),
                Suit::Clubs => text.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One row per category: count and share of trials.
pub fn tally_table(tally: &Tally) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Category").set_alignment(CellAlignment::Left),
        Cell::new("Count").set_alignment(CellAlignment::Right),
        Cell::new("Odds").set_alignment(CellAlignment::Right),
    ]);

    for &category in ALL_CATEGORIES.iter().rev() {
        table.add_row(vec![
            Cell::new(category.to_string().bold().to_string()),
            Cell::new(tally.count(category)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}%", tally.percentage(category)))
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

pub fn outcome_summary(outcome: &RunOutcome<Tally>) -> String {
    let tally = outcome.output();
    let status = if outcome.is_cancelled() {
        "Cancelled".yellow().bold().to_string()
    } else {
        "Completed".green().bold().to_string()
    };
    format!(
        "{} after {} iterations\n{}",
        status,
        tally.iterations(),
        tally_table(tally)
    )
}
