use anyhow::Result;
use chrono::Utc;
use daygrid_core::{WindowKind, layout_day};
use owo_colors::OwoColorize;

use super::Query;
use crate::render::{day_label, geometry, time_range};

pub fn run(query: Query) -> Result<()> {
    if query.view == WindowKind::Month {
        anyhow::bail!(
            "The hourly grid is only drawn for day and week views. Use --view day or --view week"
        );
    }

    let resolved = query.resolve()?;
    let events = query.load_events(&resolved)?;
    let window = &resolved.window;
    let tz = resolved.tz;
    let grid = resolved.settings.grid_for(window.kind())?;

    println!(
        "{} {}",
        window.title().bold(),
        format!(
            "({:02}:00-{:02}:00, {}px/h, {}px tall)",
            grid.first_hour(),
            grid.last_hour(),
            grid.pixels_per_hour(),
            grid.total_height()
        )
        .dimmed()
    );

    let today = Utc::now().with_timezone(&tz).date_naive();

    for day in window.days() {
        let placed = layout_day(day, &events, &grid, tz)?;

        println!();
        println!("{}", day_label(day, today).bold());

        if placed.is_empty() {
            println!("  {}", "nothing in view".dimmed());
            continue;
        }

        for p in &placed {
            println!(
                "  {}  {} {}",
                geometry(&p.position),
                time_range(p.event, tz).dimmed(),
                p.event
            );
        }
    }

    Ok(())
}
