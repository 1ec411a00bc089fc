use anyhow::Result;
use chrono::Utc;
use daygrid_core::bucket_by_day;
use owo_colors::OwoColorize;

use super::Query;
use crate::render::{day_label, time_label};

pub fn run(query: Query) -> Result<()> {
    let resolved = query.resolve()?;
    let events = query.load_events(&resolved)?;
    let window = &resolved.window;
    let tz = resolved.tz;

    println!("{}", window.title().bold());

    let buckets = bucket_by_day(window, &events)?;
    if buckets.values().all(|day| day.is_empty()) {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let today = Utc::now().with_timezone(&tz).date_naive();

    for (day, on_day) in &buckets {
        if on_day.is_empty() {
            continue;
        }

        println!();
        println!("{}", day_label(*day, today).bold());
        for event in on_day {
            let id = format!("[{}]", event.id);
            println!("  {} {} {}", time_label(event, *day, tz), event, id.dimmed());
        }
    }

    Ok(())
}
