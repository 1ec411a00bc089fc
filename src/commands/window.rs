use anyhow::Result;
use owo_colors::OwoColorize;

use super::Query;

const BOUNDARY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %Z";

pub fn run(query: Query) -> Result<()> {
    let resolved = query.resolve()?;
    let window = &resolved.window;

    println!("{}", window.title().bold());
    println!("  {}  {}", "kind ".dimmed(), window.kind());
    println!("  {}  {}", "start".dimmed(), window.start().format(BOUNDARY_FORMAT));
    println!("  {}  {}", "end  ".dimmed(), window.end().format(BOUNDARY_FORMAT));
    println!("  {}  {}", "days ".dimmed(), window.days().len());

    Ok(())
}
