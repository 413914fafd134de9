use anyhow::Result;
use owo_colors::OwoColorize;

use super::Session;
use crate::render::Render;

pub fn run(session: &Session) -> Result<()> {
    let fairs = session.controller.fairs();

    if fairs.is_empty() {
        println!("{}", "Which fair are you going to?".bold());
        println!(
            "{}",
            "Add one and fairdesk will find its details with Gemini and Google Search:".dimmed()
        );
        println!("  fairdesk add \"MWC Barcelona 2025\"");
        return Ok(());
    }

    for (i, fair) in fairs.iter().enumerate() {
        println!("{}", fair.render());

        if i < fairs.len() - 1 {
            println!();
        }
    }

    Ok(())
}
