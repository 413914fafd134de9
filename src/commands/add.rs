use anyhow::Result;
use owo_colors::OwoColorize;

use super::Session;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(session: &Session, name: &str) -> Result<()> {
    let spinner = tui::create_spinner(format!("🔎 Searching the web for {}", name.bold()));
    let result = session.controller.add_fair(name).await;
    spinner.finish_and_clear();

    let fair = result?;

    println!("{}", fair.render());
    if fair.grounding_sources.is_none() {
        println!();
        println!(
            "{}",
            "   Could not look up details; the fair was added without them.".yellow()
        );
        session.print_api_key_hint();
    }

    Ok(())
}
