use anyhow::Result;
use owo_colors::OwoColorize;

use super::Session;
use crate::render::render_prep_panel;
use crate::utils::tui;

pub async fn run(session: &Session, query: &str) -> Result<()> {
    let meeting = session.resolve_meeting(query)?;
    let controller = &session.controller;

    controller.select_fair(Some(&meeting.fair_id))?;
    controller.select_meeting(Some(&meeting.id))?;

    let spinner = tui::create_spinner(format!(
        "✨ Preparing your meeting with {}",
        meeting.contact_name.bold()
    ));
    controller.request_meeting_prep(&meeting).await;
    spinner.finish_and_clear();

    let Some(selected) = controller.selected_meeting() else {
        return Ok(());
    };
    let prep = controller.prep_result();

    println!("{}", render_prep_panel(&selected, prep.as_ref()));
    if prep.is_none() {
        session.print_api_key_hint();
    }

    Ok(())
}
