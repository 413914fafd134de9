use anyhow::Result;
use dialoguer::Input;
use owo_colors::OwoColorize;

use super::Session;
use crate::render::Render;

pub fn run(
    session: &Session,
    fair_query: &str,
    contact: Option<String>,
    company: Option<String>,
) -> Result<()> {
    let fair = session.resolve_fair(fair_query)?;
    let interactive = contact.is_none();

    let contact = match contact {
        Some(c) => c,
        None => Input::<String>::new()
            .with_prompt("  Contact name")
            .allow_empty(true)
            .interact_text()?,
    };

    if contact.trim().is_empty() {
        println!("{}", "No contact given, nothing scheduled.".dimmed());
        return Ok(());
    }

    let company = match company {
        Some(c) => Some(c),
        None if interactive => {
            let c: String = Input::new()
                .with_prompt("  Company (skip)")
                .default(String::new())
                .show_default(false)
                .interact_text()?;
            Some(c)
        }
        None => None,
    };

    let meeting = session
        .controller
        .add_meeting(&fair.id, &contact, company.as_deref())?;

    if interactive {
        println!();
    }
    println!("{}", format!("  Scheduled at {}:", fair.name).green());
    println!("{}", meeting.render());

    Ok(())
}
