use anyhow::Result;

use super::Session;
use crate::render::render_fair_detail;

pub fn run(session: &Session, query: &str) -> Result<()> {
    let fair = session.resolve_fair(query)?;
    session.controller.select_fair(Some(&fair.id))?;

    if let Some(selected) = session.controller.selected_fair() {
        println!("{}", render_fair_detail(&selected));
    }

    Ok(())
}
