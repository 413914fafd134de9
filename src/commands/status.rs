use anyhow::Result;
use fairdesk_core::MeetingStatus;

use super::Session;
use crate::render::Render;

pub fn run(session: &Session, query: &str, status: MeetingStatus) -> Result<()> {
    let meeting = session.resolve_meeting(query)?;
    let updated = session.controller.set_meeting_status(&meeting.id, status)?;

    println!("{}", updated.render());

    Ok(())
}
