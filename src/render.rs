//! Terminal rendering for fairdesk types.
//!
//! Extension traits that add colored output to fairdesk-core types using
//! owo_colors.

use fairdesk_core::{Meeting, MeetingStatus, PrepResult, TradeFair};
use owo_colors::OwoColorize;

/// Characters of an id shown in listings; enough to be a unique prefix.
const SHORT_ID_LEN: usize = 12;

/// Description preview length on fair cards.
const PREVIEW_LEN: usize = 140;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for MeetingStatus {
    fn render(&self) -> String {
        let label = self.to_string();
        match self {
            MeetingStatus::Scheduled => label.blue().to_string(),
            MeetingStatus::Completed => label.green().to_string(),
            MeetingStatus::Cancelled => label.red().to_string(),
        }
    }
}

/// Dashboard card.
impl Render for TradeFair {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("🌍 {} {}", self.name.bold(), short_id(&self.id).dimmed()),
            format!("   {} · {}", self.date, self.location).dimmed().to_string(),
            format!(
                "   {} {}",
                self.meetings.len(),
                pluralize("meeting", self.meetings.len())
            ),
        ];

        if !self.description.is_empty() {
            lines.push(format!("   {}", preview(&self.description, PREVIEW_LEN)));
        }

        lines.join("\n")
    }
}

/// One row of a fair's meeting list.
impl Render for Meeting {
    fn render(&self) -> String {
        format!(
            "   {} {} {} {} {}",
            self.time.dimmed(),
            self.contact_name.bold(),
            format!("({})", self.company).dimmed(),
            self.status.render(),
            short_id(&self.id).dimmed()
        )
    }
}

/// Fair detail view: meetings, AI-gathered description and its sources.
pub fn render_fair_detail(fair: &TradeFair) -> String {
    let mut lines = vec![
        format!("🌍 {} {}", fair.name.bold(), fair.id.dimmed()),
        format!("   {} · {}", fair.date, fair.location).dimmed().to_string(),
        String::new(),
        "🗓️  Meetings".bold().to_string(),
    ];

    if fair.meetings.is_empty() {
        lines.push(
            format!("   No meetings yet. Schedule one with `fairdesk meet {}`", short_id(&fair.id))
                .dimmed()
                .to_string(),
        );
    } else {
        lines.extend(fair.meetings.iter().map(Render::render));
    }

    if !fair.description.is_empty() {
        lines.push(String::new());
        lines.push("AI-gathered details".bold().to_string());
        lines.extend(fair.description.lines().map(|l| format!("   {}", l)));

        let sources = fair.sources();
        if !sources.is_empty() {
            lines.push(String::new());
            lines.push("   Sources:".dimmed().to_string());
            for source in sources {
                lines.push(format!("   - {} {}", source.title, source.uri.dimmed()));
            }
        }
    }

    lines.join("\n")
}

/// Meeting side panel: history, goal and the AI brief if there is one.
pub fn render_prep_panel(meeting: &Meeting, prep: Option<&PrepResult>) -> String {
    let mut lines = vec![
        format!("{} {}", meeting.contact_name.bold(), meeting.company.dimmed()),
        format!("   {} · {}", meeting.time, meeting.location).dimmed().to_string(),
        String::new(),
        "   Previous talks".dimmed().to_string(),
        format!("   {}", meeting.previous_talks),
        "   Goal".dimmed().to_string(),
        format!("   {}", meeting.goals.bold()),
        String::new(),
        "   AI PREP".cyan().bold().to_string(),
    ];

    match prep {
        Some(prep) => {
            lines.push(format!("   \"{}\"", prep.summary).italic().to_string());
            lines.push(String::new());
            lines.push("   Key questions for today:".dimmed().to_string());
            for question in &prep.suggested_questions {
                lines.push(format!("   {} {}", "•".cyan(), question));
            }
        }
        None => {
            let retry = format!(
                "   No brief available. Retry with `fairdesk prep {}`",
                short_id(&meeting.id)
            );
            lines.push(retry.dimmed().to_string());
        }
    }

    lines.join("\n")
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// First line of `text`, cut at `max` characters.
fn preview(text: &str, max: usize) -> String {
    let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if first_line.chars().count() <= max {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
