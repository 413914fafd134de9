//! Prompt text sent to the enrichment backend.

pub fn fair_lookup(name: &str) -> String {
    format!(
        "Find the official dates, location, and a brief description for the trade fair: {}. \
         Please provide the response in a structured way.",
        name
    )
}

pub fn meeting_prep(details: &str) -> String {
    format!(
        "Based on the following meeting history and goals, prepare a concise summary and 3 key questions to ask.\n\n\
         Details: {}",
        details
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fair_lookup_names_the_fair() {
        let prompt = fair_lookup("MWC Barcelona 2025");
        assert!(prompt.contains("trade fair: MWC Barcelona 2025."));
        assert!(prompt.starts_with("Find the official dates, location"));
    }

    #[test]
    fn test_meeting_prep_appends_details() {
        let prompt = meeting_prep("Contact: Jane Doe, Company: Acme Corp.");
        assert!(prompt.ends_with("\n\nDetails: Contact: Jane Doe, Company: Acme Corp."));
        assert!(prompt.contains("3 key questions"));
    }
}
