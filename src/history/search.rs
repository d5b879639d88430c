//! Client-side search over fetched entries

use crate::entries::MoodEntry;

/// Keep entries whose emotion, triggers, tags or description contain `term`
/// (case-insensitive). Only an empty term keeps everything; whitespace is
/// matched literally.
pub fn search<'a>(entries: &'a [MoodEntry], term: &str) -> Vec<&'a MoodEntry> {
    if term.is_empty() {
        return entries.iter().collect();
    }
    let needle = term.to_lowercase();

    entries
        .iter()
        .filter(|entry| matches_term(entry, &needle))
        .collect()
}

/// `needle` must already be lowercased
fn matches_term(entry: &MoodEntry, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    entry.emotion.as_deref().is_some_and(contains)
        || entry.triggers.iter().any(|t| contains(t.as_str()))
        || entry.tags.iter().any(|t| contains(t.as_str()))
        || entry.description.as_deref().is_some_and(contains)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<MoodEntry> {
        vec![
            MoodEntry::new("u1", "Happy").intensity(8).trigger("Work"),
            MoodEntry::new("u1", "Sad")
                .intensity(4)
                .trigger("Work")
                .trigger("Sleep"),
            MoodEntry::new("u1", "Calm")
                .tag("Meditation")
                .description("Evening walk by the river"),
        ]
    }

    #[test]
    fn test_empty_term_keeps_all() {
        let entries = entries();
        assert_eq!(search(&entries, "").len(), 3);
    }

    #[test]
    fn test_whitespace_term_is_matched_literally() {
        let entries = entries();

        // Only the description contains a space
        let hits = search(&entries, " ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].emotion.as_deref(), Some("Calm"));

        assert_eq!(search(&entries, " walk ").len(), 1);
        assert!(search(&entries, "   ").is_empty());
    }

    #[test]
    fn test_matches_each_axis() {
        let entries = entries();

        let hits = search(&entries, "sleep");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].emotion.as_deref(), Some("Sad"));

        assert_eq!(search(&entries, "HAPP").len(), 1);
        assert_eq!(search(&entries, "work").len(), 2);
        assert_eq!(search(&entries, "meditation").len(), 1);
        assert_eq!(search(&entries, "River").len(), 1);
    }

    #[test]
    fn test_missing_fields_only_fail_their_axis() {
        let mut unlabeled = MoodEntry::new("u1", "x").trigger("Family");
        unlabeled.emotion = None;
        let entries = vec![unlabeled];

        assert_eq!(search(&entries, "family").len(), 1);
        assert!(search(&entries, "x").is_empty());
    }

    #[test]
    fn test_no_match() {
        let entries = entries();
        assert!(search(&entries, "zzz").is_empty());
    }
}
