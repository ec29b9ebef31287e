use crate::models::{Participant, SUBJECT_MATEMATIKA, SUBJECT_SAINS};

/// Active filter criteria. An empty string always means "no constraint".
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Exact match on the record's trimmed level.
    pub level: String,
    /// "Matematika", "Sains", or empty for both.
    pub subject: String,
    /// Case-insensitive substring over name + school + level + subject.
    pub search: String,
}

/// Apply the level/search/subject predicates in source order. Records that
/// fail level or search are dropped before any expansion. A dual-subject
/// record either collapses onto the selected subject or, with no subject
/// filter, expands into two consecutive rows (Matematika first).
pub fn filter_participants(
    participants: &[Participant],
    criteria: &FilterCriteria,
) -> Vec<Participant> {
    let query = criteria.search.trim().to_lowercase();
    let mut results = Vec::new();

    for p in participants {
        let level_ok = criteria.level.is_empty() || p.level.trim() == criteria.level;
        if !level_ok {
            continue;
        }
        let search_ok = query.is_empty() || p.search_text().contains(&query);
        if !search_ok {
            continue;
        }

        if p.is_both_subjects() {
            match criteria.subject.as_str() {
                SUBJECT_MATEMATIKA => results.push(with_subject(p, SUBJECT_MATEMATIKA)),
                SUBJECT_SAINS => results.push(with_subject(p, SUBJECT_SAINS)),
                _ => {
                    results.push(with_subject(p, SUBJECT_MATEMATIKA));
                    results.push(with_subject(p, SUBJECT_SAINS));
                }
            }
        } else if criteria.subject.is_empty() || criteria.subject == p.bidang.trim() {
            results.push(p.clone());
        }
    }

    results
}

fn with_subject(p: &Participant, subject: &str) -> Participant {
    let mut row = p.clone();
    row.bidang = subject.to_string();
    row
}
