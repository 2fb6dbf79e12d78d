//! Per-call index of subject memberships on one dimension
//!
//! Normalizes each subject's reference field once, reports malformed fields
//! and dangling ids, and drops repeated subject ids so every consumer
//! de-duplicates on the same key.

use crate::catalog::{Dimension, Subject};
use crate::diagnostics::Diagnostics;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone)]
pub(crate) struct Membership<'a> {
    pub subject: &'a Subject,
    pub ids: Vec<String>,
}

impl<'a> Membership<'a> {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|candidate| candidate == id)
    }

    pub fn intersects(&self, ids: &FxHashSet<String>) -> bool {
        self.ids.iter().any(|candidate| ids.contains(candidate))
    }
}

/// Normalize `dimension` on every subject, first occurrence of an id wins
pub(crate) fn index_memberships<'a, I, F>(
    subjects: I,
    dimension: Dimension,
    is_known: F,
    diagnostics: &mut Diagnostics,
) -> Vec<Membership<'a>>
where
    I: IntoIterator<Item = &'a Subject>,
    F: Fn(&str) -> bool,
{
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut out = Vec::new();

    for subject in subjects {
        if !seen.insert(subject.id.as_str()) {
            continue;
        }
        if let Err(err) = dimension.try_subject_values(subject) {
            diagnostics.malformed_field(&subject.id, dimension.field_name(), err);
        }
        let ids = dimension.subject_values(subject);
        for id in &ids {
            if !is_known(id) {
                diagnostics.broken_reference(&subject.id, dimension.field_name(), id);
            }
        }
        out.push(Membership { subject, ids });
    }
    out
}
