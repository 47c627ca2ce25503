use std::collections::BTreeSet;

/// The fixed injury checklist offered by the UI.
pub const ALL_INJURIES: [&str; 8] = [
    "ACL reconstruction",
    "Meniscus tear",
    "Shoulder instability",
    "Labrum tear",
    "Wrist ligament injury",
    "Neck injury",
    "Lower back pain",
    "I'm feeling sluggish or tired",
];

/// Normalized recommendation payload. Wire-level optional fields are already
/// defaulted by the time a value of this type exists, so the results card
/// never deals with absent data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationResult {
    pub injuries: Vec<String>,
    pub safe_moves: Vec<String>,
    pub unsafe_moves: Vec<String>,
    pub ai_recommendations: String,
    pub recovery_advice: String,
}

impl RecommendationResult {
    /// Stand-in result for a failed request: echoes the selection, keeps the
    /// move lists empty, and carries the error text as recovery advice so the
    /// results card always has a well-formed value to render.
    pub fn from_failure(injuries: Vec<String>, message: &str) -> Self {
        Self {
            injuries,
            recovery_advice: format!("Error: {message}"),
            ..Self::default()
        }
    }
}

/// Selected-injury set plus the request gate and the single latest-result
/// slot. The busy flag here is scoped to the recommendation flow and is
/// independent of the chat flow's.
pub struct InjurySelection {
    selected: BTreeSet<String>,
    busy: bool,
    latest: Option<RecommendationResult>,
}

impl InjurySelection {
    pub fn new() -> Self {
        Self {
            selected: BTreeSet::new(),
            busy: false,
            latest: None,
        }
    }

    pub fn toggle(&mut self, injury: &str) {
        if !self.selected.remove(injury) {
            self.selected.insert(injury.to_string());
        }
    }

    pub fn is_selected(&self, injury: &str) -> bool {
        self.selected.contains(injury)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn can_fetch(&self) -> bool {
        !self.busy && !self.selected.is_empty()
    }

    /// Starts a fetch and returns the labels to send, or `None` when the set
    /// is empty or a request is already outstanding.
    pub fn begin_fetch(&mut self) -> Option<Vec<String>> {
        if !self.can_fetch() {
            return None;
        }
        self.busy = true;
        Some(self.selected.iter().cloned().collect())
    }

    /// Replaces the result slot wholesale and reopens the trigger.
    pub fn complete(&mut self, result: RecommendationResult) {
        self.latest = Some(result);
        self.busy = false;
    }

    pub fn latest(&self) -> Option<&RecommendationResult> {
        self.latest.as_ref()
    }
}
