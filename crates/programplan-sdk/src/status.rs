/// Persistence state of the open project, as shown next to the title.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing has been written since the session opened.
    #[default]
    Idle,
    Saving,
    /// Last write succeeded; `at` is the record's `updatedAt`.
    Saved { at: i64 },
    /// Last write failed. Changes are kept and the next cycle retries.
    Unsaved { error: String },
}

impl SaveStatus {
    pub fn is_unsaved(&self) -> bool {
        matches!(self, SaveStatus::Unsaved { .. })
    }
}
