use chrono::NaiveDateTime;

pub(crate) type TaskId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Task {
    pub(crate) id: TaskId,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) due: Option<NaiveDateTime>,
}

impl Task {
    pub(crate) fn new(id: TaskId, title: String, body: String, due: Option<NaiveDateTime>) -> Self {
        Task {
            id,
            title,
            body,
            due,
        }
    }
}

/// Raw editor contents, before trimming.
#[derive(Debug, Default)]
pub(crate) struct TaskDraft {
    pub(crate) title: String,
    pub(crate) body: String,
}

/// A validated draft, ready to be inserted.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct NewTask {
    pub(crate) title: String,
    pub(crate) body: String,
}

impl TaskDraft {
    pub(crate) fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Trims both fields. Returns `None` when either is empty afterwards.
    pub(crate) fn validate(&self) -> Option<NewTask> {
        let title = self.title.trim();
        let body = self.body.trim();
        if title.is_empty() || body.is_empty() {
            return None;
        }
        Some(NewTask {
            title: title.to_owned(),
            body: body.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_each_field_into_its_own_slot() {
        let draft = TaskDraft::new("  groceries \n", "\tmilk, eggs  ");
        assert_eq!(
            draft.validate(),
            Some(NewTask {
                title: "groceries".into(),
                body: "milk, eggs".into(),
            })
        );
    }

    #[test]
    fn validate_rejects_blank_title() {
        assert_eq!(TaskDraft::new("", "body").validate(), None);
        assert_eq!(TaskDraft::new("   \t", "body").validate(), None);
    }

    #[test]
    fn validate_rejects_blank_body() {
        assert_eq!(TaskDraft::new("title", "  ").validate(), None);
    }
}
