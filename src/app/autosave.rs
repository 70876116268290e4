/// Dirty flag plus the number of edits since the buffer was last clean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifiedState {
    modified: bool,
    edit_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub became_modified: bool,
    pub autosave_triggered: bool,
}

impl ModifiedState {
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn edit_count(&self) -> usize {
        self.edit_count
    }

    /// Records one qualifying edit. A threshold of 0 never triggers.
    pub fn apply_edit(&mut self, threshold: usize) -> EditOutcome {
        let became_modified = !self.modified;
        self.modified = true;
        self.edit_count += 1;
        EditOutcome {
            became_modified,
            autosave_triggered: threshold > 0 && self.edit_count >= threshold,
        }
    }

    /// Called after a successful save, explicit or automatic.
    pub fn mark_clean(&mut self) {
        self.modified = false;
        self.edit_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_when_count_reaches_threshold() {
        let mut state = ModifiedState::default();
        let first = state.apply_edit(3);
        assert!(first.became_modified);
        assert!(!first.autosave_triggered);
        assert!(!state.apply_edit(3).autosave_triggered);
        let third = state.apply_edit(3);
        assert!(third.autosave_triggered);
        assert!(!third.became_modified);
        state.mark_clean();
        assert!(!state.is_modified());
        assert_eq!(state.edit_count(), 0);
        assert!(!state.apply_edit(3).autosave_triggered);
    }

    #[test]
    fn zero_threshold_never_triggers() {
        let mut state = ModifiedState::default();
        for _ in 0..100 {
            assert!(!state.apply_edit(0).autosave_triggered);
        }
        assert_eq!(state.edit_count(), 100);
    }
}
