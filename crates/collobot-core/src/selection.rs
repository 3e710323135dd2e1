use std::collections::HashMap;

use crate::domain::UserId;

/// Per-user selections, created lazily on first interaction.
///
/// Not persisted across restarts; the only durable output is what the
/// exporter writes. Callers that share this across tasks wrap it in a lock.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selections: HashMap<UserId, Vec<String>>,
}

impl SelectionStore {
    /// Appends `expression` to the user's list unless it is already there
    /// (exact string match). Returns whether the list changed.
    pub fn add(&mut self, user_id: UserId, expression: &str) -> bool {
        let list = self.selections.entry(user_id).or_default();
        if list.iter().any(|e| e == expression) {
            return false;
        }
        list.push(expression.to_string());
        true
    }

    pub fn clear(&mut self, user_id: UserId) {
        self.selections.remove(&user_id);
    }

    /// Current selection in append order; empty for unseen users.
    pub fn get(&self, user_id: UserId) -> Vec<String> {
        self.selections.get(&user_id).cloned().unwrap_or_default()
    }

    pub fn count(&self, user_id: UserId) -> usize {
        self.selections.get(&user_id).map_or(0, Vec::len)
    }
}
