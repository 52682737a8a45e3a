//! Two-step guarded delete: select an item, confirm, execute, then re-list.
//! At most one item can be pending or in flight at a time.

/// Where the delete flow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState<K> {
    Idle,
    /// Confirmation dialog open for this item.
    PendingConfirm(K),
    /// Delete request in flight.
    Deleting(K),
}

#[derive(Debug)]
pub struct DeleteFlow<K> {
    state: DeleteState<K>,
}

impl<K: Clone + PartialEq> DeleteFlow<K> {
    pub fn new() -> Self {
        Self {
            state: DeleteState::Idle,
        }
    }

    pub fn state(&self) -> &DeleteState<K> {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DeleteState::Idle
    }

    /// Open the confirmation for `id`. Refused while another delete is
    /// pending or in flight.
    pub fn request(&mut self, id: K) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = DeleteState::PendingConfirm(id);
        true
    }

    /// Dismiss the confirmation. No side effects.
    pub fn cancel(&mut self) {
        if matches!(self.state, DeleteState::PendingConfirm(_)) {
            self.state = DeleteState::Idle;
        }
    }

    /// Confirm: returns the id to delete and marks the request in flight.
    pub fn confirm(&mut self) -> Option<K> {
        match &self.state {
            DeleteState::PendingConfirm(id) => {
                let id = id.clone();
                self.state = DeleteState::Deleting(id.clone());
                Some(id)
            }
            _ => None,
        }
    }

    /// The delete request came back (success or failure). The caller follows
    /// up with a full re-list; the list controller's page clamp absorbs any
    /// page shift.
    pub fn finish(&mut self) {
        if matches!(self.state, DeleteState::Deleting(_)) {
            self.state = DeleteState::Idle;
        }
    }
}

impl<K: Clone + PartialEq> Default for DeleteFlow<K> {
    fn default() -> Self {
        Self::new()
    }
}
