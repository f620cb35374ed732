pub mod events;
pub mod list;

pub use events::{EventBus, ModListEvent};
pub use list::{AddReport, ModList};

/// Behaviour switches for [`ModList`], taken from the config at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPolicy {
    /// When set, add and delete are refused while the list is locked
    pub lock_gates_membership: bool,
    /// When cleared, hide/unhide only change the in-memory record
    pub persist_hidden: bool,
    /// When cleared, refresh fetches the stored list and discards it
    pub refresh_replaces_list: bool,
}

impl Default for ListPolicy {
    fn default() -> Self {
        Self {
            lock_gates_membership: false,
            persist_hidden: true,
            refresh_replaces_list: true,
        }
    }
}
