//! Seams to the game host.

use itemguard_domain::Item;
use itemguard_types::Violation;

/// One entity's inventory as captured by the host at scan time.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    pub id: String,
    pub name: Option<String>,
    /// Permission decisions belong to the host; bypassed entities are skipped.
    pub bypass: bool,
    /// `(slot index, item)` pairs. Empty slots are simply absent.
    pub slots: Vec<(u32, Item)>,
}

impl EntitySnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            bypass: false,
            slots: Vec::new(),
        }
    }

    pub fn with_slot(mut self, slot: u32, item: Item) -> Self {
        self.slots.push((slot, item));
        self
    }
}

/// Lists the entities a scan should visit.
pub trait EntitySource: Send + Sync + 'static {
    fn active_entities(&self) -> Vec<EntitySnapshot>;
}

/// Something the host has to act on, delivered through the scanner's event
/// channel so that write-back never runs on a scan worker.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanEvent {
    pub entity_id: String,
    pub slot: u32,
    pub action: ScanAction,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScanAction {
    /// The item violates; nothing was changed.
    Reported(Vec<Violation>),
    /// Write this corrected item back into the slot.
    Replace(Item),
    /// Clear the slot.
    Delete,
}
