//! `{id, name}` item embedded in the other side's resource.

use serde::Serialize;

use crate::domain::entities::EntityRef;

#[derive(Debug, Serialize, PartialEq)]
pub struct RelatedItem {
    pub id: i64,
    pub name: String,
}

impl From<EntityRef> for RelatedItem {
    fn from(r: EntityRef) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

/// Converts a loaded relation, keeping "not loaded" as `None`.
pub(crate) fn related_items(refs: Option<Vec<EntityRef>>) -> Option<Vec<RelatedItem>> {
    refs.map(|refs| refs.into_iter().map(RelatedItem::from).collect())
}
