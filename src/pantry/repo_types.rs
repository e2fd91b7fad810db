use sqlx::FromRow;
use uuid::Uuid;

/// The two per-user ingredient containers. Structurally identical, kept
/// apart by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Pantry,
    ShoppingList,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerKind::Pantry => "pantry",
            ContainerKind::ShoppingList => "shopping_list",
        }
    }

    /// Noun used in not-found messages.
    pub fn item_name(self) -> &'static str {
        match self {
            ContainerKind::Pantry => "pantry item",
            ContainerKind::ShoppingList => "shopping list item",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Container {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
}

/// An ingredient's container ownership, for checks on item-level
/// mutations.
#[derive(Debug, Clone, FromRow)]
pub struct OwnedItem {
    pub owner_id: Uuid,
    pub kind: String,
}

impl OwnedItem {
    pub fn is_kind(&self, kind: ContainerKind) -> bool {
        self.kind == kind.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trip() {
        let item = OwnedItem {
            owner_id: Uuid::new_v4(),
            kind: "shopping_list".into(),
        };
        assert!(item.is_kind(ContainerKind::ShoppingList));
        assert!(!item.is_kind(ContainerKind::Pantry));
    }
}
