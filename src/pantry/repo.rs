use sqlx::PgPool;
use uuid::Uuid;

use crate::ingredients::{IngredientInput, IngredientRow};
use crate::pantry::repo_types::{Container, ContainerKind, OwnedItem};

impl Container {
    pub async fn find(
        db: &PgPool,
        user_id: Uuid,
        kind: ContainerKind,
    ) -> anyhow::Result<Option<Container>> {
        let container = sqlx::query_as::<_, Container>(
            "SELECT id, user_id, kind FROM containers WHERE user_id = $1 AND kind = $2",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_optional(db)
        .await?;
        Ok(container)
    }

    /// Containers are created lazily on first use; the unique constraint on
    /// (user_id, kind) keeps concurrent first accesses down to one row.
    pub async fn find_or_create(
        db: &PgPool,
        user_id: Uuid,
        kind: ContainerKind,
    ) -> anyhow::Result<Container> {
        if let Some(container) = Self::find(db, user_id, kind).await? {
            return Ok(container);
        }
        sqlx::query(
            "INSERT INTO containers (user_id, kind) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .execute(db)
        .await?;
        let container = Self::find(db, user_id, kind)
            .await?
            .ok_or_else(|| anyhow::anyhow!("container missing after insert"))?;
        Ok(container)
    }

    pub async fn items(db: &PgPool, container_id: Uuid) -> anyhow::Result<Vec<IngredientRow>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT id, name, form, quantity, unit
            FROM ingredients
            WHERE container_id = $1
            ORDER BY lower(name), lower(coalesce(form, ''))
            "#,
        )
        .bind(container_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

pub async fn find_item(db: &PgPool, item_id: Uuid) -> anyhow::Result<Option<OwnedItem>> {
    let item = sqlx::query_as::<_, OwnedItem>(
        r#"
        SELECT c.user_id AS owner_id, c.kind
        FROM ingredients i
        JOIN containers c ON c.id = i.container_id
        WHERE i.id = $1
        "#,
    )
    .bind(item_id)
    .fetch_optional(db)
    .await?;
    Ok(item)
}

pub async fn insert_item(
    db: &PgPool,
    container_id: Uuid,
    item: &IngredientInput,
) -> anyhow::Result<IngredientRow> {
    let row = sqlx::query_as::<_, IngredientRow>(
        r#"
        INSERT INTO ingredients (name, form, quantity, unit, container_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, form, quantity, unit
        "#,
    )
    .bind(&item.name)
    .bind(&item.form)
    .bind(item.quantity)
    .bind(&item.unit)
    .bind(container_id)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Restocking an item that is already present in the same unit adds to the
/// stored quantity instead of duplicating the line.
pub async fn merge_quantity(
    db: &PgPool,
    item_id: Uuid,
    additional: f64,
) -> anyhow::Result<IngredientRow> {
    let row = sqlx::query_as::<_, IngredientRow>(
        r#"
        UPDATE ingredients SET quantity = quantity + $2
        WHERE id = $1
        RETURNING id, name, form, quantity, unit
        "#,
    )
    .bind(item_id)
    .bind(additional)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_item(
    db: &PgPool,
    item_id: Uuid,
    item: &IngredientInput,
) -> anyhow::Result<IngredientRow> {
    let row = sqlx::query_as::<_, IngredientRow>(
        r#"
        UPDATE ingredients SET name = $2, form = $3, quantity = $4, unit = $5
        WHERE id = $1
        RETURNING id, name, form, quantity, unit
        "#,
    )
    .bind(item_id)
    .bind(&item.name)
    .bind(&item.form)
    .bind(item.quantity)
    .bind(&item.unit)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn delete_item(db: &PgPool, item_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM ingredients WHERE id = $1")
        .bind(item_id)
        .execute(db)
        .await?;
    Ok(())
}
