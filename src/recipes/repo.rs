use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::ingredients::{IngredientInput, IngredientRow};
use crate::recipes::dto::NewRecipe;
use crate::recipes::repo_types::Recipe;

impl Recipe {
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, name, instructions, prep_time_minutes, cook_time_minutes,
                   diet_tags, created_at, updated_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, name, instructions, prep_time_minutes, cook_time_minutes,
                   diet_tags, created_at, updated_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(recipe)
    }

    /// Recipe names are unique per user, case-insensitively.
    pub async fn find_by_name(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
    ) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, name, instructions, prep_time_minutes, cook_time_minutes,
                   diet_tags, created_at, updated_at
            FROM recipes
            WHERE user_id = $1 AND lower(name) = lower($2)
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(recipe)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        new: &NewRecipe,
    ) -> anyhow::Result<(Recipe, Vec<IngredientRow>)> {
        let mut tx = db.begin().await?;
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (user_id, name, instructions, prep_time_minutes,
                                 cook_time_minutes, diet_tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, instructions, prep_time_minutes, cook_time_minutes,
                      diet_tags, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&new.name)
        .bind(&new.instructions)
        .bind(new.prep_time_minutes)
        .bind(new.cook_time_minutes)
        .bind(&new.diet_tags)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new.ingredients.len());
        for ingredient in &new.ingredients {
            items.push(insert_ingredient(&mut tx, recipe.id, ingredient).await?);
        }

        tx.commit().await?;
        Ok((recipe, items))
    }

    /// Updates the scalar fields; when `ingredients` is present the stored
    /// list is replaced wholesale inside the same transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        instructions: &str,
        prep_time_minutes: i32,
        cook_time_minutes: i32,
        diet_tags: &[String],
        ingredients: Option<&[IngredientInput]>,
    ) -> anyhow::Result<(Recipe, Option<Vec<IngredientRow>>)> {
        let mut tx = db.begin().await?;
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes
            SET name = $2, instructions = $3, prep_time_minutes = $4,
                cook_time_minutes = $5, diet_tags = $6, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, name, instructions, prep_time_minutes, cook_time_minutes,
                      diet_tags, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(instructions)
        .bind(prep_time_minutes)
        .bind(cook_time_minutes)
        .bind(diet_tags)
        .fetch_one(&mut *tx)
        .await?;

        let items = match ingredients {
            Some(ingredients) => {
                sqlx::query("DELETE FROM ingredients WHERE recipe_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                let mut items = Vec::with_capacity(ingredients.len());
                for ingredient in ingredients {
                    items.push(insert_ingredient(&mut tx, id, ingredient).await?);
                }
                Some(items)
            }
            None => None,
        };

        tx.commit().await?;
        Ok((recipe, items))
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn ingredients(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<IngredientRow>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT id, name, form, quantity, unit
            FROM ingredients
            WHERE recipe_id = $1
            ORDER BY lower(name), lower(coalesce(form, ''))
            "#,
        )
        .bind(recipe_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

async fn insert_ingredient(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
    ingredient: &IngredientInput,
) -> anyhow::Result<IngredientRow> {
    let row = sqlx::query_as::<_, IngredientRow>(
        r#"
        INSERT INTO ingredients (name, form, quantity, unit, recipe_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, form, quantity, unit
        "#,
    )
    .bind(&ingredient.name)
    .bind(&ingredient.form)
    .bind(ingredient.quantity)
    .bind(&ingredient.unit)
    .bind(recipe_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row)
}
