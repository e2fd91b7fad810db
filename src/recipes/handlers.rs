use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::{authorize_self, Caller};
use crate::errors::ApiError;
use crate::ingredients::{self, IngredientRow};
use crate::pantry::repo_types::{Container, ContainerKind};
use crate::recipes::dto::{
    AnnotatedIngredient, CreateRecipeRequest, HighlightQuery, Pagination, RecipeDetails,
    RecipeListItem, UpdateRecipeRequest,
};
use crate::recipes::repo_types::Recipe;
use crate::state::AppState;
use crate::sufficiency::{classify, Amount};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe))
        .route("/recipes/:id", put(update_recipe).delete(delete_recipe))
}

#[instrument(skip(state, user))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Caller(user): Caller,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<RecipeListItem>>, ApiError> {
    let recipes = Recipe::list_by_user(&state.db, user.id, p.limit, p.offset).await?;
    Ok(Json(recipes.into_iter().map(RecipeListItem::from).collect()))
}

/// Any authenticated caller may read a recipe; the sufficiency annotation
/// always compares against the caller's own pantry.
#[instrument(skip(state, user))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
    Query(q): Query<HighlightQuery>,
) -> Result<Json<RecipeDetails>, ApiError> {
    let recipe = Recipe::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    let items = Recipe::ingredients(&state.db, recipe.id).await?;

    let ingredients = if q.highlight {
        let pantry = match Container::find(&state.db, user.id, ContainerKind::Pantry).await? {
            Some(container) => Container::items(&state.db, container.id).await?,
            None => Vec::new(),
        };
        annotate(items, &pantry)
    } else {
        items.into_iter().map(AnnotatedIngredient::plain).collect()
    };

    Ok(Json(RecipeDetails::from_parts(recipe, ingredients)))
}

#[instrument(skip(state, user, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    Caller(user): Caller,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetails>), ApiError> {
    let mut new = payload.validate().map_err(ApiError::Validation)?;
    new.ingredients =
        ingredients::dedup(std::mem::take(&mut new.ingredients)).map_err(ApiError::Conflict)?;

    if Recipe::find_by_name(&state.db, user.id, &new.name)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "recipe {} already exists",
            new.name
        )));
    }

    let (recipe, items) = Recipe::create(&state.db, user.id, &new).await?;
    info!(user_id = %user.id, recipe_id = %recipe.id, "recipe created");

    let ingredients = items.into_iter().map(AnnotatedIngredient::plain).collect();
    Ok((
        StatusCode::CREATED,
        Json(RecipeDetails::from_parts(recipe, ingredients)),
    ))
}

#[instrument(skip(state, user, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeDetails>, ApiError> {
    let patch = payload.validate().map_err(ApiError::Validation)?;

    let recipe = Recipe::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    authorize_self(&user, recipe.user_id, None, None)?;

    let name = patch.name.unwrap_or_else(|| recipe.name.clone());
    if !name.eq_ignore_ascii_case(&recipe.name)
        && Recipe::find_by_name(&state.db, user.id, &name)
            .await?
            .is_some()
    {
        return Err(ApiError::Conflict(format!("recipe {name} already exists")));
    }

    let instructions = patch
        .instructions
        .unwrap_or_else(|| recipe.instructions.clone());
    let prep = patch.prep_time_minutes.unwrap_or(recipe.prep_time_minutes);
    let cook = patch.cook_time_minutes.unwrap_or(recipe.cook_time_minutes);
    let diet_tags = patch.diet_tags.unwrap_or_else(|| recipe.diet_tags.clone());
    let replacement = match patch.ingredients {
        Some(items) => Some(ingredients::dedup(items).map_err(ApiError::Conflict)?),
        None => None,
    };

    let (updated, items) = Recipe::update(
        &state.db,
        recipe.id,
        &name,
        &instructions,
        prep,
        cook,
        &diet_tags,
        replacement.as_deref(),
    )
    .await?;
    info!(user_id = %user.id, recipe_id = %updated.id, "recipe updated");

    let items = match items {
        Some(items) => items,
        None => Recipe::ingredients(&state.db, updated.id).await?,
    };
    let ingredients = items.into_iter().map(AnnotatedIngredient::plain).collect();
    Ok(Json(RecipeDetails::from_parts(updated, ingredients)))
}

#[instrument(skip(state, user))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let recipe = Recipe::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    authorize_self(&user, recipe.user_id, None, None)?;

    Recipe::delete(&state.db, recipe.id).await?;
    info!(user_id = %user.id, recipe_id = %recipe.id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Pair each recipe ingredient with the pantry line item matching it by
/// name and form, and classify what is on hand.
fn annotate(items: Vec<IngredientRow>, pantry: &[IngredientRow]) -> Vec<AnnotatedIngredient> {
    items
        .into_iter()
        .map(|item| {
            let matched = pantry
                .iter()
                .find(|p| p.matches(&item.name, item.form.as_deref()));
            let status = classify(
                Amount {
                    quantity: item.quantity,
                    unit: &item.unit,
                },
                matched.map(|p| Amount {
                    quantity: p.quantity,
                    unit: &p.unit,
                }),
            );
            AnnotatedIngredient::classified(item, status)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sufficiency::SufficiencyStatus;

    fn row(name: &str, form: Option<&str>, quantity: f64, unit: &str) -> IngredientRow {
        IngredientRow {
            id: Uuid::new_v4(),
            name: name.into(),
            form: form.map(Into::into),
            quantity,
            unit: unit.into(),
        }
    }

    #[test]
    fn annotate_matches_by_name_and_form() {
        let items = vec![
            row("milk", None, 2.0, "liter"),
            row("flour", Some("sifted"), 1.0, "cup"),
            row("eggs", None, 3.0, "piece"),
        ];
        let pantry = vec![
            row("Milk", None, 1500.0, "milliliter"),
            row("flour", None, 5.0, "cup"),
        ];

        let annotated = annotate(items, &pantry);
        assert_eq!(
            annotated[0].status,
            Some(SufficiencyStatus::InsufficientConverted)
        );
        // Pantry flour has no form, so the sifted flour finds no match.
        assert_eq!(annotated[1].status, Some(SufficiencyStatus::Missing));
        assert_eq!(annotated[2].status, Some(SufficiencyStatus::Missing));
        assert!(annotated.iter().all(|a| a.severity.is_some()));
    }
}
