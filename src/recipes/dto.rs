use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::FieldError;
use crate::ingredients::{IngredientInput, IngredientRow};
use crate::recipes::repo_types::Recipe;
use crate::sufficiency::{Severity, SufficiencyStatus};
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct HighlightQuery {
    #[serde(default = "default_highlight")]
    pub highlight: bool,
}
fn default_highlight() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub instructions: String,
    #[serde(default)]
    pub prep_time_minutes: i32,
    #[serde(default)]
    pub cook_time_minutes: i32,
    #[serde(default)]
    pub diet_tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
}

/// A fully validated recipe payload.
#[derive(Debug)]
pub struct NewRecipe {
    pub name: String,
    pub instructions: String,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub diet_tags: Vec<String>,
    pub ingredients: Vec<IngredientInput>,
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn validate_ingredient_list(
    items: Vec<IngredientInput>,
    errors: &mut Vec<FieldError>,
) -> Vec<IngredientInput> {
    let mut cleaned = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item.validate() {
            Ok(item) => cleaned.push(item),
            Err(item_errors) => errors.extend(item_errors.into_iter().map(|e| {
                FieldError::new(format!("ingredients[{index}].{}", e.field), e.message)
            })),
        }
    }
    cleaned
}

impl CreateRecipeRequest {
    pub fn validate(self) -> Result<NewRecipe, Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = validate::accumulate(&mut errors, validate::non_empty("name", &self.name));
        let instructions = validate::accumulate(
            &mut errors,
            validate::non_empty("instructions", &self.instructions),
        );
        let prep = validate::accumulate(
            &mut errors,
            validate::minutes("prep_time_minutes", self.prep_time_minutes),
        );
        let cook = validate::accumulate(
            &mut errors,
            validate::minutes("cook_time_minutes", self.cook_time_minutes),
        );
        let ingredients = validate_ingredient_list(self.ingredients, &mut errors);
        let diet_tags = clean_tags(self.diet_tags);

        match (name, instructions, prep, cook, errors.is_empty()) {
            (Some(name), Some(instructions), Some(prep), Some(cook), true) => Ok(NewRecipe {
                name,
                instructions,
                prep_time_minutes: prep,
                cook_time_minutes: cook,
                diet_tags,
                ingredients,
            }),
            _ => Err(errors),
        }
    }
}

/// Partial update; absent fields keep their stored value, a present
/// ingredient list replaces the stored one wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub instructions: Option<String>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub diet_tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<IngredientInput>>,
}

#[derive(Debug)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub instructions: Option<String>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub diet_tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<IngredientInput>>,
}

impl UpdateRecipeRequest {
    pub fn validate(self) -> Result<RecipePatch, Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = match &self.name {
            Some(raw) => {
                validate::accumulate(&mut errors, validate::non_empty("name", raw)).map(Some)
            }
            None => Some(None),
        };
        let instructions = match &self.instructions {
            Some(raw) => {
                validate::accumulate(&mut errors, validate::non_empty("instructions", raw))
                    .map(Some)
            }
            None => Some(None),
        };
        if let Some(prep) = self.prep_time_minutes {
            validate::accumulate(&mut errors, validate::minutes("prep_time_minutes", prep));
        }
        if let Some(cook) = self.cook_time_minutes {
            validate::accumulate(&mut errors, validate::minutes("cook_time_minutes", cook));
        }
        let ingredients = self
            .ingredients
            .map(|items| validate_ingredient_list(items, &mut errors));
        let diet_tags = self.diet_tags.map(clean_tags);

        match (name, instructions, errors.is_empty()) {
            (Some(name), Some(instructions), true) => Ok(RecipePatch {
                name,
                instructions,
                prep_time_minutes: self.prep_time_minutes,
                cook_time_minutes: self.cook_time_minutes,
                diet_tags,
                ingredients,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeListItem {
    pub id: Uuid,
    pub name: String,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub diet_tags: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Recipe> for RecipeListItem {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            diet_tags: recipe.diet_tags,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// An ingredient line, optionally annotated with how it compares to the
/// caller's pantry.
#[derive(Debug, Serialize)]
pub struct AnnotatedIngredient {
    #[serde(flatten)]
    pub item: IngredientRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SufficiencyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl AnnotatedIngredient {
    pub fn plain(item: IngredientRow) -> Self {
        Self {
            item,
            status: None,
            severity: None,
        }
    }

    pub fn classified(item: IngredientRow, status: SufficiencyStatus) -> Self {
        Self {
            status: Some(status),
            severity: Some(status.severity()),
            item,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    pub id: Uuid,
    pub name: String,
    pub instructions: String,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub diet_tags: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub ingredients: Vec<AnnotatedIngredient>,
}

impl RecipeDetails {
    pub fn from_parts(recipe: Recipe, ingredients: Vec<AnnotatedIngredient>) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            instructions: recipe.instructions,
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            diet_tags: recipe.diet_tags,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
            ingredients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateRecipeRequest {
        CreateRecipeRequest {
            name: " Pancakes ".into(),
            instructions: "mix and fry".into(),
            prep_time_minutes: 10,
            cook_time_minutes: 15,
            diet_tags: vec![" Vegetarian ".into(), "".into()],
            ingredients: vec![IngredientInput {
                name: "flour".into(),
                form: None,
                quantity: 2.0,
                unit: "cup".into(),
            }],
        }
    }

    #[test]
    fn create_validation_cleans_fields() {
        let recipe = base_request().validate().unwrap();
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.diet_tags, vec!["vegetarian"]);
        assert_eq!(recipe.ingredients.len(), 1);
    }

    #[test]
    fn create_validation_labels_ingredient_errors_by_index() {
        let mut request = base_request();
        request.ingredients.push(IngredientInput {
            name: "".into(),
            form: None,
            quantity: -1.0,
            unit: "cup".into(),
        });
        let errors = request.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["ingredients[1].name", "ingredients[1].quantity"]);
    }

    #[test]
    fn create_validation_rejects_negative_times() {
        let mut request = base_request();
        request.prep_time_minutes = -5;
        let errors = request.validate().unwrap_err();
        assert_eq!(errors[0].field, "prep_time_minutes");
    }

    #[test]
    fn update_validation_passes_through_absent_fields() {
        let patch = UpdateRecipeRequest {
            name: None,
            instructions: None,
            prep_time_minutes: None,
            cook_time_minutes: None,
            diet_tags: None,
            ingredients: None,
        }
        .validate()
        .unwrap();
        assert!(patch.name.is_none());
        assert!(patch.ingredients.is_none());
    }

    #[test]
    fn annotation_skips_status_fields_when_plain() {
        let item = IngredientRow {
            id: Uuid::new_v4(),
            name: "milk".into(),
            form: None,
            quantity: 1.0,
            unit: "liter".into(),
        };
        let json = serde_json::to_value(AnnotatedIngredient::plain(item)).unwrap();
        assert!(json.get("status").is_none());
        assert!(json.get("severity").is_none());
        assert_eq!(json["name"], "milk");
    }

    #[test]
    fn annotation_carries_status_and_severity() {
        let item = IngredientRow {
            id: Uuid::new_v4(),
            name: "milk".into(),
            form: None,
            quantity: 2.0,
            unit: "liter".into(),
        };
        let json = serde_json::to_value(AnnotatedIngredient::classified(
            item,
            SufficiencyStatus::Missing,
        ))
        .unwrap();
        assert_eq!(json["status"], "missing");
        assert_eq!(json["severity"], "error");
    }
}
