use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel as _, QueryFilter, QueryOrder,
    QueryTrait as _, SqlErr, TransactionTrait, TryIntoModel as _,
    sea_query::{Expr, Query},
};

use recipe_domain::price::PRICE_DECIMAL_PLACES;
use recipe_service_schema::{ingredients, recipe_ingredients, recipes, users};

use crate::domain::repository::{IngredientRepository, RecipeRepository, UserRepository};
use crate::domain::types::{
    Ingredient, NewRecipe, NewUser, Recipe, RecipeChanges, User, UserChanges,
};
use crate::error::RecipeServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RecipeServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RecipeServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &NewUser) -> Result<User, RecipeServiceError> {
        let model = users::ActiveModel {
            id: NotSet,
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            password_hash: Set(user.password_hash.clone()),
            is_active: Set(user.flags.is_active),
            is_staff: Set(user.flags.is_staff),
            is_superuser: Set(user.flags.is_superuser),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(email_conflict)?;
        Ok(user_from_model(model))
    }

    async fn update(
        &self,
        id: i32,
        changes: &UserChanges,
    ) -> Result<Option<User>, RecipeServiceError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(ref email) = changes.email {
            am.email = Set(email.clone());
        }
        if let Some(ref name) = changes.name {
            am.name = Set(name.clone());
        }
        if let Some(ref hash) = changes.password_hash {
            am.password_hash = Set(hash.clone());
        }
        if !am.is_changed() {
            return Ok(Some(user_from_model(am.try_into_model().context("user model")?)));
        }
        let model = am.update(&self.db).await.map_err(email_conflict)?;
        Ok(Some(user_from_model(model)))
    }
}

/// Map a unique-key violation on insert/update to a field error on `email`.
fn email_conflict(err: DbErr) -> RecipeServiceError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return RecipeServiceError::field("email", "user with this email already exists.");
    }
    anyhow::Error::new(err).context("write user").into()
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        is_active: model.is_active,
        is_staff: model.is_staff,
        is_superuser: model.is_superuser,
        created_at: model.created_at,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl RecipeRepository for DbRecipeRepository {
    async fn list(
        &self,
        user_id: i32,
        ingredient_ids: Option<&[i32]>,
    ) -> Result<Vec<Recipe>, RecipeServiceError> {
        let models = recipes::Entity::find()
            .filter(recipes::Column::UserId.eq(user_id))
            .apply_if(ingredient_ids, |query, ids| {
                // A subquery keeps each recipe once however many ids it matches.
                query.filter(
                    recipes::Column::Id.in_subquery(
                        Query::select()
                            .column(recipe_ingredients::Column::RecipeId)
                            .from(recipe_ingredients::Entity)
                            .and_where(
                                recipe_ingredients::Column::IngredientId
                                    .is_in(ids.iter().copied()),
                            )
                            .to_owned(),
                    ),
                )
            })
            .order_by_desc(recipes::Column::Id)
            .all(&self.db)
            .await
            .context("list recipes")?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut ingredients = load_ingredients(&self.db, &ids).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let linked = ingredients.remove(&m.id).unwrap_or_default();
                recipe_from_model(m, linked)
            })
            .collect())
    }

    async fn find(&self, user_id: i32, id: i32) -> Result<Option<Recipe>, RecipeServiceError> {
        find_recipe(&self.db, user_id, id).await
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipeServiceError> {
        let txn = self.db.begin().await.context("begin create recipe")?;
        let model = recipes::ActiveModel {
            id: NotSet,
            user_id: Set(recipe.user_id),
            title: Set(recipe.title.clone()),
            description: Set(recipe.description.clone()),
            time_minutes: Set(recipe.time_minutes),
            price: Set(recipe.price),
            link: Set(recipe.link.clone()),
            image: Set(None),
        }
        .insert(&txn)
        .await
        .context("insert recipe")?;
        let ingredients = resolve_ingredients(&txn, recipe.user_id, &recipe.ingredient_names).await?;
        link_ingredients(&txn, model.id, &ingredients).await?;
        txn.commit().await.context("commit create recipe")?;
        Ok(recipe_from_model(model, ingredients))
    }

    async fn update(
        &self,
        user_id: i32,
        id: i32,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, RecipeServiceError> {
        let txn = self.db.begin().await.context("begin update recipe")?;
        let Some(model) = find_recipe_model(&txn, user_id, id).await? else {
            return Ok(None);
        };

        let mut am = model.into_active_model();
        if let Some(ref title) = changes.title {
            am.title = Set(title.clone());
        }
        if let Some(ref description) = changes.description {
            am.description = Set(description.clone());
        }
        if let Some(time_minutes) = changes.time_minutes {
            am.time_minutes = Set(time_minutes);
        }
        if let Some(price) = changes.price {
            am.price = Set(price);
        }
        if let Some(ref link) = changes.link {
            am.link = Set(link.clone());
        }
        let model = if am.is_changed() {
            am.update(&txn).await.context("update recipe")?
        } else {
            am.try_into_model().context("recipe model")?
        };

        let ingredients = match changes.ingredient_names {
            Some(ref names) => {
                recipe_ingredients::Entity::delete_many()
                    .filter(recipe_ingredients::Column::RecipeId.eq(id))
                    .exec(&txn)
                    .await
                    .context("clear recipe ingredients")?;
                let ingredients = resolve_ingredients(&txn, user_id, names).await?;
                link_ingredients(&txn, id, &ingredients).await?;
                ingredients
            }
            None => load_ingredients(&txn, &[id])
                .await?
                .remove(&id)
                .unwrap_or_default(),
        };
        txn.commit().await.context("commit update recipe")?;
        Ok(Some(recipe_from_model(model, ingredients)))
    }

    async fn set_image(
        &self,
        user_id: i32,
        id: i32,
        image: Option<&str>,
    ) -> Result<bool, RecipeServiceError> {
        let result = recipes::Entity::update_many()
            .col_expr(recipes::Column::Image, Expr::value(image.map(str::to_owned)))
            .filter(recipes::Column::Id.eq(id))
            .filter(recipes::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("set recipe image")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, user_id: i32, id: i32) -> Result<Option<Recipe>, RecipeServiceError> {
        let txn = self.db.begin().await.context("begin delete recipe")?;
        let Some(recipe) = find_recipe(&txn, user_id, id).await? else {
            return Ok(None);
        };
        recipe_ingredients::Entity::delete_many()
            .filter(recipe_ingredients::Column::RecipeId.eq(id))
            .exec(&txn)
            .await
            .context("delete recipe ingredients")?;
        recipes::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete recipe")?;
        txn.commit().await.context("commit delete recipe")?;
        Ok(Some(recipe))
    }
}

async fn find_recipe_model<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    id: i32,
) -> Result<Option<recipes::Model>, RecipeServiceError> {
    let model = recipes::Entity::find_by_id(id)
        .filter(recipes::Column::UserId.eq(user_id))
        .one(db)
        .await
        .context("find recipe")?;
    Ok(model)
}

async fn find_recipe<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    id: i32,
) -> Result<Option<Recipe>, RecipeServiceError> {
    let Some(model) = find_recipe_model(db, user_id, id).await? else {
        return Ok(None);
    };
    let ingredients = load_ingredients(db, &[id])
        .await?
        .remove(&id)
        .unwrap_or_default();
    Ok(Some(recipe_from_model(model, ingredients)))
}

/// Ingredients of each recipe in `recipe_ids`, ordered by ingredient id.
async fn load_ingredients<C: ConnectionTrait>(
    db: &C,
    recipe_ids: &[i32],
) -> Result<HashMap<i32, Vec<Ingredient>>, RecipeServiceError> {
    let mut by_recipe: HashMap<i32, Vec<Ingredient>> = HashMap::new();
    if recipe_ids.is_empty() {
        return Ok(by_recipe);
    }
    let rows = recipe_ingredients::Entity::find()
        .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .find_also_related(ingredients::Entity)
        .order_by_asc(recipe_ingredients::Column::IngredientId)
        .all(db)
        .await
        .context("load recipe ingredients")?;
    for (link, ingredient) in rows {
        if let Some(ingredient) = ingredient {
            by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(ingredient_from_model(ingredient));
        }
    }
    Ok(by_recipe)
}

/// Look up each name for the owner, creating missing ingredients.
async fn resolve_ingredients<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    names: &[String],
) -> Result<Vec<Ingredient>, RecipeServiceError> {
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let existing = ingredients::Entity::find()
            .filter(ingredients::Column::UserId.eq(user_id))
            .filter(ingredients::Column::Name.eq(name.as_str()))
            .order_by_asc(ingredients::Column::Id)
            .one(db)
            .await
            .context("find ingredient by name")?;
        let model = match existing {
            Some(model) => model,
            None => ingredients::ActiveModel {
                id: NotSet,
                user_id: Set(user_id),
                name: Set(name.clone()),
            }
            .insert(db)
            .await
            .context("insert ingredient")?,
        };
        resolved.push(ingredient_from_model(model));
    }
    resolved.sort_by_key(|i| i.id);
    Ok(resolved)
}

async fn link_ingredients<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    ingredients: &[Ingredient],
) -> Result<(), RecipeServiceError> {
    if ingredients.is_empty() {
        return Ok(());
    }
    recipe_ingredients::Entity::insert_many(ingredients.iter().map(|i| {
        recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(i.id),
        }
    }))
    .exec(db)
    .await
    .context("link recipe ingredients")?;
    Ok(())
}

fn recipe_from_model(model: recipes::Model, ingredients: Vec<Ingredient>) -> Recipe {
    // SQLite hands decimals back through f64, so pin the scale again.
    let mut price = model.price;
    price.rescale(PRICE_DECIMAL_PLACES);
    Recipe {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        description: model.description,
        time_minutes: model.time_minutes,
        price,
        link: model.link,
        image: model.image,
        ingredients,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn list(&self, user_id: i32) -> Result<Vec<Ingredient>, RecipeServiceError> {
        let models = ingredients::Entity::find()
            .filter(ingredients::Column::UserId.eq(user_id))
            .order_by_desc(ingredients::Column::Name)
            .order_by_desc(ingredients::Column::Id)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find(&self, user_id: i32, id: i32) -> Result<Option<Ingredient>, RecipeServiceError> {
        let model = ingredients::Entity::find_by_id(id)
            .filter(ingredients::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find ingredient")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn rename(
        &self,
        user_id: i32,
        id: i32,
        name: &str,
    ) -> Result<Option<Ingredient>, RecipeServiceError> {
        let Some(model) = ingredients::Entity::find_by_id(id)
            .filter(ingredients::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find ingredient for rename")?
        else {
            return Ok(None);
        };
        if model.name == name {
            return Ok(Some(ingredient_from_model(model)));
        }
        let mut am = model.into_active_model();
        am.name = Set(name.to_owned());
        let model = am.update(&self.db).await.context("rename ingredient")?;
        Ok(Some(ingredient_from_model(model)))
    }

    async fn delete(&self, user_id: i32, id: i32) -> Result<bool, RecipeServiceError> {
        let txn = self.db.begin().await.context("begin delete ingredient")?;
        let owned = ingredients::Entity::find_by_id(id)
            .filter(ingredients::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .context("find ingredient for delete")?
            .is_some();
        if !owned {
            return Ok(false);
        }
        recipe_ingredients::Entity::delete_many()
            .filter(recipe_ingredients::Column::IngredientId.eq(id))
            .exec(&txn)
            .await
            .context("unlink ingredient")?;
        ingredients::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete ingredient")?;
        txn.commit().await.context("commit delete ingredient")?;
        Ok(true)
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
    }
}
