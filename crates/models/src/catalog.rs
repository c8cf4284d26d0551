//! Catalog of installable service types (reference data seeded at bootstrap).
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub tag: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations defined here")
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Catalog entry as written in the seed list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewEntry<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub image: &'a str,
    pub tag: &'a str,
}

pub fn validate_entry(entry: &NewEntry<'_>) -> Result<(), errors::ModelError> {
    if entry.name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    if entry.slug.trim().is_empty() || entry.slug.contains(char::is_whitespace) {
        return Err(errors::ModelError::Validation(format!("invalid slug `{}`", entry.slug)));
    }
    if entry.image.trim().is_empty() { return Err(errors::ModelError::Validation("image required".into())); }
    Ok(())
}

/// Insert a new row. No uniqueness is enforced on `slug`.
pub async fn insert(db: &DatabaseConnection, entry: &NewEntry<'_>) -> Result<Model, errors::ModelError> {
    validate_entry(entry)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(entry.name.to_string()),
        slug: Set(entry.slug.to_string()),
        description: Set(entry.description.to_string()),
        image: Set(entry.image.to_string()),
        tag: Set(entry.tag.to_string()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Rows carrying `slug`, oldest first.
pub async fn find_by_slug(db: &DatabaseConnection, slug: &str) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Slug.eq(slug))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Refresh the descriptive fields of an existing row.
pub async fn update(db: &DatabaseConnection, existing: Model, entry: &NewEntry<'_>) -> Result<Model, errors::ModelError> {
    validate_entry(entry)?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(entry.name.to_string());
    am.description = Set(entry.description.to_string());
    am.image = Set(entry.image.to_string());
    am.tag = Set(entry.tag.to_string());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Tag)
        .order_by_asc(Column::Name)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, errors::ModelError> {
    Entity::find().count(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
