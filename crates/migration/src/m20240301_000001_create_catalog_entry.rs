//! Create `catalog_entry` table.
//!
//! Reference data describing installable service types. `slug` is not
//! unique: append-mode seeding writes duplicate rows.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CatalogEntry::Table)
                    .if_not_exists()
                    .col(uuid(CatalogEntry::Id).primary_key())
                    .col(string_len(CatalogEntry::Name, 128).not_null())
                    .col(string_len(CatalogEntry::Slug, 64).not_null())
                    .col(text(CatalogEntry::Description).not_null())
                    .col(string_len(CatalogEntry::Image, 256).not_null())
                    .col(string_len(CatalogEntry::Tag, 64).not_null())
                    .col(timestamp_with_time_zone(CatalogEntry::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CatalogEntry::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CatalogEntry { Table, Id, Name, Slug, Description, Image, Tag, CreatedAt }
