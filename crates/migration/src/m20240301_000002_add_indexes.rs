//! Lookup indexes for the catalog. Neither is unique.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_catalog_entry_slug")
                    .table(CatalogEntry::Table)
                    .col(CatalogEntry::Slug)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_catalog_entry_tag")
                    .table(CatalogEntry::Table)
                    .col(CatalogEntry::Tag)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_catalog_entry_tag").table(CatalogEntry::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_catalog_entry_slug").table(CatalogEntry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CatalogEntry { Table, Slug, Tag }
