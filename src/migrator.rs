use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_wishlists_table::Migration),
            Box::new(m20240101_000002_create_items_table::Migration),
            Box::new(m20240301_000003_add_shared_to_wishlists::Migration),
        ]
    }
}

/// Schema identifiers shared by the migrations below
#[derive(DeriveIden)]
enum Wishlists {
    Table,
    Id,
    Name,
    Email,
    #[sea_orm(iden = "shared_with1")]
    SharedWith1,
    #[sea_orm(iden = "shared_with2")]
    SharedWith2,
    #[sea_orm(iden = "shared_with3")]
    SharedWith3,
    Shared,
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    WishlistId,
    Name,
    Sku,
    Description,
    Quantity,
}

mod m20240101_000001_create_wishlists_table {
    use super::Wishlists;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_wishlists_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Wishlists::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Wishlists::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Wishlists::Name).string_len(63).not_null())
                        .col(ColumnDef::new(Wishlists::Email).string_len(32).not_null())
                        .col(
                            ColumnDef::new(Wishlists::SharedWith1)
                                .string_len(63)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Wishlists::SharedWith2)
                                .string_len(63)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Wishlists::SharedWith3)
                                .string_len(63)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_wishlists_name")
                        .table(Wishlists::Table)
                        .col(Wishlists::Name)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_wishlists_email")
                        .table(Wishlists::Table)
                        .col(Wishlists::Email)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Wishlists::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000002_create_items_table {
    use super::{Items, Wishlists};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Items::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Items::WishlistId).integer().not_null())
                        .col(ColumnDef::new(Items::Name).string_len(64).not_null())
                        .col(ColumnDef::new(Items::Sku).string_len(64).not_null())
                        .col(ColumnDef::new(Items::Description).string_len(64).not_null())
                        .col(ColumnDef::new(Items::Quantity).string_len(64).not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_wishlist_id")
                                .from(Items::Table, Items::WishlistId)
                                .to(Wishlists::Table, Wishlists::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_items_wishlist_id")
                        .table(Items::Table)
                        .col(Items::WishlistId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000003_add_shared_to_wishlists {
    use super::Wishlists;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_add_shared_to_wishlists"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .alter_table(
                    Table::alter()
                        .table(Wishlists::Table)
                        .add_column(
                            ColumnDef::new(Wishlists::Shared)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .alter_table(
                    Table::alter()
                        .table(Wishlists::Table)
                        .drop_column(Wishlists::Shared)
                        .to_owned(),
                )
                .await
        }
    }
}
