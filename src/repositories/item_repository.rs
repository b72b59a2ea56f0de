use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::{ItemColumn, ItemEntity};
use crate::errors::ServiceError;
use crate::models::Item;
use crate::repositories::Repository;

use super::wishlist_repository::wishlist_not_found;
use super::BaseRepository;

pub(crate) fn item_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Item with id '{}' was not found.", id))
}

/// A write that trips the items -> wishlists foreign key names a missing wishlist.
fn map_write_error(err: DbErr, item: &Item) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => wishlist_not_found(item.wishlist_id),
        _ => match err {
            DbErr::RecordNotUpdated => item.id.map_or_else(
                || ServiceError::InvalidOperation("Item has no id".into()),
                item_not_found,
            ),
            other => ServiceError::DatabaseError(other),
        },
    }
}

/// Persistence for items addressed on their own or within a wishlist
#[derive(Debug, Clone)]
pub struct ItemRepository {
    base: BaseRepository,
}

impl ItemRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Inserts `item` under its `wishlist_id`, assigning a fresh id.
    #[instrument(skip(self, item), fields(wishlist_id = item.wishlist_id))]
    pub async fn create(&self, item: &mut Item) -> Result<(), ServiceError> {
        info!("Creating {}", item.name);
        item.id = None;

        let model = item
            .active_model()
            .insert(self.base.get_db())
            .await
            .map_err(|e| map_write_error(e, item))?;
        item.id = Some(model.id);

        Ok(())
    }

    #[instrument(skip(self, item), fields(item_id = ?item.id))]
    pub async fn save(&self, item: &mut Item) -> Result<(), ServiceError> {
        info!("Saving {}", item.name);
        if item.id.is_none() {
            return Err(ServiceError::InvalidOperation(
                "Cannot save an Item that was never created".into(),
            ));
        }

        let model = item
            .active_model()
            .update(self.base.get_db())
            .await
            .map_err(|e| map_write_error(e, item))?;
        *item = Item::from(model);

        Ok(())
    }

    #[instrument(skip(self, item), fields(item_id = ?item.id))]
    pub async fn delete(&self, item: &Item) -> Result<(), ServiceError> {
        info!("Deleting {}", item.name);
        let id = item.id.ok_or_else(|| {
            ServiceError::InvalidOperation("Cannot delete an Item that was never created".into())
        })?;

        ItemEntity::delete_by_id(id)
            .exec(self.base.get_db())
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn all(&self) -> Result<Vec<Item>, ServiceError> {
        info!("Processing all Items");
        let models = ItemEntity::find()
            .order_by_asc(ItemColumn::Id)
            .all(self.base.get_db())
            .await?;
        Ok(models.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn find(&self, id: i32) -> Result<Option<Item>, ServiceError> {
        let model = ItemEntity::find_by_id(id).one(self.base.get_db()).await?;
        Ok(model.map(Item::from))
    }

    pub async fn find_or_404(&self, id: i32) -> Result<Item, ServiceError> {
        self.find(id).await?.ok_or_else(|| item_not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Item>, ServiceError> {
        info!("Processing name query for {}", name);
        let models = ItemEntity::find()
            .filter(ItemColumn::Name.eq(name))
            .order_by_asc(ItemColumn::Id)
            .all(self.base.get_db())
            .await?;
        Ok(models.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn find_by_wishlist(&self, wishlist_id: i32) -> Result<Vec<Item>, ServiceError> {
        let models = ItemEntity::find()
            .filter(ItemColumn::WishlistId.eq(wishlist_id))
            .order_by_asc(ItemColumn::Id)
            .all(self.base.get_db())
            .await?;
        Ok(models.into_iter().map(Item::from).collect())
    }

    /// Looks up an item only if it belongs to `wishlist_id`.
    #[instrument(skip(self))]
    pub async fn find_in_wishlist(
        &self,
        wishlist_id: i32,
        item_id: i32,
    ) -> Result<Option<Item>, ServiceError> {
        let model = ItemEntity::find_by_id(item_id)
            .filter(ItemColumn::WishlistId.eq(wishlist_id))
            .one(self.base.get_db())
            .await?;
        Ok(model.map(Item::from))
    }

    pub async fn find_in_wishlist_or_404(
        &self,
        wishlist_id: i32,
        item_id: i32,
    ) -> Result<Item, ServiceError> {
        self.find_in_wishlist(wishlist_id, item_id)
            .await?
            .ok_or_else(|| item_not_found(item_id))
    }
}

impl Repository for ItemRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
