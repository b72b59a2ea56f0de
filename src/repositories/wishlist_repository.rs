use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Select, TransactionTrait,
};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::entities::{ItemColumn, ItemEntity, WishlistColumn, WishlistEntity};
use crate::errors::ServiceError;
use crate::models::{Item, Wishlist};
use crate::repositories::Repository;

use super::item_repository::item_not_found;
use super::BaseRepository;

pub(crate) fn wishlist_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Wishlist with id '{}' was not found.", id))
}

/// Persistence for wishlists and the items they hold
#[derive(Debug, Clone)]
pub struct WishlistRepository {
    base: BaseRepository,
}

impl WishlistRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Inserts `wishlist` and any items it holds, assigning fresh ids.
    ///
    /// A caller-supplied id is discarded first.
    #[instrument(skip(self, wishlist), fields(name = %wishlist.name))]
    pub async fn create(&self, wishlist: &mut Wishlist) -> Result<(), ServiceError> {
        info!("Creating {}", wishlist.name);
        wishlist.id = None;

        let txn = self.base.get_db().begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for wishlist creation");
            ServiceError::DatabaseError(e)
        })?;

        let model = wishlist.active_model().insert(&txn).await?;
        let every_item: Vec<usize> = (0..wishlist.items.len()).collect();
        let inserted = persist_items(&txn, model.id, &wishlist.items, every_item).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, wishlist_id = model.id, "Failed to commit wishlist creation");
            ServiceError::DatabaseError(e)
        })?;

        wishlist.mark_stored(model.id, inserted);
        Ok(())
    }

    /// Writes the wishlist's current field values, inserts newly added items
    /// and updates only the held items changed since they were loaded.
    #[instrument(skip(self, wishlist), fields(wishlist_id = ?wishlist.id))]
    pub async fn save(&self, wishlist: &mut Wishlist) -> Result<(), ServiceError> {
        info!("Saving {}", wishlist.name);
        let id = wishlist.id.ok_or_else(|| {
            ServiceError::InvalidOperation("Cannot save a Wishlist that was never created".into())
        })?;

        let txn = self.base.get_db().begin().await.map_err(|e| {
            error!(error = %e, wishlist_id = id, "Failed to start transaction for wishlist update");
            ServiceError::DatabaseError(e)
        })?;

        wishlist
            .active_model()
            .update(&txn)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => wishlist_not_found(id),
                other => ServiceError::DatabaseError(other),
            })?;
        let inserted =
            persist_items(&txn, id, &wishlist.items, wishlist.pending_items()).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, wishlist_id = id, "Failed to commit wishlist update");
            ServiceError::DatabaseError(e)
        })?;

        wishlist.mark_stored(id, inserted);
        Ok(())
    }

    /// Removes the wishlist together with its items.
    #[instrument(skip(self, wishlist), fields(wishlist_id = ?wishlist.id))]
    pub async fn delete(&self, wishlist: &Wishlist) -> Result<(), ServiceError> {
        info!("Deleting {}", wishlist.name);
        let id = wishlist.id.ok_or_else(|| {
            ServiceError::InvalidOperation("Cannot delete a Wishlist that was never created".into())
        })?;

        let txn = self.base.get_db().begin().await?;
        ItemEntity::delete_many()
            .filter(ItemColumn::WishlistId.eq(id))
            .exec(&txn)
            .await?;
        WishlistEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Removes every wishlist and item. Returns the number of wishlists removed.
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<u64, ServiceError> {
        info!("Removing all wishlists");
        let txn = self.base.get_db().begin().await?;
        ItemEntity::delete_many().exec(&txn).await?;
        let result = WishlistEntity::delete_many().exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected)
    }

    #[instrument(skip(self))]
    pub async fn all(&self) -> Result<Vec<Wishlist>, ServiceError> {
        info!("Processing all Wishlists");
        self.load(WishlistEntity::find()).await
    }

    #[instrument(skip(self))]
    pub async fn find(&self, id: i32) -> Result<Option<Wishlist>, ServiceError> {
        info!("Processing lookup for id {}", id);
        let mut found = self
            .load(WishlistEntity::find().filter(WishlistColumn::Id.eq(id)))
            .await?;
        Ok(found.pop())
    }

    pub async fn find_or_404(&self, id: i32) -> Result<Wishlist, ServiceError> {
        self.find(id).await?.ok_or_else(|| wishlist_not_found(id))
    }

    /// Wishlists whose name equals `name` exactly.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Wishlist>, ServiceError> {
        info!("Processing name query for {}", name);
        self.load(WishlistEntity::find().filter(WishlistColumn::Name.eq(name)))
            .await
    }

    /// Wishlists owned by `email` (exact match).
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Vec<Wishlist>, ServiceError> {
        info!("Processing email query for {}", email);
        self.load(WishlistEntity::find().filter(WishlistColumn::Email.eq(email)))
            .await
    }

    async fn load(&self, select: Select<WishlistEntity>) -> Result<Vec<Wishlist>, ServiceError> {
        let rows = select
            .order_by_asc(WishlistColumn::Id)
            .find_with_related(ItemEntity)
            .order_by_asc(ItemColumn::Id)
            .all(self.base.get_db())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(wishlist, items)| Wishlist::from_model(wishlist, items))
            .collect())
    }
}

impl Repository for WishlistRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}

/// Writes `items[index]` for each index, pointed at `wishlist_id`.
///
/// Returns `(index, id)` for rows that were inserted.
async fn persist_items<C>(
    conn: &C,
    wishlist_id: i32,
    items: &[Item],
    indices: Vec<usize>,
) -> Result<Vec<(usize, i32)>, ServiceError>
where
    C: ConnectionTrait,
{
    let mut inserted = Vec::new();
    for index in indices {
        let Some(item) = items.get(index) else {
            continue;
        };
        let mut row = item.clone();
        row.wishlist_id = wishlist_id;
        match row.id {
            None => {
                let model = row.active_model().insert(conn).await?;
                inserted.push((index, model.id));
            }
            Some(item_id) => {
                row.active_model()
                    .update(conn)
                    .await
                    .map_err(|e| match e {
                        DbErr::RecordNotUpdated => item_not_found(item_id),
                        other => ServiceError::DatabaseError(other),
                    })?;
            }
        }
    }
    Ok(inserted)
}
