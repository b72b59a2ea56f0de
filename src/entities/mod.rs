pub mod item;
pub mod wishlist;

pub use item::{
    ActiveModel as ItemActiveModel, Column as ItemColumn, Entity as ItemEntity,
    Model as ItemModel,
};
pub use wishlist::{
    ActiveModel as WishlistActiveModel, Column as WishlistColumn, Entity as WishlistEntity,
    Model as WishlistModel,
};
