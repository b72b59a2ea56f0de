pub mod common;
pub mod items;
pub mod wishlists;
