use std::fmt;

use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::{first_invalid_field, DataValidationError, Document, Item};
use crate::entities::{ItemModel, WishlistActiveModel, WishlistModel};

const ENTITY: &str = "Wishlist";
const FIELDS: [&str; 5] = ["name", "email", "shared_with1", "shared_with2", "shared_with3"];

/// A named wishlist owned by an email address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    /// Assigned by the database on create; `None` until then.
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub shared_with1: String,
    pub shared_with2: String,
    pub shared_with3: String,
    pub shared: bool,
    /// Items loaded with, or appended to, this wishlist.
    pub items: Vec<Item>,
    /// Items as last read from or written to the database.
    stored_items: Vec<Item>,
}

/// Fields accepted when creating or replacing a wishlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Rudi's wishlist",
    "email": "rudi@stern.nyu.edu",
    "shared_with1": "Rebecca Dailey",
    "shared_with2": "Jake Cerzanni",
    "shared_with3": "Ina Rudin"
}))]
pub struct WishlistPayload {
    #[validate(length(max = 63, message = "must be at most 63 characters"))]
    pub name: String,
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub email: String,
    #[validate(length(max = 63, message = "must be at most 63 characters"))]
    pub shared_with1: String,
    #[validate(length(max = 63, message = "must be at most 63 characters"))]
    pub shared_with2: String,
    #[validate(length(max = 63, message = "must be at most 63 characters"))]
    pub shared_with3: String,
}

impl WishlistPayload {
    /// Typed parse of an untrusted document. Unknown keys are ignored.
    pub fn parse(data: &Value) -> Result<Self, DataValidationError> {
        let doc = Document::parse(ENTITY, data)?;
        let payload = Self {
            name: doc.string("name")?,
            email: doc.string("email")?,
            shared_with1: doc.string("shared_with1")?,
            shared_with2: doc.string("shared_with2")?,
            shared_with3: doc.string("shared_with3")?,
        };
        payload
            .validate()
            .map_err(|errors| first_invalid_field(ENTITY, &FIELDS, &errors))?;
        Ok(payload)
    }
}

/// Wire representation of a wishlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "name": "Rudi's wishlist",
    "email": "rudi@stern.nyu.edu",
    "shared_with1": "Rebecca Dailey",
    "shared_with2": "Jake Cerzanni",
    "shared_with3": "Ina Rudin",
    "shared": false
}))]
pub struct WishlistResponse {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub shared_with1: String,
    pub shared_with2: String,
    pub shared_with3: String,
    pub shared: bool,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serialize(&self) -> WishlistResponse {
        WishlistResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            shared_with1: self.shared_with1.clone(),
            shared_with2: self.shared_with2.clone(),
            shared_with3: self.shared_with3.clone(),
            shared: self.shared,
        }
    }

    /// Overwrites the user-editable fields from `data`.
    ///
    /// `id` and `shared` are never read from the document. On error the
    /// wishlist is left untouched.
    pub fn deserialize(&mut self, data: &Value) -> Result<&mut Self, DataValidationError> {
        let payload = WishlistPayload::parse(data)?;
        self.apply(payload);
        Ok(self)
    }

    pub fn apply(&mut self, payload: WishlistPayload) -> &mut Self {
        self.name = payload.name;
        self.email = payload.email;
        self.shared_with1 = payload.shared_with1;
        self.shared_with2 = payload.shared_with2;
        self.shared_with3 = payload.shared_with3;
        self
    }

    /// Flips the shared flag and returns the new value.
    pub fn toggle_shared(&mut self) -> bool {
        self.shared = !self.shared;
        self.shared
    }

    /// Appends an item, pointing it at this wishlist. Persisted on the next save.
    pub fn add_item(&mut self, mut item: Item) -> &Item {
        if let Some(id) = self.id {
            item.wishlist_id = id;
        }
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    pub fn from_model(model: WishlistModel, items: Vec<ItemModel>) -> Self {
        let items: Vec<Item> = items.into_iter().map(Item::from).collect();
        Self {
            id: Some(model.id),
            name: model.name,
            email: model.email,
            shared_with1: model.shared_with1,
            shared_with2: model.shared_with2,
            shared_with3: model.shared_with3,
            shared: model.shared,
            stored_items: items.clone(),
            items,
        }
    }

    /// Positions of items that are new or differ from their stored row.
    pub(crate) fn pending_items(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.id.is_none()
                    || !self
                        .stored_items
                        .iter()
                        .any(|stored| stored.id == item.id && stored == *item)
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Records a committed write: the wishlist id, ids of freshly inserted
    /// items (by position) and the new stored state of every item.
    pub(crate) fn mark_stored(&mut self, id: i32, inserted: Vec<(usize, i32)>) {
        self.id = Some(id);
        for (index, item_id) in inserted {
            if let Some(item) = self.items.get_mut(index) {
                item.id = Some(item_id);
            }
        }
        for item in &mut self.items {
            item.wishlist_id = id;
        }
        self.stored_items = self.items.clone();
    }

    pub(crate) fn active_model(&self) -> WishlistActiveModel {
        WishlistActiveModel {
            id: self.id.map(Set).unwrap_or(NotSet),
            name: Set(self.name.clone()),
            email: Set(self.email.clone()),
            shared_with1: Set(self.shared_with1.clone()),
            shared_with2: Set(self.shared_with2.clone()),
            shared_with3: Set(self.shared_with3.clone()),
            shared: Set(self.shared),
        }
    }
}

impl From<WishlistModel> for Wishlist {
    fn from(model: WishlistModel) -> Self {
        Self::from_model(model, Vec::new())
    }
}

impl fmt::Display for Wishlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Wishlist {} id=[{}]>", self.name, id),
            None => write!(f, "<Wishlist {} id=[None]>", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn rudi() -> Value {
        json!({
            "name": "Rudi's wishlist",
            "email": "rudi@stern.nyu.edu",
            "shared_with1": "Rebecca Dailey",
            "shared_with2": "Jake Cerzanni",
            "shared_with3": "Ina Rudin"
        })
    }

    #[test]
    fn deserialize_populates_user_fields() {
        let mut wishlist = Wishlist::new();
        wishlist.deserialize(&rudi()).unwrap();

        assert_eq!(wishlist.id, None);
        assert_eq!(wishlist.name, "Rudi's wishlist");
        assert_eq!(wishlist.email, "rudi@stern.nyu.edu");
        assert_eq!(wishlist.shared_with3, "Ina Rudin");
        assert!(!wishlist.shared);
    }

    #[rstest]
    #[case("name")]
    #[case("email")]
    #[case("shared_with1")]
    #[case("shared_with2")]
    #[case("shared_with3")]
    fn deserialize_reports_missing_field(#[case] field: &'static str) {
        let mut data = rudi();
        data.as_object_mut().unwrap().remove(field);

        let err = Wishlist::new().deserialize(&data).unwrap_err();
        assert_eq!(
            err,
            DataValidationError::MissingField {
                entity: "Wishlist",
                field
            }
        );
    }

    #[test]
    fn deserialize_ignores_id_and_shared() {
        let mut wishlist = Wishlist {
            id: Some(9),
            shared: true,
            ..Wishlist::default()
        };
        let mut data = rudi();
        data["id"] = json!(1234);
        data["shared"] = json!(false);

        wishlist.deserialize(&data).unwrap();
        assert_eq!(wishlist.id, Some(9));
        assert!(wishlist.shared);
    }

    #[test]
    fn failed_deserialize_leaves_wishlist_unchanged() {
        let mut wishlist = Wishlist::new();
        wishlist.deserialize(&rudi()).unwrap();
        let before = wishlist.clone();

        let mut data = rudi();
        data["name"] = json!("changed");
        data.as_object_mut().unwrap().remove("shared_with3");

        assert!(wishlist.deserialize(&data).is_err());
        assert_eq!(wishlist, before);
    }

    #[test]
    fn non_string_values_are_rejected() {
        let mut data = rudi();
        data["email"] = Value::Null;
        let err = Wishlist::new().deserialize(&data).unwrap_err();
        assert!(matches!(
            err,
            DataValidationError::InvalidField { field: "email", .. }
        ));
    }

    #[test]
    fn oversized_fields_are_rejected() {
        let mut data = rudi();
        data["email"] = json!(format!("{}@example.com", "a".repeat(30)));
        let err = Wishlist::new().deserialize(&data).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Wishlist: email must be at most 32 characters"
        );
    }

    #[test]
    fn serialize_round_trips_through_deserialize() {
        let mut original = Wishlist::new();
        original.deserialize(&rudi()).unwrap();
        original.id = Some(3);
        original.toggle_shared();

        let wire = serde_json::to_value(original.serialize()).unwrap();
        let mut copy = original.clone();
        copy.deserialize(&wire).unwrap();

        assert_eq!(copy.serialize(), original.serialize());
        assert_eq!(wire["shared"], json!(true));
    }

    #[test]
    fn toggle_shared_flips_twice_back_to_start() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.toggle_shared());
        assert!(!wishlist.toggle_shared());
    }

    #[test]
    fn add_item_points_item_at_wishlist() {
        let mut wishlist = Wishlist {
            id: Some(5),
            ..Wishlist::default()
        };
        let item = Item {
            wishlist_id: 99,
            ..Item::default()
        };
        assert_eq!(wishlist.add_item(item).wishlist_id, 5);
        assert_eq!(wishlist.items.len(), 1);
    }

    #[test]
    fn only_new_or_changed_items_are_pending() {
        let mut wishlist = Wishlist::new();
        wishlist.add_item(Item {
            name: "Rake".into(),
            ..Item::default()
        });
        wishlist.add_item(Item {
            name: "Hose".into(),
            ..Item::default()
        });
        assert_eq!(wishlist.pending_items(), vec![0, 1]);

        wishlist.mark_stored(4, vec![(0, 10), (1, 11)]);
        assert!(wishlist.pending_items().is_empty());
        assert_eq!(wishlist.items[1].id, Some(11));
        assert_eq!(wishlist.items[1].wishlist_id, 4);

        wishlist.items[1].quantity = "3".into();
        wishlist.add_item(Item::default());
        assert_eq!(wishlist.pending_items(), vec![1, 2]);
    }

    #[test]
    fn display_includes_name_and_id() {
        let wishlist = Wishlist {
            id: Some(1),
            name: "Birthday".into(),
            ..Wishlist::default()
        };
        assert_eq!(wishlist.to_string(), "<Wishlist Birthday id=[1]>");
    }
}
