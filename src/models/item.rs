use std::fmt;

use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::{first_invalid_field, DataValidationError, Document};
use crate::entities::{ItemActiveModel, ItemModel};

const ENTITY: &str = "Item";
const FIELDS: [&str; 4] = ["name", "sku", "description", "quantity"];

/// A product entry belonging to exactly one wishlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub id: Option<i32>,
    pub wishlist_id: i32,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub quantity: String,
}

/// Fields accepted when creating or replacing an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "wishlist_id": 1,
    "name": "Espresso machine",
    "sku": "ESP-0042",
    "description": "Dual boiler, stainless",
    "quantity": "1"
}))]
pub struct ItemPayload {
    pub wishlist_id: i32,
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub name: String,
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub sku: String,
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub description: String,
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub quantity: String,
}

impl ItemPayload {
    pub fn parse(data: &Value) -> Result<Self, DataValidationError> {
        let doc = Document::parse(ENTITY, data)?;
        let payload = Self {
            wishlist_id: doc.integer("wishlist_id")?,
            name: doc.string("name")?,
            sku: doc.string("sku")?,
            description: doc.string("description")?,
            quantity: doc.string("quantity")?,
        };
        payload
            .validate()
            .map_err(|errors| first_invalid_field(ENTITY, &FIELDS, &errors))?;
        Ok(payload)
    }
}

/// Wire representation of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    pub id: Option<i32>,
    pub wishlist_id: i32,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub quantity: String,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serialize(&self) -> ItemResponse {
        ItemResponse {
            id: self.id,
            wishlist_id: self.wishlist_id,
            name: self.name.clone(),
            sku: self.sku.clone(),
            description: self.description.clone(),
            quantity: self.quantity.clone(),
        }
    }

    /// Overwrites every field except `id` from `data`.
    pub fn deserialize(&mut self, data: &Value) -> Result<&mut Self, DataValidationError> {
        let payload = ItemPayload::parse(data)?;
        self.wishlist_id = payload.wishlist_id;
        self.name = payload.name;
        self.sku = payload.sku;
        self.description = payload.description;
        self.quantity = payload.quantity;
        Ok(self)
    }

    pub(crate) fn active_model(&self) -> ItemActiveModel {
        ItemActiveModel {
            id: self.id.map(Set).unwrap_or(NotSet),
            wishlist_id: Set(self.wishlist_id),
            name: Set(self.name.clone()),
            sku: Set(self.sku.clone()),
            description: Set(self.description.clone()),
            quantity: Set(self.quantity.clone()),
        }
    }
}

impl From<ItemModel> for Item {
    fn from(model: ItemModel) -> Self {
        Self {
            id: Some(model.id),
            wishlist_id: model.wishlist_id,
            name: model.name,
            sku: model.sku,
            description: model.description,
            quantity: model.quantity,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Item {} id=[{}]>", self.name, id),
            None => write!(f, "<Item {} id=[None]>", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn espresso() -> Value {
        json!({
            "wishlist_id": 1,
            "name": "Espresso machine",
            "sku": "ESP-0042",
            "description": "Dual boiler, stainless",
            "quantity": "1"
        })
    }

    #[test]
    fn deserialize_reads_every_field() {
        let mut item = Item::new();
        item.deserialize(&espresso()).unwrap();

        assert_eq!(item.id, None);
        assert_eq!(item.wishlist_id, 1);
        assert_eq!(item.sku, "ESP-0042");
        assert_eq!(item.quantity, "1");
    }

    #[rstest]
    #[case("wishlist_id")]
    #[case("name")]
    #[case("sku")]
    #[case("description")]
    #[case("quantity")]
    fn deserialize_reports_missing_field(#[case] field: &'static str) {
        let mut data = espresso();
        data.as_object_mut().unwrap().remove(field);

        let err = Item::new().deserialize(&data).unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid Item: missing {}", field));
    }

    #[test]
    fn quantity_must_be_text() {
        let mut data = espresso();
        data["quantity"] = json!(2);
        let err = Item::new().deserialize(&data).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Item: quantity must be a string");
    }

    #[test]
    fn wishlist_id_must_be_an_integer() {
        let mut data = espresso();
        data["wishlist_id"] = json!("1");
        assert!(matches!(
            Item::new().deserialize(&data),
            Err(DataValidationError::InvalidField {
                field: "wishlist_id",
                ..
            })
        ));
    }

    #[test]
    fn body_must_be_an_object() {
        let err = Item::new().deserialize(&json!(["sku"])).unwrap_err();
        assert_eq!(err, DataValidationError::BadData { entity: "Item" });
    }

    #[test]
    fn id_in_body_is_ignored() {
        let mut item = Item {
            id: Some(12),
            ..Item::default()
        };
        let mut data = espresso();
        data["id"] = json!(400);
        item.deserialize(&data).unwrap();
        assert_eq!(item.id, Some(12));
    }

    #[test]
    fn oversized_sku_is_rejected() {
        let mut data = espresso();
        data["sku"] = json!("X".repeat(65));
        let err = Item::new().deserialize(&data).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Item: sku must be at most 64 characters");
    }

    #[test]
    fn serialize_exposes_all_columns() {
        let mut item = Item::new();
        item.deserialize(&espresso()).unwrap();
        item.id = Some(3);

        let wire = serde_json::to_value(item.serialize()).unwrap();
        assert_eq!(wire["id"], json!(3));
        assert_eq!(wire["wishlist_id"], json!(1));
        assert_eq!(wire["description"], json!("Dual boiler, stainless"));
    }
}
