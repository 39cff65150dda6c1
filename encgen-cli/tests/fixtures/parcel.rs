use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Parcel {
    pub id: String,
    #[enc(batch)]
    pub items: Vec<Item>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub sku: String,
    pub name: String,
}
