use encgen::Encode;
use serde::Serialize;

/// A shipment whose line items may arrive in pages.
#[derive(Debug, Clone, PartialEq, Serialize, Encode)]
pub struct Parcel {
    pub id: String,
    #[enc(batch)]
    pub items: Vec<Item>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Encode)]
pub struct Item {
    pub sku: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Encode)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// A log event with a keyword field, an encoder-only key override and a
/// batched sequence of plain strings.
#[derive(Debug, Clone, PartialEq, Serialize, Encode)]
pub struct Event {
    pub r#type: String,
    #[enc(rename = "at")]
    pub timestamp: u64,
    #[enc(batch)]
    pub lines: Vec<String>,
    #[enc(skip)]
    #[serde(skip)]
    pub cursor: usize,
}

/// A reply whose `error` field shares its name with the encoder's error state.
#[derive(Debug, Clone, PartialEq, Serialize, Encode)]
pub struct Reply {
    pub code: u16,
    pub error: Option<String>,
    #[enc(batch)]
    pub notes: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Encode)]
pub struct Node {
    pub value: u32,
    pub children: Vec<Self>,
}
