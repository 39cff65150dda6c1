use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub id: String,
    #[serde(rename = "label")]
    pub name: String,
}
