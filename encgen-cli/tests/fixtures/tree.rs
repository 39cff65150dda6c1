use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub value: u32,
    pub children: Vec<Node>,
    pub meta: Option<Box<Meta>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub owner: Option<Box<Node>>,
    pub note: String,
}
