pub enum Status {
    Open,
    Closed,
}

pub type ParcelId = String;

pub struct Wrapper(pub u64);

pub struct Marker;

pub struct Page<T> {
    pub items: Vec<T>,
}
