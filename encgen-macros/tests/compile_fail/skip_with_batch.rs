use encgen_macros::Encode;

#[derive(Encode)]
struct Parcel {
    #[enc(skip, batch)]
    items: Vec<String>,
}

fn main() {}
