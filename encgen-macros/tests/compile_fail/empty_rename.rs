use encgen_macros::Encode;

#[derive(Encode)]
struct Tag {
    #[enc(rename = "")]
    id: String,
}

fn main() {}
