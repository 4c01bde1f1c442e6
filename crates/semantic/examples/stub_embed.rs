use semantic::{Embedder, StubEmbedder};

#[tokio::main]
async fn main() {
    let embedder = StubEmbedder::new(8);
    for text in ["TESCO STORES  debit -23.400000", "NETFLIX.COM  debit -9.990000"] {
        match embedder.embed(text).await {
            Ok(v) => println!("{text:?} -> {:?}", v.as_slice()),
            Err(err) => eprintln!("embedding failed: {err}"),
        }
    }
}
