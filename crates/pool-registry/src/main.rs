#[tokio::main]
async fn main() {
    pool_registry::start(std::env::args()).await;
}
