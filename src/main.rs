#[tokio::main]
async fn main() {
    kebab_rating_be::start_server().await;
}
