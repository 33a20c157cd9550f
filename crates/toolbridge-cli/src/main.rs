#[tokio::main]
async fn main() {
    if toolbridge_cli::run().await.is_err() {
        std::process::exit(1);
    }
}
