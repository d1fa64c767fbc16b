#[tokio::main]
async fn main() -> std::io::Result<()> {
    ship_battle_server::frameworks::server::run_with_config().await
}
