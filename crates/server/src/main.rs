#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sqlsolver_server::start().await
}
