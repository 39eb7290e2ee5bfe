use relay::RelayServer;
use relay_chat::{init_tracing, parse_or_exit, ServerArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: ServerArgs = parse_or_exit();
    init_tracing();

    let server = RelayServer::builder().bind(args.bind_addr()).build().await?;
    let addr = server.local_addr()?;
    tracing::info!(%addr, "relay server ready");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to install ctrl-c handler");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}
