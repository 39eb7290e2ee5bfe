use relay::{ClientSender, RelayClient};
use relay_chat::{forward_lines, init_tracing, parse_or_exit, ClientArgs};

/// Reads stdin lines on a plain OS thread and posts each one to the
/// client's writer task. Blocking on the terminal here never stalls the
/// runtime that is receiving messages.
fn spawn_input_thread(sender: ClientSender) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        forward_lines(std::io::stdin().lock(), &sender);
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: ClientArgs = parse_or_exit();
    init_tracing();

    let mut client = RelayClient::connect(&args.server_addr()).await?;
    tracing::info!(server = %args.server_addr(), "connected; type a line to send it");

    // Detached: it exits with the process, possibly mid-read.
    let _input = spawn_input_thread(client.sender());

    while let Some(message) = client.recv().await {
        println!("{}", message.text());
    }

    tracing::info!("server closed the connection");
    Ok(())
}
