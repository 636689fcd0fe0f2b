use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use remscope::hello::host_identity;
use remscope::server::{DEFAULT_PORT, greet_client};

#[derive(Parser)]
#[command(name = "remscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Remote storage inspection handshake server")]
struct Cli {
    /// Address to bind the listener to.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,

    /// TCP port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Serve a single client, then exit.
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    info!("Remscope Remote Server {}", env!("CARGO_PKG_VERSION"));

    let identity = host_identity().context("Failed to query host identity")?;
    info!(
        "Running under {} {} ({})",
        identity.sysname, identity.release, identity.machine
    );

    let addr = SocketAddr::new(cli.bind, cli.port);
    let listener = TcpListener::bind(addr).with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", listener.local_addr()?);

    loop {
        let (mut stream, peer) = match listener.accept() {
            Ok(connection) => connection,
            Err(err) => {
                error!("Failed to accept incoming connection: {err}");
                continue;
            }
        };

        info!("Client {peer} connected");

        match greet_client(&mut stream) {
            Ok(()) => info!("Client {peer} greeted"),
            Err(err) => error!("Failed to greet client {peer}: {err}"),
        }

        drop(stream);

        if cli.once {
            break;
        }
    }

    Ok(())
}
