use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rebundle::{BundleConfig, rebuild_bundle};

#[derive(Parser, Debug)]
#[command(
    name = "rebundle",
    version,
    about = "Rebuild a TLS trust bundle for a host whose chain is missing its intermediate"
)]
struct Cli {
    /// Target host presenting the incomplete chain
    host: String,
    #[arg(long, default_value_t = 443)]
    port: u16,
    #[arg(long, default_value = ".cert_work", help = "Directory for intermediate artifacts")]
    work_dir: PathBuf,
    #[arg(long, default_value_t = 10, help = "TCP connect and handshake timeout in seconds")]
    connect_timeout: u64,
    #[arg(long, default_value_t = 15, help = "Issuer download timeout in seconds")]
    http_timeout: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = BundleConfig::new(cli.host, cli.port);
    config.work_dir = cli.work_dir;
    config.connect_timeout = Duration::from_secs(cli.connect_timeout);
    config.io_timeout = config.connect_timeout;
    config.http_timeout = Duration::from_secs(cli.http_timeout);

    match rebuild_bundle(&config) {
        Ok(path) => {
            println!("Bundle ready: {}", path.display());
            println!(
                "Use it as a custom CA file, e.g.: curl --cacert {} https://{}/",
                path.display(),
                config.host
            );
            println!(
                "Or hand it to another TLS stack: export NODE_EXTRA_CA_CERTS={}",
                path.display()
            );
            Ok(())
        }
        Err(err) => Err(anyhow::anyhow!("{} stage failed: {err}", err.stage())),
    }
}
