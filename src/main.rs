//! Pet-care API server
//!
//! Reads its configuration from the YAML file named by `PETCARE_CONFIG`
//! (built-in defaults otherwise). Log filtering follows `RUST_LOG`.

use anyhow::Result;
use petcare::config::ApiConfig;
use petcare::server::ServerBuilder;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG_ENV: &str = "PETCARE_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            tracing::info!(path = %path, "loading configuration");
            ApiConfig::from_yaml_file(&path)?
        }
        Err(_) => ApiConfig::default_config(),
    };
    let addr = config.bind_address();

    println!("\n🐾 Pet-care API server");
    println!("🌐 http://{}", addr);
    println!("\n📚 Resources:");
    for kind in petcare::core::EntityKind::ALL {
        println!("  /{}/", kind.plural());
        if kind.is_pet_scoped() {
            println!("  /pets/{{pet_id}}/{}/", kind.plural());
        }
    }
    println!();

    ServerBuilder::new().with_config(config).serve(&addr).await
}
