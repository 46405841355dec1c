use anyhow::Context;
use oidc_plugin::{bridge, AuthenticationResult, OidcPlugin};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default filter if RUST_LOG is not set
            "info".into()
        }))
        .init();

    tracing::info!("Checking OIDC plugin configuration");
    let payload = match OidcPlugin::from_env() {
        Ok(plugin) => plugin.prepare_payload(),
        Err(error) => bridge::result_payload(&AuthenticationResult::from_error(error, None)),
    };

    let rendered = serde_json::to_string_pretty(&payload)
        .with_context(|| "Failed to render bridge payload")?;
    println!("{}", rendered);
    Ok(())
}
