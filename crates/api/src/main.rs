use std::sync::Arc;

use anyhow::Context;

use catalog_api::app::{self, AppServices};
use catalog_api::settings::Settings;
use catalog_auth::Scope;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let settings = Settings::from_env().context("invalid configuration")?;
    tracing::info!(?settings, "configuration loaded");

    let services = Arc::new(match settings.database_url.as_deref() {
        Some(url) => AppServices::postgres(&settings.auth, url).await?,
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            AppServices::in_memory(&settings.auth)?
        }
    });

    if let Some(user) = settings.bootstrap_user.clone() {
        let services = services.clone();
        tokio::task::spawn_blocking(move || {
            services.register_principal(&user.identifier, &user.password, [Scope::ACTIVE])
        })
        .await
        .context("bootstrap task panicked")??;
    }

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
