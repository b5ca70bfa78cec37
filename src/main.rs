//! Diagnostic entrypoint: hydrates the cart from local storage, runs one
//! sync pass against the backend, and persists the result. Useful for
//! checking a deployment's configuration, storage, and connectivity without
//! a UI in front of the crate.

use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use storefront_client::api::Connection;
use storefront_client::config;
use storefront_client::core::persistence;
use storefront_client::core::store::CartStore;
use storefront_client::core::sync::CartSync;
use storefront_client::errors::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;
    info!("Configuration loaded, backend at {}", app_config.api.base_url);

    // 4. Initialize local storage
    let db = config::database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Storage initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize storage: {e}"))?;
    config::database::create_tables(&db).await?;

    // 5. Hydrate the cart store from the persisted snapshot; the UI would
    // render this immediately while the sync below is still in flight
    let mut store = CartStore::new();
    let persisted = persistence::load_cart_from_storage(&db).await;
    store.init_user_cart(Some(persisted), None);
    info!(
        "Hydrated {} cart(s) holding {} item(s) from storage",
        store.store_count(),
        store.count()
    );

    // 6. Reconcile against the server's cart list
    let conn = Connection::new(&app_config.api, db.clone())?;
    let mut sync = CartSync::new();
    match sync.run(&conn, &mut store).await {
        Ok(outcome) => info!(?outcome, "Cart sync finished"),
        Err(e) if e.is_retryable() => {
            warn!("Cart sync failed, keeping local snapshot (retryable): {e}");
        }
        Err(e) => error!("Cart sync failed, keeping local snapshot: {e}"),
    }

    // 7. Persist whatever the store holds now
    persistence::save_cart_to_storage(&db, &store.carts()).await;

    for cart in store.carts() {
        info!(
            "{}: {} line(s), {} unit(s)",
            cart.store_name,
            cart.items.len(),
            cart.total_quantity()
        );
    }

    Ok(())
}
