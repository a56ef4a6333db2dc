// comptoir-client/examples/dashboard.rs
// Loads the catalog, prints sales/purchase aggregates, then follows
// realtime product changes until Ctrl-C.

use comptoir_client::report;
use comptoir_client::{BackendConfig, ComptoirClient};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = BackendConfig::from_env();
    let client = ComptoirClient::new(config)?;

    let (_, sales, purchases) = tokio::try_join!(
        client.load_products(),
        client.sales_history(),
        client.purchase_history(),
    )?;
    let products = client.store().products.snapshot();

    println!("{} produits en stock", products.len());
    println!("Chiffre d'affaires total : {}", report::revenue_total(&sales));
    println!("Dépenses fournisseurs    : {}", report::expense_total(&purchases));

    let summary = report::margin(&purchases, &products);
    println!("Marge estimée            : {}", summary.margin);

    for rollup in report::sales_by_product(&sales).iter().take(5) {
        println!("  {:<30} {:>6} vendus  {:>10}", rollup.name, rollup.quantity, rollup.revenue);
    }

    // Watch the product store while the synchronizer applies remote changes.
    let mut subscription = client.store().products.subscribe();
    let cancel = CancellationToken::new();
    let _sync = client.start_realtime(cancel.clone()).await?;

    tokio::spawn(async move {
        while let Some(snapshot) = subscription.recv().await {
            tracing::info!(products = snapshot.len(), "product store updated");
        }
    });

    tokio::signal::ctrl_c().await?;
    cancel.cancel();
    Ok(())
}
