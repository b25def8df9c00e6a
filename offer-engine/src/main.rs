use offer_engine::{
    EngineConfig, OfferEditor, OfferService, RecalcWorker, RedbStore, TextOfferRenderer,
    setup_environment,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env, config, then data dir + logging
    dotenv::dotenv().ok();
    let config = EngineConfig::from_env();
    setup_environment(&config)?;

    tracing::info!(db = %config.db_path().display(), "Offer engine starting...");

    // 2. store + editor
    let store = Arc::new(RedbStore::open(config.db_path())?);
    let editor = Arc::new(Mutex::new(OfferEditor::from_config(&config)));

    // 3. debounced totals
    let shutdown = CancellationToken::new();
    let worker = RecalcWorker::new(Arc::clone(&editor), shutdown.clone()).spawn();

    let service = OfferService::new(store, editor)
        .with_renderer(Arc::new(TextOfferRenderer::from_config(&config)));
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = run(&service, &args).await;

    shutdown.cancel();
    worker.await?;
    result
}

async fn run(service: &OfferService<RedbStore>, args: &[String]) -> anyhow::Result<()> {
    match args {
        [cmd, id, path] if cmd == "export" => {
            let offer_id: i64 = id.parse()?;
            let offer = service.open_offer(offer_id).await?;
            service.export_to(path).await?;
            tracing::info!(offer_id, title = %offer.title, path = %path, "Offer exported");
        }
        [cmd, id] if cmd == "delete" => {
            let offer_id: i64 = id.parse()?;
            service.delete_offer(offer_id).await?;
        }
        [] => {
            service.load_categories().await?;
            for offer in service.list_offers().await? {
                println!("{:>6}  {}", offer.id, offer.title);
            }
        }
        _ => anyhow::bail!("usage: offer-engine [export <offer_id> <path> | delete <offer_id>]"),
    }
    Ok(())
}
