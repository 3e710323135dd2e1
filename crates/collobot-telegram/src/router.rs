use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::{Mutex, RwLock};

use collobot_core::{
    catalog::CatalogStore, config::Config, export::Exporter, messaging::port::MessagingPort,
    selection::SelectionStore,
};

use crate::handlers;
use crate::TelegramMessenger;

/// Shared handler state.
///
/// Teloxide runs handlers concurrently, so the catalog snapshot and the
/// selection map sit behind explicit locks rather than relying on
/// serialized delivery.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub catalog: Arc<RwLock<CatalogStore>>,
    pub selections: Arc<Mutex<SelectionStore>>,
    pub exporter: Arc<Exporter>,
    pub messenger: Arc<dyn MessagingPort>,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        tracing::info!(username = me.username(), "collocations bot started");
    }
    tracing::info!(
        catalog = %cfg.catalog_file.display(),
        cards = %cfg.cards_dir.display(),
        "waiting for catalog data from the upstream pipeline"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        catalog: Arc::new(RwLock::new(CatalogStore::default())),
        selections: Arc::new(Mutex::new(SelectionStore::default())),
        exporter: Arc::new(Exporter::new(
            cfg.cards_dir.clone(),
            cfg.output_dir.clone(),
        )),
        messenger,
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
