use std::sync::Arc;

use collobot_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), collobot_core::Error> {
    collobot_core::logging::init("collobot");

    // Fail fast on missing BOT_TOKEN; everything else has defaults.
    let cfg = Arc::new(Config::load()?);

    collobot_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| collobot_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
