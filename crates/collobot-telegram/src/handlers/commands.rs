use std::sync::Arc;

use teloxide::prelude::*;

use collobot_core::{
    domain::{ChatId, UserId},
    menu,
};

use crate::router::AppState;

pub(super) enum StartScreen {
    /// Catalog not available yet; show the please-wait text.
    Pending,
    Menu(menu::Screen),
}

/// Reloads the catalog and renders the landing screen.
///
/// The catalog is reloaded on every session start (and on every return to
/// the category list), so a file dropped in by the upstream pipeline is
/// picked up without restarting the bot.
pub(super) async fn start_screen(
    state: &AppState,
    user_id: UserId,
    user_name: &str,
) -> StartScreen {
    let reload = {
        let mut catalog = state.catalog.write().await;
        match state.cfg.catalog_url.as_deref() {
            Some(url) => catalog.reload_from_url(url).await,
            None => catalog.reload_from_file(&state.cfg.catalog_file),
        }
    };
    if let Err(e) = reload {
        tracing::warn!(error = %e, "catalog reload failed, keeping empty snapshot");
    }

    let catalog = state.catalog.read().await;
    let snapshot = catalog.snapshot();
    if snapshot.is_empty() {
        return StartScreen::Pending;
    }

    let selected = state.selections.lock().await.count(user_id);
    StartScreen::Menu(menu::category_list(snapshot, user_name, selected))
}

fn parse_command(text: &str) -> String {
    // Telegram may send `/cmd@botname arg1 ...`
    text.trim()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };

    if parse_command(msg.text().unwrap_or("")) != "start" {
        return Ok(());
    }

    let chat_id = ChatId(msg.chat.id.0);
    let user_id = UserId(user.id.0 as i64);
    let user_name = user.first_name.clone();

    match start_screen(&state, user_id, &user_name).await {
        StartScreen::Pending => {
            let _ = state
                .messenger
                .send_text(chat_id, menu::catalog_pending())
                .await;
        }
        StartScreen::Menu(screen) => {
            let _ = state
                .messenger
                .send_menu(chat_id, &screen.text, screen.keyboard)
                .await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parsing_strips_bot_mention_and_args() {
        assert_eq!(parse_command("/start"), "start");
        assert_eq!(parse_command("/start@collobot extra"), "start");
        assert_eq!(parse_command("  /START  "), "start");
        assert_eq!(parse_command("/help"), "help");
    }
}
