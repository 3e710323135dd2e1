use std::sync::Arc;

use teloxide::prelude::*;

use collobot_core::{
    action::Action,
    domain::{ChatId, MessageId, MessageRef, UserId, UserKey},
    menu,
    messaging::types::InlineKeyboard,
};

use crate::router::AppState;

use super::commands::{start_screen, StartScreen};

enum AddOutcome {
    MissingCategory,
    OutOfRange,
    Added(menu::Screen),
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let cb_id = q.id.clone();
    let user = q.from.clone();
    let data = q.data.clone().unwrap_or_default();

    let Some(message) = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    }) else {
        // Message too old for Telegram to reference; just ack.
        let _ = state.messenger.answer_callback(&cb_id, None, false).await;
        return Ok(());
    };

    let user_id = UserId(user.id.0 as i64);
    let user_name = user.first_name.clone();
    tracing::debug!(data = %data, user = %user_name, "callback received");

    let Some(action) = Action::decode(&data) else {
        let _ = state
            .messenger
            .answer_callback(&cb_id, Some("❌ Unknown action"), true)
            .await;
        return Ok(());
    };

    match action {
        Action::OpenCategory(category_id) => {
            let _ = state.messenger.answer_callback(&cb_id, None, false).await;
            show_category(&state, message, &category_id).await;
        }
        Action::AddExpression { category, index } => {
            add_expression(&state, &cb_id, message, user_id, &category, index).await;
        }
        Action::SaveFile => {
            save_selection(&state, &cb_id, message, user_id, &user_name).await;
        }
        Action::ClearSelection => {
            state.selections.lock().await.clear(user_id);
            let _ = state
                .messenger
                .answer_callback(&cb_id, Some("🗑️ Selection cleared!"), true)
                .await;
            show_start(&state, message, user_id, &user_name).await;
        }
        Action::BackToStart => {
            let _ = state.messenger.answer_callback(&cb_id, None, false).await;
            show_start(&state, message, user_id, &user_name).await;
        }
    }

    Ok(())
}

async fn show_start(state: &AppState, message: MessageRef, user_id: UserId, user_name: &str) {
    match start_screen(state, user_id, user_name).await {
        StartScreen::Pending => {
            let _ = state
                .messenger
                .edit_menu(message, menu::catalog_pending(), InlineKeyboard::new(vec![]))
                .await;
        }
        StartScreen::Menu(screen) => {
            let _ = state
                .messenger
                .edit_menu(message, &screen.text, screen.keyboard)
                .await;
        }
    }
}

async fn show_category(state: &AppState, message: MessageRef, category_id: &str) {
    let screen = {
        let catalog = state.catalog.read().await;
        catalog.snapshot().get(category_id).map(|entry| {
            menu::category_detail(
                category_id,
                &entry.name,
                &entry.expressions,
                state.cfg.button_label_max_length,
            )
        })
    };

    match screen {
        Some(screen) => {
            let _ = state
                .messenger
                .edit_menu(message, &screen.text, screen.keyboard)
                .await;
        }
        None => {
            let _ = state
                .messenger
                .edit_menu(
                    message,
                    "❌ Category not found!",
                    InlineKeyboard::new(vec![]),
                )
                .await;
        }
    }
}

async fn add_expression(
    state: &AppState,
    cb_id: &str,
    message: MessageRef,
    user_id: UserId,
    category: &str,
    index: usize,
) {
    let outcome = {
        let catalog = state.catalog.read().await;
        match catalog.snapshot().get(category) {
            None => AddOutcome::MissingCategory,
            Some(entry) => match entry.expressions.get(index) {
                None => AddOutcome::OutOfRange,
                Some(expression) => {
                    state.selections.lock().await.add(user_id, expression);
                    AddOutcome::Added(menu::category_detail(
                        category,
                        &entry.name,
                        &entry.expressions,
                        state.cfg.button_label_max_length,
                    ))
                }
            },
        }
    };

    match outcome {
        AddOutcome::MissingCategory => {
            let _ = state
                .messenger
                .answer_callback(cb_id, Some("❌ Error adding expression"), true)
                .await;
        }
        AddOutcome::OutOfRange => {
            // Stale button from a previous catalog snapshot; no state change.
            let _ = state.messenger.answer_callback(cb_id, None, false).await;
        }
        AddOutcome::Added(screen) => {
            let _ = state
                .messenger
                .answer_callback(cb_id, Some("✅ Added!"), false)
                .await;
            let _ = state
                .messenger
                .edit_menu(message, &screen.text, screen.keyboard)
                .await;
        }
    }
}

async fn save_selection(
    state: &AppState,
    cb_id: &str,
    message: MessageRef,
    user_id: UserId,
    user_name: &str,
) {
    let expressions = state.selections.lock().await.get(user_id);
    if expressions.is_empty() {
        let _ = state
            .messenger
            .answer_callback(cb_id, Some("❌ No expressions selected yet!"), true)
            .await;
        return;
    }

    let topic = state.catalog.read().await.snapshot().topic().to_string();
    let _ = state.messenger.answer_callback(cb_id, None, false).await;

    let user = UserKey::new(user_id.0, user_name);
    match state.exporter.export(&user, &topic, &expressions) {
        Ok(filename) => {
            let screen = menu::save_confirmation(&filename, expressions.len());
            let _ = state
                .messenger
                .edit_menu(message, &screen.text, screen.keyboard)
                .await;
        }
        Err(e) => {
            tracing::error!(error = %e, user = %user_name, "export failed");
            let _ = state
                .messenger
                .edit_menu(
                    message,
                    "❌ Error saving file. Please try again.",
                    InlineKeyboard::new(vec![]),
                )
                .await;
        }
    }
}
