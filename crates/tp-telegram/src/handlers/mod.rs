//! Telegram update handlers.
//!
//! Each handler converts a teloxide update into a `tp-core` event and hands it
//! to the `PostOffice`. Only private chats are served.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message, User},
};
use tracing::debug;

use tp_core::{
    domain::{ChatId, MemberId, MessageRef, PlatformMessageId},
    messaging::types::{Actor, CallbackQuery as ButtonPress, Command, IncomingUpdate, TextMessage},
};

use crate::router::AppState;

mod commands;

fn actor_from(user: &User) -> Actor {
    Actor {
        id: MemberId(user.id.0 as i64),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        language_code: user.language_code.clone(),
    }
}

fn message_ref(msg: &Message) -> MessageRef {
    MessageRef {
        chat_id: ChatId(msg.chat.id.0),
        message_id: PlatformMessageId(msg.id.0),
    }
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let update = ButtonPress {
        actor: actor_from(&q.from),
        callback_id: q.id.clone(),
        data: q.data.clone().unwrap_or_default(),
        message: q.message.as_ref().map(message_ref),
    };

    state
        .post_office
        .handle(IncomingUpdate::Callback(update))
        .await;
    Ok(())
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if !msg.chat.is_private() {
        debug!(chat_id = msg.chat.id.0, "ignoring non-private chat");
        return Ok(());
    }
    let (Some(user), Some(text)) = (msg.from(), msg.text()) else {
        debug!(chat_id = msg.chat.id.0, "ignoring non-text message");
        return Ok(());
    };
    let actor = actor_from(user);

    if text.starts_with('/') {
        let (name, args) = commands::parse_command(text);
        state
            .post_office
            .handle(IncomingUpdate::Command(Command { actor, name, args }))
            .await;
        return Ok(());
    }

    // Sequentialize dialogue input per chat.
    let _guard = state.chat_locks.lock_chat(msg.chat.id.0).await;
    state
        .post_office
        .handle(IncomingUpdate::Text(TextMessage {
            actor,
            text: text.to_string(),
        }))
        .await;
    Ok(())
}
