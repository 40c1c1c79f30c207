use std::{collections::HashMap, sync::Arc};

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

use tp_core::{
    config::Config,
    messaging::port::MessagingPort,
    ports::{Directory, Ledger},
    PostOffice,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub post_office: Arc<PostOffice>,
    pub chat_locks: Arc<ChatLocks>,
}

/// One async lock per chat so a member's texts are handled in arrival order.
///
/// Entries nobody holds or waits on are dropped on the next acquisition, so
/// the map only tracks chats with input in flight.
#[derive(Default)]
pub struct ChatLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ChatLocks {
    pub async fn lock_chat(&self, chat_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(chat_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

pub async fn run_polling(
    cfg: Arc<Config>,
    directory: Arc<dyn Directory>,
    ledger: Arc<dyn Ledger>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!("bot started: @{}", me.username()),
        Err(e) => warn!("getMe failed, continuing: {e}"),
    }
    info!(admin_id = cfg.admin_id.0, "admin configured");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let post_office = Arc::new(PostOffice::new(cfg, directory, ledger, messenger));

    let state = Arc::new(AppState {
        post_office,
        chat_locks: Arc::new(ChatLocks::default()),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("dispatcher stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chat_locks_serialize_per_chat_only() {
        let locks = ChatLocks::default();
        let held = locks.lock_chat(1).await;

        // A different chat is not blocked.
        let _other = locks.lock_chat(2).await;

        // The same chat waits until the first guard is dropped.
        let pending = tokio::time::timeout(std::time::Duration::from_millis(20), locks.lock_chat(1)).await;
        assert!(pending.is_err());

        drop(held);
        let _again = locks.lock_chat(1).await;
    }

    #[tokio::test]
    async fn idle_chats_are_forgotten() {
        let locks = ChatLocks::default();
        for chat in 0..100 {
            drop(locks.lock_chat(chat).await);
        }
        let _held = locks.lock_chat(500).await;
        assert_eq!(locks.inner.lock().await.len(), 1);

        // A held chat survives pruning triggered by another chat.
        drop(locks.lock_chat(501).await);
        assert!(locks.inner.lock().await.contains_key(&500));
    }
}
