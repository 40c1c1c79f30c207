//! End-to-end flows through `PostOffice` backed by a real (in-memory) SQLite store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tp_core::{
    config::Config,
    conversation::Conversation,
    domain::{ChatId, MemberId, MessageId, MessageRef, PlatformMessageId},
    messaging::{
        port::MessagingPort,
        types::{
            Actor, CallbackQuery, Command, IncomingUpdate, InlineKeyboard, MessagingCapabilities,
            TextMessage,
        },
    },
    ports::{Directory, Ledger},
    texts, Error, PostOffice, Result,
};
use tp_sqlite::SqliteStore;

const ADMIN: MemberId = MemberId(1000);
const A: MemberId = MemberId(11);
const B: MemberId = MemberId(22);
const C: MemberId = MemberId(33);

#[derive(Clone, Debug)]
struct Outbound {
    chat: i64,
    html: String,
    buttons: Vec<String>,
}

/// Records everything sent; can be told to fail every send.
#[derive(Default)]
struct RecordingMessenger {
    outbox: Mutex<Vec<Outbound>>,
    answers: Mutex<Vec<(Option<String>, bool)>>,
}

impl RecordingMessenger {
    fn record(&self, chat: ChatId, html: &str, keyboard: Option<&InlineKeyboard>) -> MessageRef {
        let mut outbox = self.outbox.lock().unwrap();
        outbox.push(Outbound {
            chat: chat.0,
            html: html.to_string(),
            buttons: keyboard
                .map(|kb| kb.buttons().map(|b| b.callback_data.clone()).collect())
                .unwrap_or_default(),
        });
        MessageRef {
            chat_id: chat,
            message_id: PlatformMessageId(outbox.len() as i32),
        }
    }

    fn last_to(&self, member: MemberId) -> Outbound {
        self.outbox
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|o| o.chat == member.0)
            .cloned()
            .expect("nothing sent to member")
    }
}

#[async_trait]
impl MessagingPort for RecordingMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
        }
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        Ok(self.record(chat_id, html, None))
    }

    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        Ok(self.record(chat_id, html, Some(&keyboard)))
    }

    async fn edit_html(&self, msg: MessageRef, html: &str) -> Result<()> {
        self.record(msg.chat_id, html, None);
        Ok(())
    }

    async fn answer_callback_query(
        &self,
        _callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        self.answers
            .lock()
            .unwrap()
            .push((text.map(str::to_string), show_alert));
        Ok(())
    }
}

/// Ledger wrapper whose appends can be switched off to simulate an outage.
struct FlakyLedger {
    inner: Arc<SqliteStore>,
    down: Mutex<bool>,
}

#[async_trait]
impl Ledger for FlakyLedger {
    async fn append(&self, message: tp_core::model::NewMessage) -> Result<MessageId> {
        if *self.down.lock().unwrap() {
            return Err(Error::Storage("database is locked".to_string()));
        }
        self.inner.append(message).await
    }

    async fn get(&self, id: MessageId) -> Result<Option<tp_core::model::Message>> {
        self.inner.get(id).await
    }

    async fn count_all(&self) -> Result<u64> {
        Ledger::count_all(self.inner.as_ref()).await
    }

    async fn count_since(&self, since: chrono::DateTime<chrono::Utc>) -> Result<u64> {
        self.inner.count_since(since).await
    }
}

struct World {
    office: PostOffice,
    store: Arc<SqliteStore>,
    ledger: Arc<FlakyLedger>,
    messenger: Arc<RecordingMessenger>,
}

fn world() -> World {
    let cfg = Config {
        telegram_bot_token: "test".to_string(),
        database_url: "sqlite::memory:".to_string(),
        admin_id: ADMIN,
        telegram_message_limit: 4096,
        button_label_max_length: 30,
    };
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let ledger = Arc::new(FlakyLedger {
        inner: store.clone(),
        down: Mutex::new(false),
    });
    let messenger = Arc::new(RecordingMessenger::default());
    let office = PostOffice::new(
        Arc::new(cfg),
        store.clone(),
        ledger.clone(),
        messenger.clone(),
    );
    World {
        office,
        store,
        ledger,
        messenger,
    }
}

fn actor(id: MemberId) -> Actor {
    let mut a = Actor::new(id);
    a.first_name = "Telegram".to_string();
    a.username = Some(format!("member{}", id.0));
    a.language_code = Some("uk".to_string());
    a
}

fn cmd(id: MemberId, name: &str) -> IncomingUpdate {
    IncomingUpdate::Command(Command {
        actor: actor(id),
        name: name.to_string(),
        args: String::new(),
    })
}

fn say(id: MemberId, text: &str) -> IncomingUpdate {
    IncomingUpdate::Text(TextMessage {
        actor: actor(id),
        text: text.to_string(),
    })
}

fn press(id: MemberId, data: &str) -> IncomingUpdate {
    IncomingUpdate::Callback(CallbackQuery {
        actor: actor(id),
        callback_id: "cb".to_string(),
        data: data.to_string(),
        message: Some(MessageRef {
            chat_id: id.chat(),
            message_id: PlatformMessageId(1),
        }),
    })
}

async fn register(w: &World, id: MemberId, first: &str, last: &str) {
    w.office.handle(cmd(id, "start")).await;
    w.office.handle(say(id, first)).await;
    w.office.handle(say(id, last)).await;
}

async fn register_and_approve(w: &World, id: MemberId, first: &str, last: &str) {
    register(w, id, first, last).await;
    w.office
        .handle(press(ADMIN, &format!("approve:{}", id.0)))
        .await;
}

#[tokio::test]
async fn two_members_exchange_a_thread() {
    let w = world();
    register_and_approve(&w, A, "Олена", "Петренко").await;
    register_and_approve(&w, B, "Богдан", "Коваль").await;
    assert!(w.store.get_member(A).await.unwrap().unwrap().approved);

    w.office.handle(cmd(A, "send")).await;
    assert_eq!(w.messenger.last_to(A).buttons, vec!["select:22"]);
    w.office.handle(press(A, "select:22")).await;
    w.office.handle(say(A, "Hello")).await;

    let first = w.store.get(MessageId(1)).await.unwrap().unwrap();
    assert_eq!(first.thread_id, None);
    assert_eq!((first.sender_id, first.recipient_id), (A, B));

    let delivered = w.messenger.last_to(B);
    assert!(delivered.html.contains("Hello"));
    assert_eq!(delivered.buttons, vec!["reply:1"]);

    w.office.handle(press(B, "reply:1")).await;
    w.office.handle(say(B, "Hi back")).await;

    let second = w.store.get(MessageId(2)).await.unwrap().unwrap();
    assert_eq!(second.thread_id, Some(MessageId(1)));
    assert_eq!((second.sender_id, second.recipient_id), (B, A));
    assert_eq!(w.messenger.last_to(A).buttons, vec!["reply:2"]);
}

#[tokio::test]
async fn repeated_registration_does_not_duplicate() {
    let w = world();
    register(&w, A, "Олена", "Петренко").await;
    register(&w, A, "Інше", "Ім'я").await;

    assert_eq!(Directory::count_all(w.store.as_ref()).await.unwrap(), 1);
    let m = w.store.get_member(A).await.unwrap().unwrap();
    assert_eq!(m.full_name(), "Олена Петренко");
    assert!(!m.approved);
}

#[tokio::test]
async fn unapproved_member_cannot_send() {
    let w = world();
    register_and_approve(&w, A, "Олена", "Петренко").await;
    register(&w, C, "Катерина", "Шевченко").await;

    w.office.handle(cmd(C, "send")).await;
    assert_eq!(w.messenger.last_to(C).html, texts::NOT_APPROVED);

    w.office.handle(say(C, "sneaky")).await;
    assert_eq!(Ledger::count_all(w.store.as_ref()).await.unwrap(), 0);
}

#[tokio::test]
async fn admin_cannot_delete_own_entry() {
    let w = world();
    register_and_approve(&w, ADMIN, "Адмін", "Головний").await;

    w.office.handle(press(ADMIN, "delete:1000")).await;
    assert!(w.store.get_member(ADMIN).await.unwrap().is_some());
    assert_eq!(
        w.messenger.answers.lock().unwrap().last().cloned(),
        Some((Some(texts::CANNOT_DELETE_SELF.to_string()), true))
    );
}

#[tokio::test]
async fn rejection_removes_member() {
    let w = world();
    register(&w, C, "Катерина", "Шевченко").await;

    w.office.handle(press(ADMIN, "reject:33")).await;
    assert_eq!(w.store.get_member(C).await.unwrap(), None);
    assert_eq!(w.messenger.last_to(C).html, texts::MEMBER_REJECTED);
}

#[tokio::test]
async fn non_admin_approve_is_ignored() {
    let w = world();
    register_and_approve(&w, A, "Олена", "Петренко").await;
    register(&w, C, "Катерина", "Шевченко").await;

    w.office.handle(press(A, "approve:33")).await;
    assert!(!w.store.get_member(C).await.unwrap().unwrap().approved);
}

#[tokio::test]
async fn storage_outage_keeps_compose_state() {
    let w = world();
    register_and_approve(&w, A, "Олена", "Петренко").await;
    register_and_approve(&w, B, "Богдан", "Коваль").await;
    w.office.handle(press(A, "select:22")).await;

    *w.ledger.down.lock().unwrap() = true;
    w.office.handle(say(A, "Hello")).await;
    assert_eq!(w.messenger.last_to(A).html, texts::MESSAGE_FAILED);
    assert_eq!(
        w.office.conversation(A).await,
        Conversation::Composing {
            recipient: B,
            reply_to: None
        }
    );

    *w.ledger.down.lock().unwrap() = false;
    w.office.handle(say(A, "Hello")).await;
    assert_eq!(w.messenger.last_to(A).html, texts::MESSAGE_SENT);
    assert!(w.office.conversation(A).await.is_idle());
}

#[tokio::test]
async fn names_with_token_delimiters_survive_the_name_change_round_trip() {
    let w = world();
    register_and_approve(&w, B, "Богдан", "Коваль").await;

    w.office.handle(cmd(B, "editname")).await;
    w.office.handle(say(B, "Ann_Marie")).await;
    w.office.handle(say(B, "O:Neil 100%")).await;

    let request = w.messenger.last_to(ADMIN);
    w.office.handle(press(ADMIN, &request.buttons[0])).await;

    let m = w.store.get_member(B).await.unwrap().unwrap();
    assert_eq!(m.first_name, "Ann_Marie");
    assert_eq!(m.last_name, "O:Neil 100%");
}
