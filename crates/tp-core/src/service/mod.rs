//! The relay service: turns inbound platform events into directory/ledger
//! operations and outbound notifications.
//!
//! Split by flow:
//! - `registration`: register and edit-name dialogues, cancel, profile
//! - `relay`: recipient selection, replies, message relay
//! - `admin`: approvals, deletions, statistics, member listing

mod admin;
mod registration;
mod relay;


use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::{
    config::Config,
    conversation::{Conversation, NameField, PendingNameChanges, SessionStore, Step},
    domain::{ChatId, MemberId},
    messaging::{
        port::MessagingPort,
        types::{Actor, CallbackQuery, Command, IncomingUpdate, InlineKeyboard, TextMessage},
    },
    model::Member,
    ports::{Directory, Ledger},
    security::is_admin,
    texts,
    tokens::ActionToken,
    Result,
};

/// Where a member stands, re-read from the directory on every gated call.
#[derive(Clone, Debug)]
pub(crate) enum Access {
    Approved(Member),
    /// Registered, awaiting approval.
    Pending,
    Unknown,
    /// The directory could not be read.
    Unavailable,
}

/// How to acknowledge a button press once its flow has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Answer {
    Silent,
    Alert(&'static str),
}

pub struct PostOffice {
    cfg: Arc<Config>,
    directory: Arc<dyn Directory>,
    ledger: Arc<dyn Ledger>,
    messenger: Arc<dyn MessagingPort>,
    sessions: SessionStore,
    name_changes: PendingNameChanges,
}

impl PostOffice {
    pub fn new(
        cfg: Arc<Config>,
        directory: Arc<dyn Directory>,
        ledger: Arc<dyn Ledger>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            cfg,
            directory,
            ledger,
            messenger,
            sessions: SessionStore::new(),
            name_changes: PendingNameChanges::new(),
        }
    }

    /// Current conversation state of a member (Idle when none).
    pub async fn conversation(&self, member: MemberId) -> Conversation {
        self.sessions.get(member).await
    }

    pub async fn handle(&self, update: IncomingUpdate) {
        match update {
            IncomingUpdate::Command(cmd) => self.handle_command(cmd).await,
            IncomingUpdate::Text(msg) => self.handle_text(msg).await,
            IncomingUpdate::Callback(q) => self.handle_callback(q).await,
        }
    }

    pub async fn handle_command(&self, cmd: Command) {
        let actor = &cmd.actor;
        debug!(user_id = actor.id.0, command = %cmd.name, "command");

        match cmd.name.as_str() {
            "start" | "register" => self.register_command(actor).await,
            "send" => self.send_command(actor).await,
            "editname" => self.edit_name_command(actor).await,
            "myinfo" => self.my_info_command(actor).await,
            "cancel" => self.cancel_command(actor).await,
            "help" => {
                let body = if self.is_admin(actor) {
                    texts::HELP_ADMIN
                } else {
                    texts::HELP_MEMBER
                };
                self.say(actor.chat(), body).await;
            }
            "admin" | "stats" => self.stats_command(actor).await,
            "users" => self.users_command(actor).await,
            "deleteuser" => self.delete_user_command(actor, &cmd.args).await,
            other => self.say(actor.chat(), &texts::unknown_command(other)).await,
        }
    }

    pub async fn handle_text(&self, msg: TextMessage) {
        let actor = &msg.actor;
        let state = self.sessions.get(actor.id).await;

        match state.on_text(&msg.text) {
            Step::Reprompt(field) => {
                let body = match field {
                    NameField::First => texts::FIRST_NAME_TOO_SHORT,
                    NameField::Last => texts::LAST_NAME_TOO_SHORT,
                };
                self.say(actor.chat(), body).await;
            }
            Step::Advance(next) => {
                let prompt = match &next {
                    Conversation::AwaitingLastName { first_name } => {
                        texts::ask_last_name(first_name)
                    }
                    _ => texts::ASK_NEW_LAST_NAME.to_string(),
                };
                self.sessions.set(actor.id, next).await;
                self.say(actor.chat(), &prompt).await;
            }
            Step::Register {
                first_name,
                last_name,
            } => {
                self.complete_registration(actor, first_name, last_name)
                    .await
            }
            Step::RequestNameChange {
                first_name,
                last_name,
            } => {
                self.request_name_change(actor, first_name, last_name)
                    .await
            }
            Step::Relay {
                recipient,
                reply_to,
            } => self.relay(actor, &msg.text, recipient, reply_to).await,
            Step::Unrouted => {
                let body = match self.access(actor.id).await {
                    Access::Approved(_) => texts::USE_SEND,
                    Access::Pending | Access::Unknown => texts::REGISTER_FIRST,
                    Access::Unavailable => texts::TRY_LATER,
                };
                self.say(actor.chat(), body).await;
            }
        }
    }

    pub async fn handle_callback(&self, q: CallbackQuery) {
        let answer = match ActionToken::parse(&q.data) {
            None => {
                warn!(user_id = q.actor.id.0, data = %q.data, "unparseable callback data");
                Answer::Alert(texts::INVALID_ACTION)
            }
            Some(token) if token.is_admin_only() && !self.is_admin(&q.actor) => {
                warn!(user_id = q.actor.id.0, action = %token, "non-admin pressed an admin button");
                Answer::Alert(texts::ADMIN_ONLY_ACTION)
            }
            Some(token) => self.run_action(&q, token).await,
        };

        let (text, alert) = match answer {
            Answer::Silent => (None, false),
            Answer::Alert(t) => (Some(t), true),
        };
        if let Err(e) = self
            .messenger
            .answer_callback_query(&q.callback_id, text, alert)
            .await
        {
            warn!("failed to answer callback query: {e}");
        }
    }

    async fn run_action(&self, q: &CallbackQuery, token: ActionToken) -> Answer {
        match token {
            ActionToken::Approve(id) => self.approve_registration(q, id).await,
            ActionToken::Reject(id) => self.reject_registration(q, id).await,
            ActionToken::ApproveName(id) => self.approve_name_change(q, id).await,
            ActionToken::RejectName(id) => self.reject_name_change(q, id).await,
            ActionToken::Delete(id) => self.delete_member_button(q, id).await,
            ActionToken::Select(id) => self.select_recipient(q, id).await,
            ActionToken::Reply(id) => self.start_reply(q, id).await,
        }
    }

    // ============== Shared helpers ==============

    fn is_admin(&self, actor: &Actor) -> bool {
        is_admin(actor.id, self.cfg.admin_id)
    }

    pub(crate) async fn access(&self, id: MemberId) -> Access {
        match self.directory.get_member(id).await {
            Ok(Some(m)) if m.approved => Access::Approved(m),
            Ok(Some(_)) => Access::Pending,
            Ok(None) => Access::Unknown,
            Err(e) => {
                error!(member_id = id.0, "directory lookup failed: {e}");
                Access::Unavailable
            }
        }
    }

    /// Effective outbound length limit.
    pub(crate) fn message_limit(&self) -> usize {
        self.cfg
            .telegram_message_limit
            .min(self.messenger.capabilities().max_message_len)
    }

    /// Best-effort reply to the acting user.
    pub(crate) async fn say(&self, chat: ChatId, html: &str) {
        if let Err(e) = self.messenger.send_html(chat, html).await {
            warn!(chat_id = chat.0, "failed to send message: {e}");
        }
    }

    pub(crate) async fn say_with_keyboard(&self, chat: ChatId, html: &str, kb: InlineKeyboard) {
        if let Err(e) = self.messenger.send_inline_keyboard(chat, html, kb).await {
            warn!(chat_id = chat.0, "failed to send keyboard: {e}");
        }
    }

    /// Best-effort notification to the other party of an action; failures are logged only.
    pub(crate) async fn notify(&self, member: MemberId, html: &str) {
        if let Err(e) = self.messenger.send_html(member.chat(), html).await {
            warn!(member_id = member.0, "could not notify member: {e}");
        }
    }

    /// Replace the message carrying the pressed button, or fall back to a new message.
    pub(crate) async fn respond_to_button(&self, q: &CallbackQuery, html: &str) {
        match q.message {
            Some(msg) => {
                if let Err(e) = self.messenger.edit_html(msg, html).await {
                    warn!(chat_id = msg.chat_id.0, "failed to edit message: {e}");
                }
            }
            None => self.say(q.actor.chat(), html).await,
        }
    }
}

/// Log a failed read and fall back to the type's default (empty list, zero count).
pub(crate) fn degrade<T: Default>(res: Result<T>, what: &str) -> T {
    res.unwrap_or_else(|e| {
        error!("{what} failed: {e}");
        T::default()
    })
}
