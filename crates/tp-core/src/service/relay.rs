use tracing::{error, info, warn};

use super::{degrade, Access, Answer, PostOffice};
use crate::{
    conversation::Conversation,
    domain::{MemberId, MessageId},
    formatting::truncate_chars,
    messaging::types::{Actor, CallbackQuery, InlineButton, InlineKeyboard},
    model::NewMessage,
    texts,
    thread::resolve_thread_root,
    tokens::ActionToken,
};

impl PostOffice {
    /// `/send`: offer every other approved member as a recipient.
    pub(super) async fn send_command(&self, actor: &Actor) {
        match self.access(actor.id).await {
            Access::Approved(_) => {}
            Access::Pending | Access::Unknown => {
                self.say(actor.chat(), texts::NOT_APPROVED).await;
                return;
            }
            Access::Unavailable => {
                self.say(actor.chat(), texts::TRY_LATER).await;
                return;
            }
        }

        let recipients = degrade(
            self.directory.list_approved_members(Some(actor.id)).await,
            "listing recipients",
        );
        if recipients.is_empty() {
            self.say(actor.chat(), texts::NO_RECIPIENTS).await;
            return;
        }

        let buttons = recipients
            .iter()
            .map(|m| {
                InlineButton::new(
                    truncate_chars(&m.full_name(), self.cfg.button_label_max_length),
                    ActionToken::Select(m.id).encode(),
                )
            })
            .collect();
        self.say_with_keyboard(
            actor.chat(),
            texts::CHOOSE_RECIPIENT,
            InlineKeyboard::one_per_row(buttons),
        )
        .await;
    }

    pub(super) async fn select_recipient(&self, q: &CallbackQuery, target: MemberId) -> Answer {
        let actor = &q.actor;
        match self.access(actor.id).await {
            Access::Approved(_) => {}
            Access::Pending | Access::Unknown => return Answer::Alert(texts::NOT_APPROVED),
            Access::Unavailable => return Answer::Alert(texts::TRY_LATER),
        }

        match self.directory.get_member(target).await {
            Ok(Some(m)) if m.approved && m.id != actor.id => {
                self.sessions
                    .set(
                        actor.id,
                        Conversation::Composing {
                            recipient: m.id,
                            reply_to: None,
                        },
                    )
                    .await;
                self.respond_to_button(q, &texts::recipient_chosen(&m.full_name()))
                    .await;
                Answer::Silent
            }
            Ok(_) => {
                self.respond_to_button(q, texts::MEMBER_NOT_FOUND).await;
                Answer::Silent
            }
            Err(e) => {
                error!(member_id = target.0, "recipient lookup failed: {e}");
                Answer::Alert(texts::TRY_LATER)
            }
        }
    }

    /// Reply button on a received message. The message itself stays on screen.
    pub(super) async fn start_reply(&self, q: &CallbackQuery, message: MessageId) -> Answer {
        let actor = &q.actor;
        match self.access(actor.id).await {
            Access::Approved(_) => {}
            Access::Pending | Access::Unknown => return Answer::Alert(texts::NOT_APPROVED),
            Access::Unavailable => return Answer::Alert(texts::TRY_LATER),
        }

        let original = match self.ledger.get(message).await {
            Ok(Some(m)) => m,
            Ok(None) => return Answer::Alert(texts::MESSAGE_NOT_FOUND),
            Err(e) => {
                error!(message_id = message.0, "ledger lookup failed: {e}");
                return Answer::Alert(texts::TRY_LATER);
            }
        };

        self.sessions
            .set(
                actor.id,
                Conversation::Composing {
                    recipient: original.sender_id,
                    reply_to: Some(message),
                },
            )
            .await;
        self.say(actor.chat(), texts::WRITE_REPLY).await;
        Answer::Silent
    }

    /// Append to the ledger and deliver with a reply button.
    ///
    /// Any failure keeps the compose state so the member can simply resend.
    /// The full body is stored and delivered; nothing is truncated.
    pub(super) async fn relay(
        &self,
        actor: &Actor,
        text: &str,
        recipient: MemberId,
        reply_to: Option<MessageId>,
    ) {
        match self.access(actor.id).await {
            Access::Approved(_) => {}
            Access::Pending | Access::Unknown => {
                self.sessions.reset(actor.id).await;
                self.say(actor.chat(), texts::REGISTER_FIRST).await;
                return;
            }
            Access::Unavailable => {
                self.say(actor.chat(), texts::TRY_LATER).await;
                return;
            }
        }

        let body = text.trim();
        if body.is_empty() {
            self.say(actor.chat(), texts::EMPTY_MESSAGE).await;
            return;
        }

        // Oversized bodies are refused; the compose state stays for a shorter resend.
        let framed = if reply_to.is_some() {
            texts::anonymous_reply(body)
        } else {
            texts::anonymous_message(body)
        };
        let limit = self.message_limit();
        let framed_len = framed.chars().count();
        if framed_len > limit {
            let body_len = body.chars().count();
            let max = limit.saturating_sub(framed_len.saturating_sub(body_len));
            self.say(actor.chat(), &texts::message_too_long(body_len, max))
                .await;
            return;
        }

        let thread_id = match reply_to {
            Some(parent) => Some(resolve_thread_root(self.ledger.as_ref(), parent).await),
            None => None,
        };

        let message_id = match self
            .ledger
            .append(NewMessage {
                sender_id: actor.id,
                recipient_id: recipient,
                text: body.to_string(),
                thread_id,
            })
            .await
        {
            Ok(id) => id,
            Err(e) => {
                error!(user_id = actor.id.0, "failed to record message: {e}");
                self.say(actor.chat(), texts::MESSAGE_FAILED).await;
                return;
            }
        };

        let keyboard = InlineKeyboard::single(InlineButton::new(
            texts::BUTTON_REPLY,
            ActionToken::Reply(message_id).encode(),
        ));

        match self
            .messenger
            .send_inline_keyboard(recipient.chat(), &framed, keyboard)
            .await
        {
            Ok(_) => {
                self.sessions.reset(actor.id).await;
                info!(
                    message_id = message_id.0,
                    thread_id = ?thread_id.map(|t| t.0),
                    "message relayed"
                );
                self.say(actor.chat(), texts::MESSAGE_SENT).await;
            }
            Err(e) => {
                warn!(
                    message_id = message_id.0,
                    recipient = recipient.0,
                    "delivery failed: {e}"
                );
                self.say(actor.chat(), texts::MESSAGE_FAILED).await;
            }
        }
    }
}
