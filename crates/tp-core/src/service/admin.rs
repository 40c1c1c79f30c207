use chrono::{Duration, Utc};
use tracing::{error, info};

use super::{degrade, Answer, PostOffice};
use crate::{
    domain::MemberId,
    errors::Error,
    formatting::{split_lines, truncate_chars},
    messaging::types::{Actor, CallbackQuery, InlineButton, InlineKeyboard},
    model::{Member, Stats},
    security::can_delete,
    texts,
    tokens::ActionToken,
    Result,
};

impl PostOffice {
    // ============== Approvals ==============

    pub(super) async fn approve_registration(&self, q: &CallbackQuery, id: MemberId) -> Answer {
        let member = match self.directory.get_member(id).await {
            Ok(Some(m)) => m,
            Ok(None) => {
                self.respond_to_button(q, texts::MEMBER_NOT_FOUND).await;
                return Answer::Silent;
            }
            Err(e) => {
                error!(member_id = id.0, "member lookup failed: {e}");
                return Answer::Alert(texts::TRY_LATER);
            }
        };

        if let Err(e) = self.directory.approve_member(id).await {
            error!(member_id = id.0, "approve failed: {e}");
            return Answer::Alert(texts::TRY_LATER);
        }
        info!(member_id = id.0, "member approved");

        self.respond_to_button(q, &texts::admin_member_approved(&member.full_name()))
            .await;
        self.notify(id, texts::MEMBER_APPROVED).await;
        Answer::Silent
    }

    /// Rejecting a registration removes the member entirely.
    pub(super) async fn reject_registration(&self, q: &CallbackQuery, id: MemberId) -> Answer {
        match self.remove_member(id).await {
            Ok(member) => {
                self.respond_to_button(q, &texts::admin_member_rejected(&member.full_name()))
                    .await;
                self.notify(id, texts::MEMBER_REJECTED).await;
                Answer::Silent
            }
            Err(Error::NotFound(_)) => {
                self.respond_to_button(q, texts::MEMBER_NOT_FOUND).await;
                Answer::Silent
            }
            Err(e) => {
                error!(member_id = id.0, "reject failed: {e}");
                Answer::Alert(texts::TRY_LATER)
            }
        }
    }

    /// Applies the name held for `id`. A failed update puts it back so the
    /// admin can press the button again.
    pub(super) async fn approve_name_change(&self, q: &CallbackQuery, id: MemberId) -> Answer {
        let Some(proposed) = self.name_changes.take(id).await else {
            self.respond_to_button(q, texts::NAME_CHANGE_EXPIRED).await;
            return Answer::Silent;
        };

        match self.directory.get_member(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.respond_to_button(q, texts::MEMBER_NOT_FOUND).await;
                return Answer::Silent;
            }
            Err(e) => {
                error!(member_id = id.0, "member lookup failed: {e}");
                self.name_changes.put(id, proposed).await;
                return Answer::Alert(texts::TRY_LATER);
            }
        }

        if let Err(e) = self
            .directory
            .update_member_name(id, &proposed.first_name, &proposed.last_name)
            .await
        {
            error!(member_id = id.0, "name update failed: {e}");
            self.name_changes.put(id, proposed).await;
            return Answer::Alert(texts::TRY_LATER);
        }
        info!(member_id = id.0, "name change approved");

        let new_name = proposed.full_name();
        self.respond_to_button(q, &texts::admin_name_change_approved(&new_name))
            .await;
        self.notify(id, &texts::member_name_change_approved(&new_name))
            .await;
        Answer::Silent
    }

    pub(super) async fn reject_name_change(&self, q: &CallbackQuery, id: MemberId) -> Answer {
        let member = match self.directory.get_member(id).await {
            Ok(Some(m)) => m,
            Ok(None) => {
                self.respond_to_button(q, texts::MEMBER_NOT_FOUND).await;
                return Answer::Silent;
            }
            Err(e) => {
                error!(member_id = id.0, "member lookup failed: {e}");
                return Answer::Alert(texts::TRY_LATER);
            }
        };
        self.name_changes.take(id).await;
        info!(member_id = id.0, "name change rejected");

        self.respond_to_button(q, &texts::admin_name_change_rejected(&member.full_name()))
            .await;
        self.notify(id, texts::MEMBER_NAME_CHANGE_REJECTED).await;
        Answer::Silent
    }

    // ============== Deletion ==============

    pub(super) async fn delete_member_button(&self, q: &CallbackQuery, id: MemberId) -> Answer {
        if !can_delete(q.actor.id, id, self.cfg.admin_id) {
            return Answer::Alert(texts::CANNOT_DELETE_SELF);
        }
        match self.remove_member(id).await {
            Ok(member) => {
                self.respond_to_button(q, &texts::admin_member_deleted(&member))
                    .await;
                self.notify(id, texts::MEMBER_DELETED).await;
                Answer::Silent
            }
            Err(Error::NotFound(_)) => Answer::Alert(texts::MEMBER_NOT_FOUND),
            Err(e) => {
                error!(member_id = id.0, "delete failed: {e}");
                Answer::Alert(texts::TRY_LATER)
            }
        }
    }

    /// `/deleteuser <id>` deletes directly; without an argument it shows a picker.
    pub(super) async fn delete_user_command(&self, actor: &Actor, args: &str) {
        if !self.is_admin(actor) {
            self.say(actor.chat(), texts::ADMIN_ONLY_COMMAND).await;
            return;
        }

        let arg = args.trim();
        if arg.is_empty() {
            self.delete_picker(actor).await;
            return;
        }
        let Ok(raw) = arg.parse::<i64>() else {
            self.say(actor.chat(), texts::DELETE_USAGE).await;
            return;
        };
        let target = MemberId(raw);

        if !can_delete(actor.id, target, self.cfg.admin_id) {
            self.say(actor.chat(), texts::CANNOT_DELETE_SELF).await;
            return;
        }

        match self.remove_member(target).await {
            Ok(member) => {
                self.say(actor.chat(), &texts::admin_member_deleted(&member))
                    .await;
                self.notify(target, texts::MEMBER_DELETED).await;
            }
            Err(Error::NotFound(_)) => self.say(actor.chat(), texts::MEMBER_NOT_FOUND).await,
            Err(e) => {
                error!(member_id = raw, "delete failed: {e}");
                self.say(actor.chat(), texts::TRY_LATER).await;
            }
        }
    }

    async fn delete_picker(&self, actor: &Actor) {
        let members = degrade(self.directory.list_all_members().await, "listing members");
        let buttons = self.delete_buttons(&members, actor.id, true);
        if buttons.is_empty() {
            self.say(actor.chat(), texts::NO_MEMBERS).await;
            return;
        }
        self.say_with_keyboard(
            actor.chat(),
            texts::DELETE_PICKER,
            InlineKeyboard::one_per_row(buttons),
        )
        .await;
    }

    /// Remove a member (and their ledger rows) and drop any dialogue or
    /// name-change request they had open.
    async fn remove_member(&self, id: MemberId) -> Result<Member> {
        let member = self
            .directory
            .get_member(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("member {id}")))?;
        self.directory.delete_member(id).await?;
        self.sessions.reset(id).await;
        self.name_changes.take(id).await;
        info!(member_id = id.0, "member removed");
        Ok(member)
    }

    fn delete_buttons(&self, members: &[Member], actor: MemberId, with_status: bool) -> Vec<InlineButton> {
        members
            .iter()
            .filter(|m| can_delete(actor, m.id, self.cfg.admin_id))
            .map(|m| {
                let label = if with_status {
                    format!("🗑 {} {}", m.full_name(), texts::status_mark(m))
                } else {
                    format!("🗑 {}", m.full_name())
                };
                InlineButton::new(
                    truncate_chars(&label, self.cfg.button_label_max_length),
                    ActionToken::Delete(m.id).encode(),
                )
            })
            .collect()
    }

    // ============== Console ==============

    /// `/admin`: counts degrade to zero when the store cannot answer.
    pub(super) async fn stats_command(&self, actor: &Actor) {
        if !self.is_admin(actor) {
            self.say(actor.chat(), texts::ADMIN_ONLY_COMMAND).await;
            return;
        }

        let now = Utc::now();
        let stats = Stats {
            total_members: degrade(self.directory.count_all().await, "counting members"),
            approved_members: degrade(
                self.directory.count_approved().await,
                "counting approved members",
            ),
            messages_today: degrade(
                self.ledger.count_since(now - Duration::days(1)).await,
                "counting today's messages",
            ),
            messages_week: degrade(
                self.ledger.count_since(now - Duration::days(7)).await,
                "counting this week's messages",
            ),
            total_messages: degrade(self.ledger.count_all().await, "counting messages"),
        };
        self.say(actor.chat(), &texts::stats(&stats)).await;
    }

    /// `/users`: full list, chunked to the message limit, with delete buttons
    /// on the last chunk.
    pub(super) async fn users_command(&self, actor: &Actor) {
        if !self.is_admin(actor) {
            self.say(actor.chat(), texts::ADMIN_ONLY_COMMAND).await;
            return;
        }

        let members = degrade(self.directory.list_all_members().await, "listing members");
        if members.is_empty() {
            self.say(actor.chat(), texts::NO_MEMBERS).await;
            return;
        }

        let mut chunks = split_lines(&texts::member_list(&members), self.message_limit());
        let last = chunks.pop().unwrap_or_default();
        for chunk in &chunks {
            self.say(actor.chat(), chunk).await;
        }

        let buttons = self.delete_buttons(&members, actor.id, false);
        if buttons.is_empty() {
            self.say(actor.chat(), &last).await;
        } else {
            self.say_with_keyboard(actor.chat(), &last, InlineKeyboard::one_per_row(buttons))
                .await;
        }
    }
}
