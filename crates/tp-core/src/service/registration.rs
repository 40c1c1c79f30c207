use tracing::{error, info, warn};

use super::{Access, PostOffice};
use crate::{
    conversation::{Conversation, ProposedName},
    messaging::types::{Actor, InlineButton, InlineKeyboard},
    model::NewMember,
    texts,
    tokens::ActionToken,
};

impl PostOffice {
    /// `/start`: known members get their status, unknown ones enter the dialogue.
    pub(super) async fn register_command(&self, actor: &Actor) {
        let body = match self.directory.get_member(actor.id).await {
            Ok(Some(m)) if m.approved => texts::WELCOME_BACK,
            Ok(Some(_)) => texts::PENDING_APPROVAL,
            Ok(None) => {
                self.sessions
                    .set(actor.id, Conversation::AwaitingFirstName)
                    .await;
                texts::WELCOME_NEW
            }
            Err(e) => {
                error!(user_id = actor.id.0, "registration lookup failed: {e}");
                texts::TRY_LATER
            }
        };
        self.say(actor.chat(), body).await;
    }

    pub(super) async fn complete_registration(
        &self,
        actor: &Actor,
        first_name: String,
        last_name: String,
    ) {
        let new_member = NewMember {
            id: actor.id,
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            handle: actor.username.clone(),
        };

        let created = match self.directory.create_member(new_member).await {
            Ok(created) => created,
            Err(e) => {
                // Dialogue state is kept so the member can resend the last name.
                error!(user_id = actor.id.0, "failed to store registration: {e}");
                self.say(actor.chat(), texts::TRY_LATER).await;
                return;
            }
        };

        self.sessions.reset(actor.id).await;
        self.say(
            actor.chat(),
            &texts::registration_submitted(&first_name, &last_name),
        )
        .await;

        if !created {
            info!(user_id = actor.id.0, "registration repeated for existing member");
            return;
        }
        info!(user_id = actor.id.0, "registration submitted");

        let body = texts::admin_new_registration(
            &first_name,
            &last_name,
            &actor.display_name(),
            actor.username.as_deref(),
            actor.id.0,
            actor.language_code.as_deref(),
        );
        let keyboard = InlineKeyboard::row(vec![
            InlineButton::new(
                texts::BUTTON_APPROVE,
                ActionToken::Approve(actor.id).encode(),
            ),
            InlineButton::new(
                texts::BUTTON_REJECT,
                ActionToken::Reject(actor.id).encode(),
            ),
        ]);
        self.say_with_keyboard(self.cfg.admin_id.chat(), &body, keyboard)
            .await;
    }

    /// `/editname`: approved members only.
    pub(super) async fn edit_name_command(&self, actor: &Actor) {
        let body = match self.access(actor.id).await {
            Access::Approved(m) => {
                self.sessions
                    .set(actor.id, Conversation::AwaitingEditFirstName)
                    .await;
                texts::edit_name_intro(&m)
            }
            Access::Pending => texts::NOT_APPROVED.to_string(),
            Access::Unknown => texts::NOT_REGISTERED.to_string(),
            Access::Unavailable => texts::TRY_LATER.to_string(),
        };
        self.say(actor.chat(), &body).await;
    }

    /// The stored name is untouched until the admin approves the request.
    ///
    /// The member is only told the request went out once the admin has it;
    /// otherwise the dialogue stays on the last-name step for a resend.
    pub(super) async fn request_name_change(
        &self,
        actor: &Actor,
        first_name: String,
        last_name: String,
    ) {
        let member = match self.access(actor.id).await {
            Access::Approved(m) => m,
            Access::Pending => {
                self.sessions.reset(actor.id).await;
                self.say(actor.chat(), texts::NOT_APPROVED).await;
                return;
            }
            Access::Unknown => {
                self.sessions.reset(actor.id).await;
                self.say(actor.chat(), texts::NOT_REGISTERED).await;
                return;
            }
            Access::Unavailable => {
                self.say(actor.chat(), texts::TRY_LATER).await;
                return;
            }
        };

        let proposed = ProposedName {
            first_name,
            last_name,
        };
        let new_name = proposed.full_name();
        self.name_changes.put(actor.id, proposed).await;

        let keyboard = InlineKeyboard::row(vec![
            InlineButton::new(
                texts::BUTTON_APPROVE,
                ActionToken::ApproveName(actor.id).encode(),
            ),
            InlineButton::new(
                texts::BUTTON_REJECT,
                ActionToken::RejectName(actor.id).encode(),
            ),
        ]);
        if let Err(e) = self
            .messenger
            .send_inline_keyboard(
                self.cfg.admin_id.chat(),
                &texts::admin_name_change_request(&member, &new_name),
                keyboard,
            )
            .await
        {
            warn!(user_id = actor.id.0, "name change request not delivered: {e}");
            self.name_changes.take(actor.id).await;
            self.say(actor.chat(), texts::TRY_LATER).await;
            return;
        }

        self.sessions.reset(actor.id).await;
        info!(user_id = actor.id.0, "name change requested");
        self.say(
            actor.chat(),
            &texts::name_change_submitted(&member.full_name(), &new_name),
        )
        .await;
    }

    pub(super) async fn my_info_command(&self, actor: &Actor) {
        let body = match self.access(actor.id).await {
            Access::Approved(m) => texts::my_info(&m),
            Access::Pending => texts::PENDING_APPROVAL.to_string(),
            Access::Unknown => texts::NOT_REGISTERED.to_string(),
            Access::Unavailable => texts::TRY_LATER.to_string(),
        };
        self.say(actor.chat(), &body).await;
    }

    pub(super) async fn cancel_command(&self, actor: &Actor) {
        let dropped = self.sessions.reset(actor.id).await;
        if !dropped.is_idle() {
            info!(user_id = actor.id.0, state = ?dropped, "conversation cancelled");
        }
        self.say(actor.chat(), texts::CANCELLED).await;
    }
}
