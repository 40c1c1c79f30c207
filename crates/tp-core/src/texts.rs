//! User-facing copy (Telegram HTML).
//!
//! Every function that interpolates user-supplied text escapes it here, so
//! callers pass raw names and message bodies.

use crate::formatting::{escape_html, handle_or};
use crate::model::{Member, Stats};

pub const NO_HANDLE: &str = "немає";

// ============== Registration ==============

pub const WELCOME_NEW: &str = "🕊️ Вітаю в Таємній Пошті!\n\n\
Це бот для анонімних повідомлень у нашій молодіжній спільноті.\n\n\
Щоб почати, потрібно зареєструватися.\n\
Введи своє ім'я:";

pub const WELCOME_BACK: &str = "🕊️ Вітаю в Таємній Пошті!\n\n\
Використовуй /send щоб надіслати анонімне послання.\n\
Використовуй /help для допомоги.";

pub const PENDING_APPROVAL: &str = "⏳ Твоя реєстрація очікує підтвердження адміністратора.\n\
Будь ласка, почекай трохи.";

pub const FIRST_NAME_TOO_SHORT: &str = "❌ Ім'я занадто коротке. Спробуй ще раз:";
pub const LAST_NAME_TOO_SHORT: &str = "❌ Прізвище занадто коротке. Спробуй ще раз:";

pub fn ask_last_name(first_name: &str) -> String {
    format!(
        "Добре, {}! Тепер введи своє прізвище:",
        escape_html(first_name)
    )
}

pub fn registration_submitted(first_name: &str, last_name: &str) -> String {
    format!(
        "✅ Дякую, {} {}!\n\n\
Твоя реєстрація відправлена адміністратору на розгляд.\n\
Очікуй підтвердження. Ми повідомимо тебе, коли зможеш користуватися ботом! 🕊️",
        escape_html(first_name),
        escape_html(last_name)
    )
}

pub fn admin_new_registration(
    first_name: &str,
    last_name: &str,
    platform_name: &str,
    handle: Option<&str>,
    member_id: i64,
    language: Option<&str>,
) -> String {
    let platform_name = if platform_name.trim().is_empty() {
        "не вказано".to_string()
    } else {
        escape_html(platform_name)
    };
    format!(
        "🔔 <b>Нова реєстрація!</b>\n\n\
📝 Вказане ім'я: {} {}\n\
👤 Ім'я в Telegram: {platform_name}\n\
🆔 Username: {}\n\
🔢 ID: <code>{member_id}</code>\n\
🌐 Мова: {}\n\n\
⚠️ Перевір, чи збігається вказане ім'я з реальним!",
        escape_html(first_name),
        escape_html(last_name),
        escape_html(&handle_or(handle, "немає username")),
        escape_html(language.unwrap_or("не вказано")),
    )
}

pub const BUTTON_APPROVE: &str = "✅ Підтвердити";
pub const BUTTON_REJECT: &str = "❌ Відхилити";

// ============== Name change ==============

pub const NOT_REGISTERED: &str = "❌ Ти ще не зареєстрований.\nВикористовуй /start для реєстрації.";

pub fn edit_name_intro(member: &Member) -> String {
    format!(
        "📝 <b>Редагування профілю</b>\n\n\
Зараз твоє ім'я: {}\n\n\
Введи нове ім'я або /cancel щоб скасувати:",
        escape_html(&member.full_name())
    )
}

pub const ASK_NEW_LAST_NAME: &str = "Добре! Тепер введи нове прізвище:";

pub fn name_change_submitted(old_name: &str, new_name: &str) -> String {
    format!(
        "✅ Запит на зміну імені надіслано!\n\n\
Старе ім'я: {}\n\
Нове ім'я: {}\n\n\
Очікуй підтвердження адміністратора.",
        escape_html(old_name),
        escape_html(new_name)
    )
}

pub fn admin_name_change_request(member: &Member, new_name: &str) -> String {
    format!(
        "🔄 <b>Запит на зміну імені!</b>\n\n\
👤 Користувач: {}\n\
🆔 Username: {}\n\
🔢 ID: <code>{}</code>\n\n\
📝 Хоче змінити на: {}\n\n\
⚠️ Перевір, чи це не спроба підробити чуже ім'я!",
        escape_html(&member.full_name()),
        escape_html(&handle_or(member.handle.as_deref(), "немає username")),
        member.id,
        escape_html(new_name)
    )
}

pub fn admin_name_change_approved(new_name: &str) -> String {
    format!(
        "✅ Зміну імені підтверджено!\n\nНове ім'я: {}",
        escape_html(new_name)
    )
}

pub fn member_name_change_approved(new_name: &str) -> String {
    format!(
        "✅ Твій запит на зміну імені підтверджено!\n\n\
Твоє нове ім'я: {}\n\n\
Тепер інші користувачі бачитимуть тебе під цим ім'ям.",
        escape_html(new_name)
    )
}

pub fn admin_name_change_rejected(member_name: &str) -> String {
    format!(
        "❌ Зміну імені відхилено для користувача {}",
        escape_html(member_name)
    )
}

pub const NAME_CHANGE_EXPIRED: &str = "⌛ Цей запит на зміну імені вже неактуальний.";

pub const MEMBER_NAME_CHANGE_REJECTED: &str = "❌ На жаль, твій запит на зміну імені відхилено.\n\
Якщо є питання, зв'яжись з адміністратором.";

// ============== Approval ==============

pub fn admin_member_approved(member_name: &str) -> String {
    format!("✅ Користувач {} підтверджений!", escape_html(member_name))
}

pub const MEMBER_APPROVED: &str = "🎉 Твою реєстрацію підтверджено!\n\n\
Тепер ти можеш користуватися ботом.\n\
Використовуй /send щоб надіслати анонімне повідомлення.";

pub fn admin_member_rejected(member_name: &str) -> String {
    format!("❌ Користувач {} відхилений.", escape_html(member_name))
}

pub const MEMBER_REJECTED: &str = "😔 На жаль, твою реєстрацію не підтверджено.\n\
Якщо є питання, зв'яжись з адміністратором групи.";

pub fn admin_member_deleted(member: &Member) -> String {
    format!(
        "✅ Користувача {} (ID: <code>{}</code>) видалено!",
        escape_html(&member.full_name()),
        member.id
    )
}

pub const MEMBER_DELETED: &str = "❌ Твій доступ до бота було скасовано адміністратором.\n\
Якщо є питання, зв'яжись з лідером молодіжної групи.";

pub const CANNOT_DELETE_SELF: &str = "❌ Ти не можеш видалити себе!";
pub const ADMIN_ONLY_ACTION: &str = "❌ Тільки адміністратор може це зробити.";
pub const ADMIN_ONLY_COMMAND: &str = "❌ Ця команда доступна тільки адміністратору.";
pub const MEMBER_NOT_FOUND: &str = "❌ Користувача не знайдено.";

// ============== Compose / relay ==============

pub const NOT_APPROVED: &str = "❌ Ти ще не підтверджений адміністратором.\n\
Зачекай на підтвердження або напиши /start для реєстрації.";

pub const REGISTER_FIRST: &str = "❌ Спочатку потрібно зареєструватися та отримати підтвердження.\n\
Використовуй /start";

pub const NO_RECIPIENTS: &str = "😔 Поки що немає інших підтверджених користувачів.\n\
Зачекай, поки хтось ще приєднається!";

pub const CHOOSE_RECIPIENT: &str = "💌 Кому хочеш надіслати анонімне повідомлення?\n\
Вибери отримувача зі списку:";

pub fn recipient_chosen(member_name: &str) -> String {
    format!(
        "💌 Ти обрав: {}\n\n\
Тепер напиши своє повідомлення. Воно буде надіслане анонімно.\n\n\
❗️ Пам'ятай: повідомлення повинно бути корисним!",
        escape_html(member_name)
    )
}

pub const WRITE_REPLY: &str = "✍️ Напиши свою відповідь. Вона буде надіслана анонімно тій людині, \
яка надіслала тобі повідомлення.";

pub const MESSAGE_NOT_FOUND: &str = "❌ Повідомлення не знайдено.";

pub const USE_SEND: &str = "Використовуй /send щоб вибрати, кому надіслати повідомлення.";

pub fn anonymous_message(text: &str) -> String {
    format!(
        "💌 Тобі надійшло анонімне повідомлення:\n\n\
{}\n\n\
───────────────\n\
Хтось із нашої спільноти думає про тебе! 🕊️",
        escape_html(text)
    )
}

pub fn anonymous_reply(text: &str) -> String {
    format!(
        "💬 Відповідь на твоє анонімне повідомлення:\n\n\
{}\n\n\
───────────────\n\
Людина, якій ти писав(ла), відповіла! 🕊️",
        escape_html(text)
    )
}

pub const BUTTON_REPLY: &str = "💬 Відповісти анонімно";

pub const MESSAGE_SENT: &str = "✅ Твоє повідомлення надіслано!\n\n\
Хочеш надіслати ще одне? Використовуй /send";

pub const MESSAGE_FAILED: &str = "❌ Не вдалося надіслати повідомлення. Спробуй пізніше.";

pub const EMPTY_MESSAGE: &str = "❌ Повідомлення не може бути порожнім. Напиши текст:";

pub fn message_too_long(length: usize, max: usize) -> String {
    format!(
        "❌ Повідомлення занадто довге ({length} символів, максимум {max}).\n\
Скороти його і надішли ще раз:"
    )
}

// ============== Generic ==============

pub const CANCELLED: &str = "❌ Операцію скасовано.";
pub const TRY_LATER: &str = "⚠️ Сервіс тимчасово недоступний. Спробуй пізніше.";
pub const INVALID_ACTION: &str = "❌ Невідома дія.";

pub fn unknown_command(cmd: &str) -> String {
    format!(
        "Невідома команда: /{}\nВикористовуй /help для допомоги.",
        escape_html(cmd)
    )
}

pub fn my_info(member: &Member) -> String {
    let status = if member.approved {
        "✅ Підтверджений"
    } else {
        "⏳ Очікує підтвердження"
    };
    format!(
        "👤 <b>Твоя інформація:</b>\n\n\
Ім'я: {}\n\
Username: {}\n\
Статус: {status}\n\n\
💡 Щоб змінити ім'я, використовуй /editname",
        escape_html(&member.full_name()),
        escape_html(&handle_or(member.handle.as_deref(), NO_HANDLE)),
    )
}

pub const HELP_MEMBER: &str = "📖 <b>Довідка по боту Таємна Пошта</b>\n\n\
🔹 /start - Реєстрація в боті\n\
🔹 /send - Надіслати анонімне повідомлення\n\
🔹 /editname - Змінити своє ім'я\n\
🔹 /myinfo - Подивитись свою інформацію\n\
🔹 /cancel - Скасувати поточну дію\n\
🔹 /help - Показати цю довідку\n\n\
❓ <b>Як це працює:</b>\n\
1. Зареєструйся і дочекайся підтвердження\n\
2. Використовуй /send щоб вибрати отримувача\n\
3. Напиши своє повідомлення\n\
4. Воно буде надіслано анонімно!\n\
5. Якщо хтось надішле тобі повідомлення - ти можеш відповісти анонімно\n\n\
💡 Використовуй бот для підтримки та добрих слів! 🕊️";

pub const HELP_ADMIN: &str = "📖 <b>Довідка для адміністратора</b>\n\n\
👤 <b>Команди для користувачів:</b>\n\
🔹 /start - Реєстрація в боті\n\
🔹 /send - Надіслати анонімне повідомлення\n\
🔹 /editname - Змінити своє ім'я\n\
🔹 /myinfo - Подивитись свою інформацію\n\
🔹 /cancel - Скасувати поточну дію\n\
🔹 /help - Показати цю довідку\n\n\
👨‍💼 <b>Команди адміністратора:</b>\n\
🔹 /admin - Статистика боту\n\
🔹 /users - Список всіх користувачів (з можливістю видалення)\n\
🔹 /deleteuser [ID] - Видалити користувача за ID\n\n\
💡 Використовуй бот для підтримки молоді! 🕊️";

// ============== Admin console ==============

pub fn stats(s: &Stats) -> String {
    format!(
        "📊 <b>Статистика боту:</b>\n\n\
👥 Користувачі:\n\
• Всього: {}\n\
• Підтверджених: {}\n\
• Очікують: {}\n\n\
💌 Повідомлення:\n\
• За сьогодні: {}\n\
• За тиждень: {}\n\
• Всього: {}\n\n\
💡 /users - список користувачів\n\
💡 /deleteuser - видалити користувача",
        s.total_members,
        s.approved_members,
        s.pending_members(),
        s.messages_today,
        s.messages_week,
        s.total_messages
    )
}

pub const NO_MEMBERS: &str = "📋 Користувачів ще немає.";

pub fn status_mark(member: &Member) -> &'static str {
    if member.approved {
        "✅"
    } else {
        "⏳"
    }
}

pub fn member_list(members: &[Member]) -> String {
    let mut out = String::from("👥 <b>Список всіх користувачів:</b>\n\n");
    for m in members {
        out.push_str(&format!(
            "{} {}\n   ID: <code>{}</code> | {}\n\n",
            status_mark(m),
            escape_html(&m.full_name()),
            m.id,
            escape_html(&handle_or(m.handle.as_deref(), NO_HANDLE)),
        ));
    }
    out.push_str("💡 Натисни на користувача щоб видалити:");
    out
}

pub const DELETE_PICKER: &str = "🗑 <b>Видалення користувачів</b>\n\n\
Натисни на користувача щоб видалити:";

pub const DELETE_USAGE: &str = "❌ Невірний ID. Використання: /deleteuser [ID]";
