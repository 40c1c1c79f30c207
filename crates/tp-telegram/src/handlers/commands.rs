/// Split `/cmd@botname args` into a lowercased command name and its argument text.
pub(crate) fn parse_command(text: &str) -> (String, String) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bot_suffix_and_keeps_args() {
        assert_eq!(
            parse_command("/DeleteUser@TainaPoshtaBot  1125355606 "),
            ("deleteuser".to_string(), "1125355606".to_string())
        );
        assert_eq!(parse_command("/start"), ("start".to_string(), String::new()));
        assert_eq!(
            parse_command("/send\nextra"),
            ("send".to_string(), "extra".to_string())
        );
    }
}
