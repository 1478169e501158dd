/// Key builders for cached entries

/// Latest state of a bot, keyed by token id
pub fn bot_state_key(token_id: &str) -> String {
    format!("bot:{}", token_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_state_key() {
        assert_eq!(bot_state_key("42"), "bot:42");
    }
}
