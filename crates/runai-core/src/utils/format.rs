/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Uppercase first letter of an email, shown as the account avatar
pub fn avatar_letter(email: &str) -> char {
    email
        .trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("éééééé", 5), "éé...");
    }

    #[test]
    fn test_avatar_letter() {
        assert_eq!(avatar_letter("alice@example.com"), 'A');
        assert_eq!(avatar_letter("  émile@x.fr"), 'É');
        assert_eq!(avatar_letter(""), '?');
    }
}
