// Helper functions for safe logging and HTML output

use serde_json::Value;

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            let first: String = parts[0].chars().take(1).collect();
            format!("{}***@{}", first, parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Masks a list of addresses, e.g. a batched recipient list
pub fn safe_email_list_log(emails: &[String]) -> String {
    emails
        .iter()
        .map(|e| safe_email_log(e))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Rewrites every `email`-like string field of a JSON document with its masked form
pub fn mask_emails_in_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                let lower = key.to_lowercase();
                if lower == "email" || lower == "to" || lower.ends_with("email") {
                    match field {
                        Value::String(s) => *s = safe_email_log(s),
                        Value::Array(items) => {
                            for item in items.iter_mut() {
                                if let Value::String(s) = item {
                                    *s = safe_email_log(s);
                                }
                            }
                        }
                        other => mask_emails_in_json(other),
                    }
                } else {
                    mask_emails_in_json(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_emails_in_json),
        _ => {}
    }
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
