use crate::views::states::state_code;

/// Validates HTTP/HTTPS URL
pub fn validate_http_url(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("URL cannot be empty".to_string());
    }
    let url = url::Url::parse(value).map_err(|e| format!("Invalid URL: {}", e))?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return Err("URL must use http or https scheme".to_string()),
    }
    if url.host_str().filter(|h| !h.is_empty()).is_none() {
        return Err("URL must have a valid host".to_string());
    }
    Ok(())
}

/// Accepts `example.com` style input by assuming https
pub fn normalize_website(value: &str) -> Result<Option<String>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let candidate = if value.contains("://") {
        value.to_string()
    } else {
        format!("https://{value}")
    };
    validate_http_url(&candidate).map_err(|_| "Website must be a valid web address".to_string())?;
    Ok(Some(candidate))
}

/// Loose shape check; the auth service does the real verification
pub fn validate_email(value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Email is required".to_string());
    }
    match value.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err("Enter a valid email address".to_string()),
    }
}

/// Two-letter code of a US state (or DC) given its code or name, case-insensitive
pub fn validate_state_code(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("State is required".to_string());
    }
    match state_code(value) {
        Some(code) => Ok(code.to_string()),
        None => Err(format!("Unknown state: {value}")),
    }
}

/// Password rules of the reset form
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

/// First `(label, value)` pair whose value is blank, as an error message
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), String> {
    match fields
        .iter()
        .find(|(_, value)| value.map(str::trim).unwrap_or_default().is_empty())
    {
        Some((label, _)) => Err(format!("{label} is required")),
        None => Ok(()),
    }
}
