//! Display formatting and client-side input checks used by views and API wrappers.

use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_RESUME_BYTES: u64 = 10 * 1024 * 1024;
pub const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

pub fn is_valid_email(email: &str) -> bool {
    let regex = EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    regex.is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Lower-cased extension, or `None` for names like `resume` or `.bashrc`.
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

pub fn is_valid_resume_file(file_name: &str) -> bool {
    file_extension(file_name).is_some_and(|ext| RESUME_EXTENSIONS.contains(&ext.as_str()))
}

pub fn resume_mime_type(file_name: &str) -> &'static str {
    match file_extension(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

pub fn format_salary(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (None, None) => "Not specified".to_string(),
        (Some(min), None) => format!("${}+", group_thousands(min)),
        (None, Some(max)) => format!("Up to ${}", group_thousands(max)),
        (Some(min), Some(max)) => format!("${} - ${}", group_thousands(min), group_thousands(max)),
    }
}

pub fn format_date(date: Option<&NaiveDateTime>) -> String {
    match date {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => "Date not available".to_string(),
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

pub fn initials(first_name: Option<&str>, last_name: Option<&str>) -> String {
    let initial = |name: Option<&str>| {
        name.and_then(|n| n.trim().chars().next())
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    };
    let result = initial(first_name) + &initial(last_name);
    if result.is_empty() {
        "U".to_string()
    } else {
        result
    }
}

/// Whole-unit amount with comma grouping: 125000.0 → "125,000".
fn group_thousands(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.io"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_password_length() {
        assert!(is_valid_password("abcdef"));
        assert!(!is_valid_password("abcde"));
    }

    #[test]
    fn test_resume_file_types() {
        assert!(is_valid_resume_file("cv.PDF"));
        assert!(is_valid_resume_file("cv.docx"));
        assert!(!is_valid_resume_file("cv.txt"));
        assert!(!is_valid_resume_file("cv"));
        assert_eq!(resume_mime_type("cv.doc"), "application/msword");
    }

    #[test]
    fn test_salary_formatting() {
        assert_eq!(format_salary(None, None), "Not specified");
        assert_eq!(format_salary(Some(90000.0), None), "$90,000+");
        assert_eq!(format_salary(Some(1000.0), Some(1250000.0)), "$1,000 - $1,250,000");
        assert_eq!(format_salary(Some(950.0), Some(999.0)), "$950 - $999");
    }

    #[test]
    fn test_date_formatting() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(format_date(Some(&date)), "Mar 5, 2024");
        assert_eq!(format_date(None), "Date not available");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("déjà vu encore", 4), "déjà...");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials(Some("ada"), Some("lovelace")), "AL");
        assert_eq!(initials(None, Some("Hopper")), "H");
        assert_eq!(initials(None, None), "U");
    }
}
