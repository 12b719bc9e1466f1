//! # Naming Module / 命名模块
//!
//! Derives file-system-safe names and Python identifiers from free-form case
//! names, which are often not ASCII.
//!
//! 从自由格式的用例名称（通常不是 ASCII）派生文件系统安全的名称和 Python 标识符。

use chrono::Local;

/// Upper bound on sanitized name length.
pub const MAX_NAME_LEN: usize = 50;

/// Fallback used when nothing of a name survives sanitizing.
pub const FALLBACK_NAME: &str = "case";

/// Lowercases ASCII letters and digits, maps space, `_` and `-` to `_`,
/// drops everything else and caps the result at [`MAX_NAME_LEN`] characters.
/// Never returns an empty string.
///
/// 保留小写 ASCII 字母和数字，将空格、`_` 和 `-` 映射为 `_`，丢弃其他字符，
/// 并截断到 [`MAX_NAME_LEN`] 个字符。不会返回空字符串。
///
/// # Examples
/// ```
/// use testengine::generator::naming::sanitize;
/// assert_eq!(sanitize("Login API-v2"), "login_api_v2");
/// assert_eq!(sanitize("用户登录"), "case");
/// ```
pub fn sanitize(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            ' ' | '_' | '-' => Some('_'),
            _ => None,
        })
        .take(MAX_NAME_LEN)
        .collect();

    if sanitized.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        sanitized
    }
}

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// A sanitized name that is also a valid Python identifier.
/// 同时也是合法 Python 标识符的清理后名称。
pub fn snake_identifier(name: &str) -> String {
    let sanitized = sanitize(name);
    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        format!("n_{}", sanitized)
    } else if PYTHON_KEYWORDS.contains(&sanitized.as_str()) {
        format!("{}_", sanitized)
    } else {
        sanitized
    }
}

/// Joins the ASCII words of `name` in PascalCase.
fn pascal_words(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let rest: String = chars.map(|c| c.to_ascii_lowercase()).collect();
                    format!("{}{}", first.to_ascii_uppercase(), rest)
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Class name of a pytest test class, e.g. `TestUserLogin`.
pub fn test_class_name(name: &str) -> String {
    format!("Test{}", pascal_words(name))
}

/// Class name of a Locust user, e.g. `CheckoutFlowUser`.
/// Falls back to `LoadTest` when the name has no ASCII words.
pub fn load_user_class_name(name: &str) -> String {
    let words = pascal_words(name);
    if words.is_empty() {
        "LoadTestUser".to_string()
    } else if words.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Load{}User", words)
    } else {
        format!("{}User", words)
    }
}

/// Accepts a caller-supplied class name only if it is a Python identifier.
pub fn is_identifier(name: &str) -> bool {
    if PYTHON_KEYWORDS.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Timestamp used in generated file names, precise to the microsecond.
/// 生成文件名中使用的时间戳，精确到微秒。
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S_%6f").to_string()
}
