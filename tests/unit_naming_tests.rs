//! # Naming Module Unit Tests / 命名模块单元测试
//!
//! Tests for file name sanitizing and Python identifier derivation.
//!
//! 测试文件名清理和 Python 标识符派生。

use testengine::generator::naming::{
    is_identifier, load_user_class_name, sanitize, snake_identifier, test_class_name, timestamp, FALLBACK_NAME,
    MAX_NAME_LEN,
};

#[cfg(test)]
mod sanitize_tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_lowercase_alphanumerics() {
        assert_eq!(sanitize("Login API-v2"), "login_api_v2");
        assert_eq!(sanitize("checkout_flow"), "checkout_flow");
    }

    #[test]
    fn test_sanitize_drops_path_separators_and_punctuation() {
        assert_eq!(sanitize("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize("a/b\\c:d*e?f"), "abcdef");
    }

    #[test]
    fn test_sanitize_non_ascii_falls_back() {
        assert_eq!(sanitize("用户登录"), FALLBACK_NAME);
        assert_eq!(sanitize(""), FALLBACK_NAME);
        assert_eq!(sanitize("用户 login"), "_login");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "a".repeat(200);
        assert_eq!(sanitize(&long).len(), MAX_NAME_LEN);
    }
}

#[cfg(test)]
mod identifier_tests {
    use super::*;

    #[test]
    fn test_snake_identifier_prefixes_leading_digit() {
        assert_eq!(snake_identifier("2fa login"), "n_2fa_login");
    }

    #[test]
    fn test_snake_identifier_escapes_keywords() {
        assert_eq!(snake_identifier("class"), "class_");
        assert_eq!(snake_identifier("import"), "import_");
    }

    #[test]
    fn test_class_names() {
        assert_eq!(test_class_name("user login"), "TestUserLogin");
        assert_eq!(load_user_class_name("checkout flow"), "CheckoutFlowUser");
        assert_eq!(load_user_class_name("压测"), "LoadTestUser");
        assert_eq!(load_user_class_name("3 steps"), "Load3StepsUser");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("TestLogin"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier("class"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_timestamp_shape() {
        let stamp = timestamp();
        // YYYYMMDD_HHMMSS_micros
        assert_eq!(stamp.len(), 22);
        assert_eq!(stamp.matches('_').count(), 2);
    }
}
