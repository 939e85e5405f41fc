//! Directive line model.
//!
//! A PAM service file holds one directive per line, e.g.
//!
//! ```text
//! auth       sufficient     pam_tid.so
//! ```
//!
//! Two lines are the same directive when they split into the same
//! whitespace-separated tokens, in the same order.  Column alignment, tabs and
//! runs of spaces are ignored; case and punctuation are not.

use std::fmt;

/// PAM module that provides Touch ID authentication.
pub const PAM_TID_MODULE: &str = "pam_tid.so";

const AUTH_TYPE: &str = "auth";
const COMMENTED_AUTH_TYPE: &str = "#auth";
const CONTROL_SUFFICIENT: &str = "sufficient";

/// One configuration line represented as its ordered tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectiveLine {
    tokens: Vec<String>,
}

impl DirectiveLine {
    /// Builds a directive from already-split tokens.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a raw line on whitespace.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split_whitespace())
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Returns `true` if `raw` splits into exactly this token sequence.
    ///
    /// An empty directive matches blank and whitespace-only lines.
    pub fn matches(&self, raw: &str) -> bool {
        raw.split_whitespace()
            .eq(self.tokens.iter().map(String::as_str))
    }

    /// Canonical text form: tokens joined by a single space, no newline.
    pub fn render(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for DirectiveLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Whether Touch ID is allowed to satisfy `sudo` authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchIdMode {
    Enabled,
    Disabled,
}

impl TouchIdMode {
    /// The directive line that encodes this mode.
    ///
    /// | Mode       | Line                          |
    /// |------------|-------------------------------|
    /// | `Enabled`  | `auth sufficient pam_tid.so`  |
    /// | `Disabled` | `#auth sufficient pam_tid.so` |
    pub fn directive(self) -> DirectiveLine {
        let auth_type = match self {
            TouchIdMode::Enabled => AUTH_TYPE,
            TouchIdMode::Disabled => COMMENTED_AUTH_TYPE,
        };
        DirectiveLine::new([auth_type, CONTROL_SUFFICIENT, PAM_TID_MODULE])
    }

    pub fn opposite(self) -> Self {
        match self {
            TouchIdMode::Enabled => TouchIdMode::Disabled,
            TouchIdMode::Disabled => TouchIdMode::Enabled,
        }
    }

    /// Identifies which mode a raw file line encodes, if any.
    pub fn detect(raw: &str) -> Option<Self> {
        [TouchIdMode::Enabled, TouchIdMode::Disabled]
            .into_iter()
            .find(|mode| mode.directive().matches(raw))
    }

    /// Human-readable status line printed after a successful toggle.
    pub fn status_message(self) -> &'static str {
        match self {
            TouchIdMode::Enabled => "enable touch id for sudo",
            TouchIdMode::Disabled => "disable touch id for sudo",
        }
    }
}

impl fmt::Display for TouchIdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TouchIdMode::Enabled => f.write_str("enabled"),
            TouchIdMode::Disabled => f.write_str("disabled"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Canonical lines ───────────────────────────────────────────────────────

    #[test]
    fn test_enabled_directive_tokens() {
        let line = TouchIdMode::Enabled.directive();
        assert_eq!(line.tokens(), ["auth", "sufficient", "pam_tid.so"]);
    }

    #[test]
    fn test_disabled_directive_tokens() {
        let line = TouchIdMode::Disabled.directive();
        assert_eq!(line.tokens(), ["#auth", "sufficient", "pam_tid.so"]);
    }

    #[test]
    fn test_directive_renders_with_single_spaces() {
        assert_eq!(
            TouchIdMode::Enabled.directive().to_string(),
            "auth sufficient pam_tid.so"
        );
        assert_eq!(
            TouchIdMode::Disabled.directive().render(),
            "#auth sufficient pam_tid.so"
        );
    }

    #[test]
    fn test_opposite_flips_mode() {
        assert_eq!(TouchIdMode::Enabled.opposite(), TouchIdMode::Disabled);
        assert_eq!(TouchIdMode::Disabled.opposite(), TouchIdMode::Enabled);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            TouchIdMode::Enabled.status_message(),
            "enable touch id for sudo"
        );
        assert_eq!(
            TouchIdMode::Disabled.status_message(),
            "disable touch id for sudo"
        );
    }

    // ── Token-sequence equality ───────────────────────────────────────────────

    #[test]
    fn test_matches_ignores_extra_spaces_and_tabs() {
        // Arrange
        let line = TouchIdMode::Enabled.directive();

        // Act / Assert
        assert!(line.matches("auth  sufficient   pam_tid.so"));
        assert!(line.matches("auth\tsufficient\tpam_tid.so"));
        assert!(line.matches("   auth sufficient pam_tid.so   "));
    }

    #[test]
    fn test_matches_is_case_sensitive() {
        let line = TouchIdMode::Enabled.directive();
        assert!(!line.matches("Auth sufficient pam_tid.so"));
    }

    #[test]
    fn test_matches_rejects_different_length() {
        let line = TouchIdMode::Enabled.directive();
        assert!(!line.matches("auth sufficient"));
        assert!(!line.matches("auth sufficient pam_tid.so debug"));
    }

    #[test]
    fn test_matches_rejects_different_element() {
        let line = TouchIdMode::Enabled.directive();
        assert!(!line.matches("auth required pam_tid.so"));
    }

    #[test]
    fn test_matches_is_order_sensitive() {
        let line = TouchIdMode::Enabled.directive();
        assert!(!line.matches("sufficient auth pam_tid.so"));
    }

    #[test]
    fn test_empty_directive_matches_blank_line() {
        let line = DirectiveLine::new(Vec::<String>::new());
        assert!(line.matches(""));
        assert!(line.matches("   \t"));
        assert!(!line.matches("auth"));
    }

    #[test]
    fn test_parse_then_compare_equals_token_built_line() {
        let parsed = DirectiveLine::parse("  #auth \t sufficient pam_tid.so");
        assert_eq!(parsed, TouchIdMode::Disabled.directive());
    }

    // ── Mode detection ────────────────────────────────────────────────────────

    #[test]
    fn test_detect_recognises_both_modes() {
        assert_eq!(
            TouchIdMode::detect("auth sufficient pam_tid.so"),
            Some(TouchIdMode::Enabled)
        );
        assert_eq!(
            TouchIdMode::detect("#auth   sufficient pam_tid.so"),
            Some(TouchIdMode::Disabled)
        );
    }

    #[test]
    fn test_detect_returns_none_for_unrelated_line() {
        assert_eq!(TouchIdMode::detect("auth include sudo"), None);
        // A space after the hash is a different first token.
        assert_eq!(TouchIdMode::detect("# auth sufficient pam_tid.so"), None);
    }
}
