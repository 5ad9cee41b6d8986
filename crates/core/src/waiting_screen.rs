/// Detect interstitial pages (bot checks, countdown redirects) that have not
/// yet rendered the real login form. Works on the visible body text so that
/// strings inside inline scripts do not count.

const WAITING_KEYWORDS: &[&str] = &[
    "please wait",
    "just a moment",
    "checking your browser",
    "verifying you are human",
    "ddos protection",
    "enable javascript and cookies to continue",
    "preparing redirect",
];

/// Pages below this size that mention a redirect are treated as interstitials
const SMALL_PAGE_BYTES: usize = 1000;

pub fn is_waiting_screen(body_text: &str, html_size: usize) -> bool {
    let body_lower = body_text.to_lowercase();

    if WAITING_KEYWORDS.iter().any(|k| body_lower.contains(k)) {
        return true;
    }

    if html_size < SMALL_PAGE_BYTES && body_lower.contains("redirect") {
        return true;
    }

    // Countdown timers ("redirecting in 5 4 3 ...")
    body_lower.contains("redirecting in")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_waiting_screen() {
        assert!(is_waiting_screen("Please Wait...", 120));
        assert!(is_waiting_screen("Just a moment...", 4000));
        assert!(is_waiting_screen("Redirecting in 5 seconds", 3000));
        assert!(is_waiting_screen("You will be redirected", 300));
    }

    #[test]
    fn test_login_page_is_not_waiting_screen() {
        assert!(!is_waiting_screen("Sign in\nEmail\nPassword\nForgot password?", 48_000));
    }

    #[test]
    fn test_large_page_mentioning_redirect_is_not_waiting_screen() {
        assert!(!is_waiting_screen("Sign in. Redirect me to the dashboard afterwards", 5000));
    }

    #[test]
    fn test_empty_body_text_is_not_waiting_screen() {
        // A bundle whose scripts say "please wait" renders no such visible text
        assert!(!is_waiting_screen("", 250_000));
    }
}
