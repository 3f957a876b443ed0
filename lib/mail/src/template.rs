//! Email templates.

/// The welcome/activation email sent at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeEmail {
    pub username: String,
    /// Full activation URL, `{frontend_url}/confirm/{token}`.
    pub activation_url: String,
}

impl WelcomeEmail {
    /// Renders the subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("{}, finish setting up your account", self.username)
    }

    /// Renders the HTML body.
    #[must_use]
    pub fn body_html(&self) -> String {
        format!(
            "<p>Hi {username},</p>\
             <p>Thanks for registering. Confirm your account by clicking the link below:</p>\
             <p><a href=\"{url}\">{url}</a></p>\
             <p>The link expires shortly, so don't wait too long.</p>",
            username = self.username,
            url = self.activation_url,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WelcomeEmail {
        WelcomeEmail {
            username: "ada".to_string(),
            activation_url: "http://localhost:3000/confirm/tok123".to_string(),
        }
    }

    #[test]
    fn subject_contains_username() {
        assert!(sample().subject().contains("ada"));
    }

    #[test]
    fn body_contains_activation_url() {
        let body = sample().body_html();
        assert!(body.contains("http://localhost:3000/confirm/tok123"));
        assert!(body.contains("ada"));
    }
}
