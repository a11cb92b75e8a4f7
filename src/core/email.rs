use crate::core::{ConfigProvider, ContactMessage, OutboundEmail, Result};
use serde::Serialize;
use tera::Tera;

// The `.html` suffix turns on tera's autoescaping for every value below.
const TEMPLATE_NAME: &str = "contact_email.html";
const TEMPLATE: &str = include_str!("../../templates/contact_email.html");

#[derive(Serialize)]
struct TemplateContext<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// Turns a validated contact message into the email delivered to the site owner.
#[derive(Debug, Clone)]
pub struct EmailComposer {
    tera: Tera,
}

impl EmailComposer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn compose<C: ConfigProvider>(
        &self,
        config: &C,
        message: &ContactMessage,
    ) -> Result<OutboundEmail> {
        let context = tera::Context::from_serialize(TemplateContext {
            name: &message.name,
            email: &message.email,
            message: &message.message,
        })?;
        let html = self.tera.render(TEMPLATE_NAME, &context)?;

        Ok(OutboundEmail {
            from: config.sender().to_string(),
            to: vec![config.recipient().to_string()],
            subject: format!("{}{}", config.subject_prefix(), message.name),
            reply_to: message.email.clone(),
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelaySettings;

    fn settings() -> RelaySettings {
        RelaySettings {
            recipient: "owner@example.com".to_string(),
            ..RelaySettings::default()
        }
    }

    fn message(name: &str, email: &str, text: &str) -> ContactMessage {
        ContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            message: text.to_string(),
        }
    }

    #[test]
    fn test_compose_fills_envelope() {
        let composer = EmailComposer::new().unwrap();
        let email = composer
            .compose(&settings(), &message("Jane Doe", "jane@example.com", "Hello!"))
            .unwrap();

        assert_eq!(email.from, "Portfolio Contact <onboarding@resend.dev>");
        assert_eq!(email.to, vec!["owner@example.com".to_string()]);
        assert_eq!(email.subject, "New Portfolio Contact: Jane Doe");
        assert_eq!(email.reply_to, "jane@example.com");
    }

    #[test]
    fn test_html_body_embeds_fields() {
        let composer = EmailComposer::new().unwrap();
        let email = composer
            .compose(
                &settings(),
                &message("Jane Doe", "jane@example.com", "Line one\nLine two"),
            )
            .unwrap();

        assert!(email.html.contains("<strong>Name:</strong> Jane Doe"));
        assert!(email
            .html
            .contains(r#"<a href="mailto:jane@example.com">jane@example.com</a>"#));
        assert!(email
            .html
            .contains("<p style=\"white-space: pre-wrap;\">Line one\nLine two</p>"));
    }

    #[test]
    fn test_html_body_escapes_markup() {
        let composer = EmailComposer::new().unwrap();
        let email = composer
            .compose(
                &settings(),
                &message("<b>Mallory</b>", "m@example.com", "<script>alert(1)</script>"),
            )
            .unwrap();

        assert!(!email.html.contains("<script>"));
        assert!(!email.html.contains("<b>Mallory</b>"));
        assert!(email.html.contains("&lt;script&gt;"));
        // Subject is plain text and keeps the name as submitted.
        assert_eq!(email.subject, "New Portfolio Contact: <b>Mallory</b>");
    }
}
