use crate::validation::ValidSubmission;
use serde::Serialize;
use tinytemplate::TinyTemplate;

const HTML_TEMPLATE_NAME: &str = "notification-html";
const TEXT_TEMPLATE_NAME: &str = "notification-text";
const HTML_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/notification.html"
));
const TEXT_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/notification.txt"
));

#[derive(Serialize)]
struct Context<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

pub struct NotificationBodies {
    pub html: String,
    pub text: String,
}

/// Renders the email delivered to the site owner. The HTML body goes through
/// tinytemplate's default formatter, which escapes user text for HTML
/// context; the plain-text body is rendered verbatim.
pub fn render_notification(submission: &ValidSubmission) -> NotificationBodies {
    let mut tt = TinyTemplate::new();
    tt.add_template(HTML_TEMPLATE_NAME, HTML_TEMPLATE).unwrap();
    tt.add_template(TEXT_TEMPLATE_NAME, TEXT_TEMPLATE).unwrap();
    let context = Context {
        name: submission.name,
        email: submission.email,
        subject: submission.subject,
        message: submission.message,
    };
    NotificationBodies {
        html: tt.render(HTML_TEMPLATE_NAME, &context).unwrap(),
        text: tt.render(TEXT_TEMPLATE_NAME, &context).unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::render_notification;
    use crate::validation::ValidSubmission;
    use googletest::prelude::*;

    const MALICIOUS_CONTENT: &str = "<script>doEvil();</script>";

    fn arbitrary_submission() -> ValidSubmission<'static> {
        ValidSubmission {
            name: "Jo",
            email: "jo@x.com",
            subject: "Hi",
            message: "Test",
        }
    }

    #[test]
    fn includes_submitter_details_in_both_bodies() -> Result<()> {
        let bodies = render_notification(&arbitrary_submission());

        verify_that!(bodies.html, contains_substring("jo@x.com"))?;
        verify_that!(bodies.text, contains_substring("jo@x.com"))?;
        verify_that!(bodies.text, contains_substring("Test"))
    }

    #[test]
    fn escapes_user_input_in_html_message() -> Result<()> {
        let bodies = render_notification(&ValidSubmission {
            message: MALICIOUS_CONTENT,
            ..arbitrary_submission()
        });

        verify_that!(bodies.html, not(contains_substring(MALICIOUS_CONTENT)))?;
        verify_that!(bodies.html, contains_substring("&lt;script&gt;"))
    }

    #[test]
    fn escapes_user_input_in_html_name_and_subject() -> Result<()> {
        let bodies = render_notification(&ValidSubmission {
            name: MALICIOUS_CONTENT,
            subject: MALICIOUS_CONTENT,
            ..arbitrary_submission()
        });

        verify_that!(bodies.html, not(contains_substring(MALICIOUS_CONTENT)))
    }

    #[test]
    fn escapes_quotes_and_ampersands_in_html() -> Result<()> {
        let bodies = render_notification(&ValidSubmission {
            message: r#"Tom & Jerry's "show""#,
            ..arbitrary_submission()
        });

        verify_that!(bodies.html, contains_substring("&amp;"))?;
        verify_that!(bodies.html, contains_substring("&quot;"))
    }

    #[test]
    fn leaves_the_text_body_unescaped() -> Result<()> {
        let bodies = render_notification(&ValidSubmission {
            message: MALICIOUS_CONTENT,
            ..arbitrary_submission()
        });

        verify_that!(bodies.text, contains_substring(MALICIOUS_CONTENT))
    }
}
