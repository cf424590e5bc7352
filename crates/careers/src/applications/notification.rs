use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::domain::ApplicationSubmission;
use super::resume::ResumeAttachment;

/// Transport-agnostic notification sent to the careers mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEmail {
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<ResumeAttachment>,
}

impl NotificationEmail {
    /// Compose the notification. Every applicant-supplied value is escaped
    /// before it reaches the HTML body.
    pub fn compose(
        full_name: &str,
        email: &str,
        submission: &ApplicationSubmission,
        attachment: Option<ResumeAttachment>,
        received_at: DateTime<Utc>,
    ) -> Self {
        let subject = build_subject(full_name, submission.job_title());
        let html_body = render_html(
            full_name,
            email,
            submission,
            attachment.as_ref(),
            received_at,
        );

        Self {
            subject,
            html_body,
            attachment,
        }
    }
}

fn build_subject(full_name: &str, job_title: Option<&str>) -> String {
    let subject = match job_title {
        Some(title) => format!("New Job Application from {full_name} for {title}"),
        None => format!("New Job Application from {full_name}"),
    };
    subject
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn render_html(
    full_name: &str,
    email: &str,
    submission: &ApplicationSubmission,
    attachment: Option<&ResumeAttachment>,
    received_at: DateTime<Utc>,
) -> String {
    let mut html = String::new();
    html.push_str("<div style=\"font-family: Arial, sans-serif; padding: 16px;\">\n");
    html.push_str("<h2>New Job Application</h2>\n");
    writeln!(
        html,
        "<p><strong>Full Name:</strong> {}</p>",
        escape_html(full_name)
    )
    .expect("write name");
    writeln!(html, "<p><strong>Email:</strong> {}</p>", escape_html(email)).expect("write email");

    if let Some(message) = submission.message_text() {
        let paragraphs = message
            .lines()
            .map(escape_html)
            .collect::<Vec<_>>()
            .join("<br/>");
        writeln!(html, "<p><strong>Message:</strong> {paragraphs}</p>").expect("write message");
    }

    let details = submission.job_details();
    if !details.is_empty() {
        html.push_str("<h3>Position Details</h3>\n");
        for (label, value) in details {
            writeln!(
                html,
                "<p><strong>{label}:</strong> {}</p>",
                escape_html(value)
            )
            .expect("write job detail");
        }
    }

    if let Some(attachment) = attachment {
        writeln!(
            html,
            "<p><strong>Resume:</strong> attached as {}</p>",
            escape_html(&attachment.file_name)
        )
        .expect("write attachment note");
    }

    html.push_str("<hr/>\n");
    writeln!(
        html,
        "<p>This email was sent automatically from the Empowerment Group career page on {}.</p>",
        received_at.format("%B %d, %Y at %H:%M UTC")
    )
    .expect("write footer");
    html.push_str("</div>\n");

    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn received_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 19, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn applicant_text_is_escaped() {
        let submission = ApplicationSubmission {
            message: Some("<script>alert('x')</script>\nsecond line".to_string()),
            ..ApplicationSubmission::default()
        };

        let email = NotificationEmail::compose(
            "<b>Jane</b>",
            "jane@x.com",
            &submission,
            None,
            received_at(),
        );

        assert!(!email.html_body.contains("<script>"));
        assert!(!email.html_body.contains("<b>Jane</b>"));
        assert!(email.html_body.contains("&lt;b&gt;Jane&lt;/b&gt;"));
        assert!(email
            .html_body
            .contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;<br/>second line"));
    }

    #[test]
    fn subject_names_applicant_and_position() {
        let submission = ApplicationSubmission {
            job_title: Some("Backend Engineer".to_string()),
            country: Some("Qatar".to_string()),
            ..ApplicationSubmission::default()
        };
        let email =
            NotificationEmail::compose("Jane Doe", "jane@x.com", &submission, None, received_at());

        assert_eq!(
            email.subject,
            "New Job Application from Jane Doe for Backend Engineer"
        );
        assert!(email
            .html_body
            .contains("<p><strong>Country:</strong> Qatar</p>"));
        assert!(email.html_body.contains("October 19, 2025"));
        assert!(email.attachment.is_none());
    }

    #[test]
    fn subject_drops_control_characters() {
        let email = NotificationEmail::compose(
            "Jane\r\nBcc: someone@else",
            "jane@x.com",
            &ApplicationSubmission::default(),
            None,
            received_at(),
        );
        assert!(!email.subject.contains('\n'));
        assert!(!email.subject.contains('\r'));
    }
}
