//! Recovery email templates.
//!
//! Each stage has its own subject and opening line; every body names the
//! funnel step the lead stopped at and links back to the signup page with
//! the lead id so the funnel can resume.

use brnno_core::funnel::SignupStep;
use brnno_core::recovery::RecoveryStage;
use brnno_core::types::DbId;

use crate::mailer::OutgoingEmail;

/// What a recovery email needs to know about the lead.
#[derive(Debug, Clone)]
pub struct RecoveryContext<'a> {
    pub lead_id: DbId,
    pub email: &'a str,
    pub first_name: Option<&'a str>,
    /// Step the lead stopped at, if the stored label is recognized.
    pub stopped_at: Option<SignupStep>,
    /// Public app base URL, without a trailing slash.
    pub app_url: &'a str,
}

impl RecoveryContext<'_> {
    /// Link that resumes the funnel for this lead.
    pub fn resume_link(&self) -> String {
        format!(
            "{}/signup?lead={}",
            self.app_url.trim_end_matches('/'),
            self.lead_id
        )
    }
}

fn subject(stage: RecoveryStage) -> &'static str {
    match stage {
        RecoveryStage::First => "Finish setting up your BRNNO account",
        RecoveryStage::Second => "Your BRNNO account is still waiting for you",
        RecoveryStage::Third => "Last reminder: complete your BRNNO signup",
    }
}

fn opening(stage: RecoveryStage) -> &'static str {
    match stage {
        RecoveryStage::First => "Looks like you didn't get a chance to finish signing up.",
        RecoveryStage::Second => {
            "Your progress is saved, so picking up where you left off takes a minute."
        }
        RecoveryStage::Third => {
            "This is the last reminder we'll send about your unfinished signup."
        }
    }
}

/// Render the email for a recovery stage.
pub fn recovery_email(stage: RecoveryStage, ctx: &RecoveryContext<'_>) -> OutgoingEmail {
    let greeting = match ctx.first_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hi {name},"),
        None => "Hi there,".to_string(),
    };
    let step = ctx
        .stopped_at
        .map(SignupStep::display_name)
        .unwrap_or("Getting started");
    let link = ctx.resume_link();
    let opening = opening(stage);

    let text = format!(
        "{greeting}\n\n{opening}\n\nYou stopped at: {step}\n\nContinue here: {link}\n\nThe BRNNO team\n"
    );
    let html = format!(
        "<p>{greeting}</p>\
         <p>{opening}</p>\
         <p>You stopped at: <strong>{step}</strong></p>\
         <p><a href=\"{link}\">Continue your signup</a></p>\
         <p>The BRNNO team</p>",
        greeting = escape(&greeting),
    );

    OutgoingEmail {
        to: ctx.email.to_string(),
        subject: subject(stage).to_string(),
        text,
        html,
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(first_name: Option<&str>) -> RecoveryContext<'_> {
        RecoveryContext {
            lead_id: 42,
            email: "owner@example.com",
            first_name,
            stopped_at: Some(SignupStep::BusinessInfo),
            app_url: "https://app.brnno.io/",
        }
    }

    #[test]
    fn subjects_differ_per_stage() {
        let c = ctx(None);
        let a = recovery_email(RecoveryStage::First, &c).subject;
        let b = recovery_email(RecoveryStage::Second, &c).subject;
        let d = recovery_email(RecoveryStage::Third, &c).subject;
        assert_ne!(a, b);
        assert_ne!(b, d);
        assert_ne!(a, d);
    }

    #[test]
    fn body_names_step_and_links_lead() {
        let email = recovery_email(RecoveryStage::Second, &ctx(Some("Ana")));
        assert_eq!(email.to, "owner@example.com");
        assert!(email.text.starts_with("Hi Ana,"));
        assert!(email.text.contains("Business details"));
        assert!(email.text.contains("https://app.brnno.io/signup?lead=42"));
        assert!(email.html.contains("href=\"https://app.brnno.io/signup?lead=42\""));
    }

    #[test]
    fn unknown_step_uses_generic_label() {
        let mut c = ctx(Some("  "));
        c.stopped_at = None;
        let email = recovery_email(RecoveryStage::First, &c);
        assert!(email.text.starts_with("Hi there,"));
        assert!(email.text.contains("Getting started"));
    }

    #[test]
    fn names_are_escaped_in_html() {
        let email = recovery_email(RecoveryStage::First, &ctx(Some("<b>Ana</b>")));
        assert!(email.html.contains("&lt;b&gt;Ana&lt;/b&gt;"));
    }
}
