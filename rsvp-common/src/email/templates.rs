//! Email bodies sent to guests and to the admin

use chrono::{DateTime, Utc};
use reqwest::Url;

use super::EmailMessage;
use crate::models::RsvpRecord;

const SIGN_OFF: &str = "With love,\nJemima & Marko";
const AUTOMATED_FOOTER: &str = "---\nThis is an automated confirmation email.";

/// Confirmation sent to a guest once their RSVP counts
pub fn confirmation(record: &RsvpRecord) -> EmailMessage {
    let (subject, body) = if record.is_attending {
        let diet = match record.diet.as_deref().map(str::trim) {
            Some(diet) if !diet.is_empty() => format!("\n\nDietary Requirements:\n{diet}"),
            _ => String::new(),
        };

        (
            "Wedding RSVP Confirmation - We Can't Wait to See You!",
            format!(
                "Dear {name},\n\n\
                 Thank you for confirming your attendance at our wedding!\n\n\
                 Attending Guests:\n{guests}{diet}\n\n\
                 We're so excited to celebrate with you!\n\n\
                 If you need to make any changes to your RSVP, please reply to this email.\n\n\
                 {SIGN_OFF}\n\n{AUTOMATED_FOOTER}\n",
                name = record.name,
                guests = record.attending_guests.join(", "),
            ),
        )
    } else {
        (
            "Wedding RSVP Confirmation - We'll Miss You",
            format!(
                "Dear {name},\n\n\
                 Thank you for your RSVP response.\n\n\
                 We're sorry you won't be able to join us for our wedding celebration. \
                 You'll be missed!\n\n\
                 If your plans change, please reply to this email.\n\n\
                 {SIGN_OFF}\n\n{AUTOMATED_FOOTER}\n",
                name = record.name,
            ),
        )
    };

    EmailMessage {
        to: record.email.clone(),
        subject: subject.to_string(),
        body,
    }
}

/// Admin alert for a name that is not on the guest list
pub fn unlisted_guest_notice(
    admin_email: &str,
    name: &str,
    ip_address: &str,
    user_agent: &str,
    at: DateTime<Utc>,
) -> EmailMessage {
    EmailMessage {
        to: admin_email.to_string(),
        subject: format!("Unlisted Guest Attempt: {name}"),
        body: format!(
            "Hello,\n\n\
             Someone not on the guest list attempted to RSVP for your wedding.\n\n\
             Name Entered: {name}\n\
             Time: {time}\n\
             IP Address: {ip_address}\n\
             User Agent: {user_agent}\n\n\
             This person was not found in your guest list. You may want to:\n\
             1. Check if this is a misspelling of an existing guest\n\
             2. Add them to the guest list if they should be invited\n\
             3. Contact them directly if needed\n\n\
             ---\nThis is an automated notification from your wedding RSVP system.\n",
            time = at.to_rfc2822(),
        ),
    }
}

/// Admin alert for an RSVP naming guests that did not match the list
pub fn unverified_rsvp_notice(
    admin_email: &str,
    record: &RsvpRecord,
    unmatched: &[String],
    verify_link: Option<&str>,
) -> EmailMessage {
    let action = match verify_link {
        Some(link) => format!(
            "To verify this RSVP and send the guest their confirmation, open:\n{link}"
        ),
        None => {
            "ADMIN_API_KEY is not configured, so this RSVP cannot be verified by link.".to_string()
        }
    };
    let diet = record.diet.as_deref().unwrap_or("");

    EmailMessage {
        to: admin_email.to_string(),
        subject: format!("RSVP Needs Verification: {} ({})", record.name, record.email),
        body: format!(
            "Hello,\n\n\
             An RSVP was received with guests that are not on the guest list.\n\n\
             Name: {name}\n\
             Email: {email}\n\
             Attending Guests: {guests}\n\
             Not Found: {unmatched}\n\
             Dietary Requirements: {diet}\n\n\
             The guest has not been sent a confirmation yet.\n\n\
             {action}\n\n\
             ---\nThis is an automated notification from your wedding RSVP system.\n",
            name = record.name,
            email = record.email,
            guests = record.attending_guests.join(", "),
            unmatched = unmatched.join(", "),
        ),
    }
}

/// Admin verification link for an RSVP email
///
/// `None` when no admin key is configured or the base URL is unusable.
pub fn verification_link(
    base_url: &str,
    email: &str,
    admin_api_key: Option<&str>,
) -> Option<String> {
    let api_key = admin_api_key?;
    Url::parse_with_params(
        &format!("{}/api/verify-rsvp", base_url.trim_end_matches('/')),
        &[("email", email), ("apiKey", api_key)],
    )
    .ok()
    .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_attending: bool) -> RsvpRecord {
        RsvpRecord {
            name: "John Smith".to_string(),
            email: "john@example.com".to_string(),
            is_attending,
            attending_guests: vec!["John Smith".to_string(), "Jane Smith".to_string()],
            diet: Some("vegetarian".to_string()),
            verified: true,
            submitted_at: None,
        }
    }

    #[test]
    fn test_attending_confirmation_lists_guests_and_diet() {
        let message = confirmation(&record(true));

        assert_eq!(message.to, "john@example.com");
        assert!(message.subject.contains("Can't Wait"));
        assert!(message.body.contains("Dear John Smith"));
        assert!(message.body.contains("John Smith, Jane Smith"));
        assert!(message.body.contains("Dietary Requirements:\nvegetarian"));
    }

    #[test]
    fn test_attending_confirmation_omits_blank_diet() {
        let mut rec = record(true);
        rec.diet = Some("  ".to_string());
        assert!(!confirmation(&rec).body.contains("Dietary"));
    }

    #[test]
    fn test_regret_confirmation() {
        let message = confirmation(&record(false));
        assert!(message.subject.contains("Miss You"));
        assert!(!message.body.contains("Attending Guests"));
    }

    #[test]
    fn test_unverified_notice_includes_link() {
        let link = verification_link(
            "https://rsvp.example.com/",
            "john+1@example.com",
            Some("s3cret"),
        )
        .expect("link");
        assert_eq!(
            link,
            "https://rsvp.example.com/api/verify-rsvp?email=john%2B1%40example.com&apiKey=s3cret"
        );

        let message = unverified_rsvp_notice(
            "admin@example.com",
            &record(true),
            &["Jane Smith".to_string()],
            Some(&link),
        );
        assert_eq!(message.to, "admin@example.com");
        assert!(message.body.contains("Not Found: Jane Smith"));
        assert!(message.body.contains(&link));
    }

    #[test]
    fn test_no_link_without_admin_key() {
        assert!(verification_link("https://rsvp.example.com", "a@b.com", None).is_none());
    }

    #[test]
    fn test_unlisted_notice() {
        let message = unlisted_guest_notice(
            "admin@example.com",
            "Mystery Person",
            "203.0.113.7",
            "curl/8.0",
            Utc::now(),
        );
        assert!(message.subject.contains("Mystery Person"));
        assert!(message.body.contains("IP Address: 203.0.113.7"));
        assert!(message.body.contains("User Agent: curl/8.0"));
    }
}
