//! Share-a-post-by-email form.
//!
//! A GET shows an empty form (`AwaitingInput`). A POST either fails validation
//! and goes back to `AwaitingInput` with field errors, or validates and moves
//! to `Sent` once the message has been handed to the mailer.

use crate::{mail::EmailMessage, models::Post};
use std::collections::{BTreeMap, BTreeSet};
use url::form_urlencoded;
use validator::{Validate, ValidationError};

/// First error message per field, keyed by field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, Validate)]
pub struct ShareForm {
    #[validate(
        custom(function = "required"),
        length(max = 25, message = "Ensure this value has at most 25 characters.")
    )]
    pub name: String,
    #[validate(
        custom(function = "required"),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,
    #[validate(
        custom(function = "required"),
        email(message = "Enter a valid email address.")
    )]
    pub to: String,
    pub comments: String,
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("This field is required.".into());
        return Err(error);
    }
    Ok(())
}

impl ShareForm {
    /// Decodes an `application/x-www-form-urlencoded` body. The first value of
    /// each field wins; unknown fields are ignored and undecodable bytes are
    /// replaced, so this never fails.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let mut form = ShareForm::default();
        let mut seen = BTreeSet::new();
        for (key, value) in form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "name" => &mut form.name,
                "email" => &mut form.email,
                "to" => &mut form.to,
                "comments" => &mut form.comments,
                _ => continue,
            };
            if seen.insert(key.into_owned()) {
                *slot = value.into_owned();
            }
        }
        form
    }

    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            to: self.to.trim().to_owned(),
            comments: self.comments.trim().to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ShareState {
    AwaitingInput { form: ShareForm, errors: FieldErrors },
    Sent { form: ShareForm },
}

impl ShareState {
    /// Initial state for a GET.
    pub fn empty() -> Self {
        ShareState::AwaitingInput {
            form: ShareForm::default(),
            errors: FieldErrors::new(),
        }
    }

    /// Validates a submitted payload.
    pub fn submit(form: ShareForm) -> Self {
        let form = form.trimmed();
        match form.validate() {
            Ok(()) => ShareState::Sent { form },
            Err(errors) => {
                let errors = errors
                    .field_errors()
                    .into_iter()
                    .filter_map(|(field, errors)| {
                        let first = errors.first()?;
                        let message = first
                            .message
                            .as_ref()
                            .map(|message| message.to_string())
                            .unwrap_or_else(|| first.code.to_string());
                        Some((field.to_string(), message))
                    })
                    .collect();
                ShareState::AwaitingInput { form, errors }
            }
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, ShareState::Sent { .. })
    }

    pub fn form(&self) -> &ShareForm {
        match self {
            ShareState::AwaitingInput { form, .. } | ShareState::Sent { form } => form,
        }
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        match self {
            ShareState::AwaitingInput { errors, .. } => errors.get(field).map(String::as_str),
            ShareState::Sent { .. } => None,
        }
    }
}

/// Recommendation email for `post`. `post_url` must already be absolute.
pub fn share_message(post: &Post, form: &ShareForm, post_url: &str, from: &str) -> EmailMessage {
    EmailMessage {
        from: from.to_owned(),
        to: form.to.clone(),
        subject: format!("{} recommends you read {}", form.name, post.title),
        body: format!(
            "Read {} at {}\n\n{}'s comments: {}",
            post.title, post_url, form.name, form.comments
        ),
    }
}
