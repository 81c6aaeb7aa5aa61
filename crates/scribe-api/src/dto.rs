//! Request and response DTOs
//!
//! Request bodies carry `validator` rules; handlers run `validate()`
//! before touching any store. Response shapes reuse the domain models
//! where they already serialize safely (the user model never exposes
//! its password hash).

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use scribe_auth::TokenPair;
use scribe_models::User;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpBasic {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,

    #[validate(length(min = 6, max = 100, message = "must be 6 to 100 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub name: String,

    #[validate(url(message = "must be a valid url"))]
    pub profile_pic_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignInBasic {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,

    #[validate(length(min = 6, max = 100, message = "must be 6 to 100 characters"))]
    pub password: String,
}

/// Body of the refresh endpoint; the expired access token rides in the
/// Authorization header as usual.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefresh {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub refresh_token: String,
}

/// `{user, tokens}` payload returned by signup and signin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: User,
    pub tokens: TokenPair,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogCreate {
    #[validate(length(min = 3, max = 500, message = "must be 3 to 500 characters"))]
    pub title: String,

    #[validate(length(min = 3, max = 2000, message = "must be 3 to 2000 characters"))]
    pub description: String,

    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub text: String,

    pub tags: Vec<String>,

    #[validate(url(message = "must be a valid url"))]
    pub img_url: Option<String>,

    #[validate(length(min = 3, max = 200, message = "must be 3 to 200 characters"))]
    pub slug: String,
}

/// Partial edit of the caller's own blog; absent fields are left
/// untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogUpdate {
    pub id: Uuid,

    #[validate(length(min = 3, max = 500, message = "must be 3 to 500 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 3, max = 2000, message = "must be 3 to 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub text: Option<String>,

    pub tags: Option<Vec<String>>,

    #[validate(url(message = "must be a valid url"))]
    pub img_url: Option<String>,

    #[validate(length(min = 3, max = 200, message = "must be 3 to 200 characters"))]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MessageCreate {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub kind: String,

    #[validate(length(min = 1, max = 2000, message = "must be 1 to 2000 characters"))]
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_validation() {
        let ok = SignUpBasic {
            email: "ada@example.com".into(),
            password: "changeit".into(),
            name: "Ada".into(),
            profile_pic_url: None,
        };
        assert!(ok.validate().is_ok());

        let bad_email = SignUpBasic {
            email: "not-an-email".into(),
            ..ok_clone(&ok)
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignUpBasic {
            password: "short".into(),
            ..ok_clone(&ok)
        };
        assert!(short_password.validate().is_err());
    }

    fn ok_clone(src: &SignUpBasic) -> SignUpBasic {
        SignUpBasic {
            email: src.email.clone(),
            password: src.password.clone(),
            name: src.name.clone(),
            profile_pic_url: src.profile_pic_url.clone(),
        }
    }

    #[test]
    fn test_blog_update_fields_are_optional() {
        let parsed: BlogUpdate = serde_json::from_str(
            r#"{"id":"7f1f1d44-6f8c-4a5a-9a37-4f16c1d7f3f1","title":"An updated title"}"#,
        )
        .unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.title.as_deref(), Some("An updated title"));
        assert!(parsed.description.is_none());

        let bad: BlogUpdate = serde_json::from_str(
            r#"{"id":"7f1f1d44-6f8c-4a5a-9a37-4f16c1d7f3f1","title":"ab"}"#,
        )
        .unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_message_create_renames_type() {
        let parsed: MessageCreate =
            serde_json::from_str(r#"{"type":"feedback","msg":"hello"}"#).unwrap();
        assert_eq!(parsed.kind, "feedback");
        assert!(parsed.validate().is_ok());
    }
}
