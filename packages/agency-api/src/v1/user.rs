//! Back-office user accounts.

use bon::Builder;
use derive_more::Debug;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{
    DraftError, Resource, Role, UserId, de,
    draft::{Checks, Validate},
};

/// Shortest password the backend accepts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// An account allowed to sign in to the back-office.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct User {
    pub id: UserId,

    #[serde(rename = "nom", alias = "name", default)]
    #[builder(into)]
    pub name: String,

    #[serde(default)]
    #[builder(into)]
    pub email: String,

    #[serde(
        default,
        deserialize_with = "de::non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub role: Option<Role>,

    /// Absent means active: the backend omits the flag on older accounts.
    #[serde(
        rename = "actif",
        alias = "active",
        alias = "is_active",
        default,
        deserialize_with = "de::bool_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<bool>,

    #[serde(
        rename = "created_at",
        default,
        deserialize_with = "de::date_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<Date>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

impl From<&User> for User {
    fn from(user: &User) -> Self {
        user.clone()
    }
}

impl Resource for User {
    type Id = UserId;
    type Draft = UserDraft;

    const PATH: &'static str = "users";
    const NAME: &'static str = "utilisateur";

    fn id(&self) -> UserId {
        self.id
    }
}

/// The editable fields of a user account.
///
/// The password is only sent when set: updates that leave it empty keep the
/// current password.
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize, Builder)]
pub struct UserDraft {
    #[serde(rename = "nom")]
    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub role: Option<Role>,

    #[serde(rename = "actif", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[debug(skip)]
    #[builder(into)]
    pub password: Option<String>,
}

impl Validate for UserDraft {
    fn validate(&self) -> Result<(), DraftError> {
        let email = Some(self.email.as_str()).filter(|email| !email.trim().is_empty());
        Checks::default()
            .required("nom", &self.name)
            .required("email", &self.email)
            .email("email", email)
            .check(
                "password",
                self.password
                    .as_deref()
                    .is_none_or(|password| password.chars().count() >= MIN_PASSWORD_LENGTH),
                format!("doit contenir au moins {MIN_PASSWORD_LENGTH} caractères"),
            )
            .finish()
    }
}

impl From<&User> for UserDraft {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            active: user.active,
            password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq as pretty_assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_backend_record() {
        let user = serde_json::from_value::<User>(json!({
            "id": 2,
            "name": "Samia Kaci",
            "email": "samia@agence.example",
            "role": "Gestionnaire",
            "is_active": 0
        }))
        .expect("decode user");
        pretty_assert_eq!(user.name, "Samia Kaci");
        pretty_assert_eq!(user.role, Some(Role::Manager));
        assert!(!user.is_active());
    }

    #[test]
    fn missing_flag_means_active() {
        let user = serde_json::from_value::<User>(json!({"id": 2, "nom": "Admin"}))
            .expect("decode user");
        assert!(user.is_active());
    }

    #[test]
    fn debug_hides_password() {
        let draft = UserDraft::builder()
            .name("Samia")
            .email("samia@agence.example")
            .password("hunter2hunter2")
            .build();
        let rendered = format!("{draft:?}");
        assert!(!rendered.contains("hunter2"), "{rendered}");
    }

    #[test]
    fn draft_requires_long_password() {
        let draft = UserDraft::builder()
            .name("Samia")
            .email("samia@agence.example")
            .password("short")
            .build();
        let err = draft.validate().expect_err("draft should be invalid");
        pretty_assert_eq!(err.violations.len(), 1);
        pretty_assert_eq!(err.violations[0].field, "password");
    }

    #[test]
    fn draft_from_user_keeps_password_unset() {
        let user = User::builder()
            .id(UserId::new(4))
            .name("Nadir")
            .email("nadir@agence.example")
            .role(Role::Agent)
            .build();
        let draft = UserDraft::from(&user);
        pretty_assert_eq!(draft.password, None);
        let body = serde_json::to_value(&draft).expect("encode draft");
        pretty_assert_eq!(
            body,
            json!({"nom": "Nadir", "email": "nadir@agence.example", "role": "agent"})
        );
    }
}
