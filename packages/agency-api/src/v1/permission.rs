//! Access permissions.

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::{
    Action, DraftError, PermissionId, Resource, Role, UserId, de,
    draft::{Checks, Validate},
};

/// Grants a role (or a single user) a set of actions on a resource.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct Permission {
    pub id: PermissionId,

    #[serde(
        default,
        deserialize_with = "de::non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// The resource the permission applies to (`clients`, `factures`...).
    #[serde(rename = "ressource", alias = "resource", alias = "module", default)]
    #[builder(into)]
    pub resource: String,

    #[serde(default, deserialize_with = "de::list_lenient")]
    #[builder(default, with = |i: impl IntoIterator<Item = impl Into<Action>>| i.into_iter().map(Into::into).collect())]
    pub actions: Vec<Action>,
}

impl Permission {
    pub fn allows(&self, action: &Action) -> bool {
        self.actions.contains(action)
    }

    /// Who the permission is granted to, for display.
    pub fn grantee(&self) -> String {
        match (&self.role, self.user_id) {
            (_, Some(user)) => format!("utilisateur #{user}"),
            (Some(role), None) => role.label().to_string(),
            (None, None) => String::from("-"),
        }
    }
}

impl From<&Permission> for Permission {
    fn from(permission: &Permission) -> Self {
        permission.clone()
    }
}

impl Resource for Permission {
    type Id = PermissionId;
    type Draft = PermissionDraft;

    const PATH: &'static str = "permissions";
    const NAME: &'static str = "permission";

    fn id(&self) -> PermissionId {
        self.id
    }
}

/// The editable fields of a permission.
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize, Builder)]
pub struct PermissionDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub role: Option<Role>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    #[serde(rename = "ressource")]
    #[builder(into)]
    pub resource: String,

    #[builder(default, with = |i: impl IntoIterator<Item = impl Into<Action>>| i.into_iter().map(Into::into).collect())]
    pub actions: Vec<Action>,
}

impl Validate for PermissionDraft {
    fn validate(&self) -> Result<(), DraftError> {
        Checks::default()
            .required("ressource", &self.resource)
            .check(
                "role",
                self.role.is_some() || self.user_id.is_some(),
                "un rôle ou un utilisateur est obligatoire",
            )
            .check("actions", !self.actions.is_empty(), "au moins une action est obligatoire")
            .finish()
    }
}

impl From<&Permission> for PermissionDraft {
    fn from(permission: &Permission) -> Self {
        Self {
            role: permission.role.clone(),
            user_id: permission.user_id,
            resource: permission.resource.clone(),
            actions: permission.actions.clone(),
        }
    }
}
