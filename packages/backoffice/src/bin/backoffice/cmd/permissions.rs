use agency_api::v1::{Action, Permission, PermissionDraft, PermissionId, Role, UserId};
use clap::{Args, Subcommand};
use color_eyre::Result;

use super::{
    Context,
    resource::{self, ListOptions},
};

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// List permissions.
    ///
    /// `--status` matches the role the permission is granted to.
    List(ListOptions),

    /// Show a permission.
    Show { id: PermissionId },

    /// Grant a permission.
    Create(Fields),

    /// Update a permission; fields not given keep their value.
    Update {
        id: PermissionId,

        #[command(flatten)]
        fields: Fields,
    },

    /// Revoke a permission.
    Delete {
        id: PermissionId,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Clone, Args, Debug)]
pub struct Fields {
    /// Role granted the permission (admin, manager, agent, comptable).
    #[arg(long)]
    role: Option<Role>,

    /// User granted the permission, instead of a role.
    #[arg(long)]
    user: Option<UserId>,

    /// Resource the permission applies to (clients, voyages, factures...).
    #[arg(long)]
    resource: Option<String>,

    /// Actions allowed (lire, creer, modifier, supprimer); replaces the
    /// current list.
    #[arg(long = "action", value_delimiter = ',')]
    actions: Vec<Action>,
}

impl Fields {
    fn apply(self, draft: &mut PermissionDraft) {
        if let Some(role) = self.role {
            draft.role = Some(role);
        }
        if let Some(user) = self.user {
            draft.user_id = Some(user);
        }
        if let Some(resource) = self.resource {
            draft.resource = resource;
        }
        if !self.actions.is_empty() {
            draft.actions = self.actions;
        }
    }
}

pub async fn exec(ctx: &Context, cmd: Command) -> Result<()> {
    match cmd {
        Command::List(options) => {
            let filter = options.filter();
            resource::list::<Permission>(ctx, &options, filter).await
        }
        Command::Show { id } => resource::show::<Permission>(ctx, id).await,
        Command::Create(fields) => {
            let mut draft = PermissionDraft::default();
            fields.apply(&mut draft);
            resource::create::<Permission>(ctx, draft).await
        }
        Command::Update { id, fields } => {
            resource::update::<Permission>(ctx, id, |draft| fields.apply(draft)).await
        }
        Command::Delete { id, yes } => resource::delete::<Permission>(ctx, id, yes).await,
    }
}
