use agency_api::v1::{Role, User, UserDraft, UserId};
use clap::{Args, Subcommand};
use color_eyre::{Result, eyre::Context as _};
use inquire::Password;

use super::{
    Context,
    resource::{self, ListOptions, optional},
};

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// List user accounts.
    ///
    /// `--status` matches a role or `actif`/`inactif`.
    List(ListOptions),

    /// Show a user account.
    Show { id: UserId },

    /// Create a user account. The password is prompted for unless given.
    Create(Fields),

    /// Update a user account; fields not given keep their value.
    Update {
        id: UserId,

        #[command(flatten)]
        fields: Fields,

        /// Prompt for a new password.
        #[arg(long, default_value_t = false, conflicts_with = "password")]
        reset_password: bool,
    },

    /// Delete a user account.
    Delete {
        id: UserId,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Clone, Args, Debug)]
pub struct Fields {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// Role (admin, manager, agent, comptable).
    #[arg(long)]
    role: Option<Role>,

    /// Whether the account may sign in.
    #[arg(long)]
    active: Option<bool>,

    /// New password.
    #[arg(long, env = "BACKOFFICE_USER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl Fields {
    fn apply(self, draft: &mut UserDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        if let Some(role) = self.role {
            draft.role = Some(role);
        }
        if let Some(active) = self.active {
            draft.active = Some(active);
        }
        if let Some(password) = self.password {
            draft.password = optional(password);
        }
    }
}

pub async fn exec(ctx: &Context, cmd: Command) -> Result<()> {
    match cmd {
        Command::List(options) => {
            let filter = options.filter();
            resource::list::<User>(ctx, &options, filter).await
        }
        Command::Show { id } => resource::show::<User>(ctx, id).await,
        Command::Create(fields) => {
            let mut draft = UserDraft::default();
            fields.apply(&mut draft);
            if draft.password.is_none() {
                draft.password = Some(prompt_password()?);
            }
            resource::create::<User>(ctx, draft).await
        }
        Command::Update {
            id,
            fields,
            reset_password,
        } => {
            let password = if reset_password {
                Some(prompt_password()?)
            } else {
                None
            };
            resource::update::<User>(ctx, id, |draft| {
                fields.apply(draft);
                if let Some(password) = password {
                    draft.password = Some(password);
                }
            })
            .await
        }
        Command::Delete { id, yes } => resource::delete::<User>(ctx, id, yes).await,
    }
}

fn prompt_password() -> Result<String> {
    Password::new("Mot de passe :")
        .with_custom_confirmation_message("Confirmez le mot de passe :")
        .prompt()
        .context("prompt for password")
}
