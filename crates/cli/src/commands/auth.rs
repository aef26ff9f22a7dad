//! Account commands.

use kedai_client::api::types::{Credentials, Registration};

use super::{CliError, Context, check};

/// Sign in.
pub async fn login(ctx: &Context, email: String, password: String) -> Result<(), CliError> {
    check(ctx.auth.login(&Credentials { email, password }).await)
}

/// Create an account and sign in.
pub async fn register(
    ctx: &Context,
    name: String,
    email: String,
    password: String,
) -> Result<(), CliError> {
    check(
        ctx.auth
            .register(&Registration {
                name,
                email,
                password,
            })
            .await,
    )
}

/// Sign out. Local only; always succeeds.
pub fn logout(ctx: &Context) {
    ctx.auth.logout();
}

/// Show the signed-in user.
pub fn whoami(ctx: &Context) {
    match ctx.auth.current_user() {
        Some(user) => {
            tracing::info!("{} <{}> ({})", user.name, user.email, user.role);
        }
        None => tracing::info!("Not signed in"),
    }
}
