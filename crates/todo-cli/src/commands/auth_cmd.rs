use std::path::Path;

use todo_core::auth::{welcome_line, AuthError};

use crate::cli::AuthCommands;
use crate::commands::common::{load_config, open_session, signed_in_label};
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let mut session = open_session(&config).await?;

    match command {
        AuthCommands::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            let email_label = user.email.as_deref().unwrap_or("(no email)");
            println!("Signed in as {email_label}");
        }
        AuthCommands::Register { email, password } => {
            let user = session.register(&email, &password).await?;
            let email_label = user.email.as_deref().unwrap_or("(no email)");
            println!("Registered and signed in as {email_label}");
        }
        AuthCommands::Status => {
            if !session.is_configured() {
                return Err(AuthError::NotConfigured.into());
            }
            match signed_in_label(&session) {
                Some(label) => {
                    println!("Signed in as {label}");
                    if let Some(welcome) = welcome_line(session.current_user()) {
                        println!("{welcome}");
                    }
                }
                None => println!("Not signed in."),
            }
        }
        AuthCommands::Logout => {
            session.logout()?;
            println!("Signed out");
        }
    }

    Ok(())
}
