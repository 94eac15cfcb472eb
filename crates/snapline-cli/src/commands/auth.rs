use anyhow::{Context, Result};
use snapline_core::auth::{Credentials, Registration};
use std::io::{self, Write};

use super::{App, render};

fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(app: &App, username: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };
    app.session
        .login(&Credentials::new(username, password))
        .await?;

    let user = app.require_session()?;
    println!("✅ Logged in as {}", render::user_line(&user));
    Ok(())
}

pub async fn register(app: &App, registration: Registration) -> Result<()> {
    app.session.register(&registration).await?;

    let user = app.require_session()?;
    println!("✅ Registered and logged in as {}", render::user_line(&user));
    Ok(())
}

pub fn logout(app: &App) {
    app.session.logout();
    println!("Logged out");
}

pub fn whoami(app: &App) -> Result<()> {
    let user = app.require_session()?;
    render::profile(&user);
    Ok(())
}
