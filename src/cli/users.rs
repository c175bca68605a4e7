use crate::cli::{open_store, password_or_prompt};
use crate::error::Result;
use crate::models::NewUser;
use crate::service;

pub fn register(username: &str, password: Option<String>) -> Result<()> {
    let mut store = open_store()?;
    let password = password_or_prompt(password)?;
    let user = service::register(
        &mut store,
        NewUser {
            username: username.to_string(),
            password,
        },
    )?;
    println!("Registered {} (id {})", user.username, user.id);
    Ok(())
}

pub fn login(username: &str, password: Option<String>) -> Result<()> {
    let store = open_store()?;
    let password = password_or_prompt(password)?;
    let user = service::login(&store, username, &password)?;
    println!("Logged in as {} (id {})", user.username, user.id);
    Ok(())
}
