use anyhow::{Result, bail};
use console::style;
use dialoguer::{Input, Password};

use spark_youth::account;
use spark_youth::identity::IdentityGateway;
use spark_youth::layout::Layout;
use spark_youth::page::{LayoutPage, PageAccess, PrivilegedNav};

use super::{Services, render};

fn prompt_email(email: Option<String>) -> Result<String> {
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = email.trim().to_string();
    if email.is_empty() {
        bail!("Email required.");
    }
    Ok(email)
}

pub async fn signup(svc: &Services, email: Option<String>, username: Option<String>) -> Result<()> {
    println!("Spark Youth sign up\n");

    let email = prompt_email(email)?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords don't match.")
        .interact()?;
    let username = match username {
        Some(u) => Some(u),
        None if atty::is(atty::Stream::Stdin) => Some(
            Input::<String>::new()
                .with_prompt("Display name (blank for a random one)")
                .allow_empty(true)
                .interact_text()?,
        ),
        None => None,
    };

    let user = account::create_account(
        svc.identity.as_ref(),
        svc.store.as_ref(),
        &email,
        &password,
        username.as_deref(),
    )
    .await?;
    println!("{} Account created for {}", style("✓").green(), user.email.as_deref().unwrap_or(&email));

    // The signup page is auth-only: a fresh session is sent on to the landing page.
    let (page, _) = svc.shell(PageAccess::AuthOnly).await;
    render::redirect(&page.location);
    Ok(())
}

pub async fn login(svc: &Services, email: Option<String>) -> Result<()> {
    if let Some(user) = svc.current_user() {
        println!("Already signed in as {}.", user.email.as_deref().unwrap_or(&user.uid));
        println!("To switch accounts, run: spark logout");
        return Ok(());
    }

    let email = prompt_email(email)?;
    let password = Password::new().with_prompt("Password").interact()?;

    let user = account::sign_in(svc.identity.as_ref(), &email, &password).await?;
    println!("{} Signed in as {}", style("✓").green(), user.email.as_deref().unwrap_or(&email));

    let (page, _) = svc.shell(PageAccess::AuthOnly).await;
    render::redirect(&page.location);
    Ok(())
}

pub async fn logout(svc: &Services) -> Result<()> {
    if svc.identity.current_user().is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    let mut layout = Layout::new(LayoutPage::default(), svc.cfg.unauthenticated_landing.clone());
    let mut nav = PrivilegedNav::all();
    if !layout
        .sign_out(svc.identity.as_ref(), svc.local.as_ref(), &svc.session, &mut nav)
        .await
    {
        bail!("Sign out failed. See logs for details.");
    }

    println!("{} Signed out. Local data cleared.", style("✓").green());
    render::redirect(&layout.page().location);
    Ok(())
}
