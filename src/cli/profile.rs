use anyhow::Result;
use console::style;

use spark_youth::page::{PageAccess, ProfilePage};
use spark_youth::profile::{EDIT_UNAVAILABLE, ProfileViewer};

use super::{Services, render};

pub async fn run(svc: &Services, edit: bool) -> Result<()> {
    let (shell, state) = svc.shell(PageAccess::Protected).await;
    if render::redirect(&shell.location) {
        return Ok(());
    }

    let viewer = ProfileViewer::new(svc.store.clone(), svc.cfg.unauthenticated_landing.clone());
    let mut page = ProfilePage::default();
    viewer.render(state.identity.as_ref(), &mut page).await;
    render::profile(&page);

    if edit {
        println!("\n{}", style(EDIT_UNAVAILABLE).yellow());
    }
    Ok(())
}
