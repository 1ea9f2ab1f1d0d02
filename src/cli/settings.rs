use anyhow::Result;

use spark_youth::page::{PageAccess, SettingsPage};
use spark_youth::settings::{SettingsEditor, SettingsState};

use super::{Services, render};

pub async fn run(svc: &Services, name: Option<String>, mood: Option<String>, clear: bool) -> Result<()> {
    let (shell, state) = svc.shell(PageAccess::Protected).await;
    if render::redirect(&shell.location) {
        return Ok(());
    }

    let mut editor = SettingsEditor::new(svc.identity.clone(), svc.store.clone(), SettingsPage::default());
    editor.load(state.identity.as_ref()).await;

    if editor.state() == SettingsState::Ready {
        if clear {
            editor.clear();
        } else if name.is_some() || mood.is_some() {
            editor.edit(name.as_deref(), mood.as_deref());
            editor.save().await;
        }
    }

    println!("Settings\n");
    render::settings(editor.page());
    Ok(())
}
