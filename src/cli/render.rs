//! Terminal rendering of page bindings.

use console::style;

use spark_youth::page::{Element, ProfilePage, SettingsPage, ShellPage, StatusLine, Tone};

pub fn redirect(location: &Option<String>) -> bool {
    match location {
        Some(to) => {
            println!("{} {}", style("→").dim(), style(to).cyan());
            true
        }
        None => false,
    }
}

fn visible_text(elements: &[Element]) -> Option<&str> {
    elements.iter().find(|e| e.is_visible()).map(|e| e.text.as_str())
}

pub fn shell(page: &ShellPage) {
    if redirect(&page.location) {
        return;
    }
    if let Some(name) = visible_text(&page.username_displays) {
        println!("  User:     {}", style(name).bold());
    }
    if let Some(mood) = visible_text(&page.mood_displays) {
        if !mood.is_empty() {
            println!("  Mood:     {mood}");
        }
    }
    let admin: Vec<&str> = page
        .nav
        .present()
        .filter(|(_, el)| el.is_visible())
        .map(|(link, _)| link.element_id())
        .collect();
    if !admin.is_empty() {
        println!("  Admin:    {}", admin.join(", "));
    }
}

pub fn profile(page: &ProfilePage) {
    if redirect(&page.location) {
        return;
    }
    println!("{}\n", style(&page.username.text).bold());
    println!("  Username:    {}", page.detail_username.text);
    println!("  Roles:       {}", page.detail_roles.text);
    println!("  Registered:  {}", page.detail_registered.text);
    let avatar = &page.detail_avatar.text;
    if avatar == "(none)" {
        let alt = page.avatar.attr("alt").unwrap_or("Default avatar");
        println!("  Avatar:      {} ({alt})", style("(none)").dim());
    } else {
        println!("  Avatar:      {avatar}");
    }
}

pub fn status(status: &StatusLine) {
    let text = match status.tone {
        Tone::Neutral => style(&status.text).dim(),
        Tone::Success => style(&status.text).green(),
        Tone::Error => style(&status.text).red(),
    };
    println!("{text}");
}

pub fn settings(page: &SettingsPage) {
    let field = |el: &Element| {
        if el.value.is_empty() { style("(empty)".to_string()).dim() } else { style(el.value.clone()) }
    };
    println!("  Display name:    {}", field(&page.display_name));
    println!("  Preferred mood:  {}", field(&page.preferred_mood));
    println!();
    status(&page.status);
}
