use anyhow::Result;

use spark_youth::config::Config;

fn key_status(key: &Option<String>) -> &'static str {
    match key.as_deref() {
        Some(k) if !k.trim().is_empty() => "set ✓",
        _ => "not set",
    }
}

pub fn run(cfg: &Config, init: bool) -> Result<()> {
    if init {
        let path = Config::config_path()?;
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            cfg.save()?;
            tracing::info!("Wrote default config to {}", path.display());
            println!("✓ Wrote {}", path.display());
        }
        println!();
    }

    println!("spark v{}\n", env!("CARGO_PKG_VERSION"));
    println!("Config:          {}", Config::config_path()?.display());
    println!("Session:         {}", Config::session_path()?.display());
    println!("Local storage:   {}", Config::local_storage_path()?.display());
    println!();
    println!("Firebase key:    {}", key_status(&cfg.firebase_api_key));
    println!("Project:         {}", cfg.firebase_project_id);
    println!("Gemini key:      {}", key_status(&cfg.gemini_api_key));
    println!("Gemini model:    {}", cfg.gemini_model);
    println!("After sign-in:   {}", cfg.auth_landing);
    println!("Signed out:      {}", cfg.unauthenticated_landing);

    if !cfg.is_configured() {
        println!();
        println!("💡 Add firebase_api_key to the config file to enable accounts.");
    }
    Ok(())
}
