//! Generated content commands. These work signed out and without a key.

use anyhow::Result;
use console::style;

use spark_youth::config::Config;
use spark_youth::genai::{self, GeminiClient};

pub async fn challenge(cfg: &Config) -> Result<()> {
    let client = GeminiClient::new(cfg);
    let challenge = genai::daily_challenge(&client).await;
    println!("{}", style("Today's challenge").dim());
    println!("{}", style(&challenge.title).bold());
    println!("{}", challenge.description);
    Ok(())
}

pub async fn affirm(cfg: &Config, mood: &str) -> Result<()> {
    let client = GeminiClient::new(cfg);
    println!("{}", genai::mood_affirmation(&client, mood).await);
    Ok(())
}
