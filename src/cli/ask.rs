use anyhow::Result;

use crate::ai::chat::ChatBuilder;
use crate::core::AppConfig;

pub async fn run(config: AppConfig, prompt: &str, personality: Option<&str>) -> Result<()> {
    let mut chat = ChatBuilder::from_config(&config).build();

    let reply = match personality {
        Some(p) => chat.send_prompt_with_personality(prompt, p).await?,
        None => chat.send_prompt(prompt).await?,
    };
    println!("{}", reply);

    Ok(())
}
