use tokio::sync::Mutex;

use crate::ai::chat::{Chat, ChatBuilder};
use crate::core::AppConfig;

pub struct AppState {
    // One conversation per server. The async mutex queues concurrent
    // prompts so turns are never interleaved.
    pub chat: Mutex<Chat>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let chat = ChatBuilder::from_config(&config).build();
        Self {
            chat: Mutex::new(chat),
            config,
        }
    }
}
