use std::sync::Arc;

use bg_core::{Result, TextGenerator};

use crate::{Backend, InferenceConfig};

pub mod chat;
pub mod dummy;

pub use chat::ChatCompletionModel;
pub use dummy::DummyModel;

pub fn create_model(config: &InferenceConfig) -> Result<Arc<dyn TextGenerator>> {
    let model: Arc<dyn TextGenerator> = match config.backend {
        Backend::OpenAi => Arc::new(ChatCompletionModel::new(config.clone())?),
        Backend::Dummy => Arc::new(DummyModel::new()),
    };
    tracing::debug!("Created text generator {}", model.name());
    Ok(model)
}
