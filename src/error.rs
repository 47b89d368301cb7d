pub type SceneResult<T> = Result<T, SceneError>;

#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("page error: {0}")]
    Page(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("transition error: {0}")]
    Transition(String),

    #[error("texture error: {0}")]
    Texture(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn page(msg: impl Into<String>) -> Self {
        Self::Page(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn transition(msg: impl Into<String>) -> Self {
        Self::Transition(msg.into())
    }

    pub fn texture(msg: impl Into<String>) -> Self {
        Self::Texture(msg.into())
    }
}
