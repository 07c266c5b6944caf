use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Config Error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("The API responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("The API reported an error {id} ({name}): {message}")]
    Api {
        id: i64,
        name: String,
        message: String,
    },

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for Error {
    fn from(value: figment::Error) -> Self {
        Error::Config(Box::new(value))
    }
}
