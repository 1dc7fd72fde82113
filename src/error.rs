//! Server Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("could not listen on {_0}")]
    Bind(#[error(not(source))] String),
    #[display("server error")]
    Serve,
    #[display("storage error")]
    Storage,
    #[display("build error")]
    Build,
    #[display("background task failed")]
    Task,
    #[display("malformed webhook request")]
    MalformedWebhook,
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for ErrorKind {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
