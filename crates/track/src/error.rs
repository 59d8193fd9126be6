use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Failed to parse postime: {0}")]
    PostimeParse(#[from] chrono::ParseError),
}
