use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("No roads found in the requested area")]
    EmptyArea,
    #[error("Road data request timed out, try a smaller area")]
    UpstreamTimeout,
    #[error("Road data provider is rate limiting requests")]
    UpstreamRateLimited,
    #[error("Road data provider returned status {0}")]
    UpstreamServerError(u16),
    #[error("Unexpected road data response: {0}")]
    UpstreamBadShape(String),
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("No road intersection near the requested point")]
    NoNearbyIntersection,
    #[error("No route between the requested points, road networks are disconnected")]
    Unreachable,
    #[error("Route search exceeded its node visit limit")]
    SearchAborted,
    #[error("Route reconstruction produced an inconsistent path")]
    ReconstructionFailed,
}

impl Error {
    /// HTTP status code this error surfaces as. The HTTP layer itself is out
    /// of scope for this crate, so the mapping lives here for front doors to
    /// reuse.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidCoordinates(_) => 400,
            Error::EmptyArea | Error::NoNearbyIntersection | Error::Unreachable => 404,
            Error::UpstreamTimeout => 408,
            Error::UpstreamRateLimited | Error::UpstreamServerError(_) | Error::Transport(_) => 503,
            Error::UpstreamBadShape(_) | Error::SearchAborted | Error::ReconstructionFailed => 500,
        }
    }
}
