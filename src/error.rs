use thiserror::Error;

/// Everything that can go wrong parsing a scan, building the valve network,
/// or searching it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected line format: {0}")]
    UnexpectedLine(String),

    #[error("duplicate valve name: {0}")]
    DuplicateName(String),

    #[error("{0} valves in scan, at most 256 supported")]
    TooManyValves(usize),

    #[error("valve {valve} leads to unknown valve {neighbor}")]
    UnknownNeighbor { valve: String, neighbor: String },

    #[error("unknown valve: {0}")]
    UnknownValve(String),

    #[error("{0}; narrow the openable set or lower the time horizon")]
    ResourceExhausted(String),
}
