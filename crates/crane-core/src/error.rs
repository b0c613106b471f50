use thiserror::Error;

pub type CraneResult<T> = Result<T, CraneError>;

/// Cargo rejection sampling ran out of attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error(
        "cargo placement exhausted {attempts} attempts after placing {placed} of {requested} cargo"
    )]
    Exhausted {
        placed: usize,
        requested: usize,
        attempts: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraneError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CraneError {
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_useful_messages() {
        let err: CraneError = PlacementError::Exhausted {
            placed: 3,
            requested: 10,
            attempts: 500,
        }
        .into();
        let msg = format!("{err}");
        assert!(msg.contains("500 attempts"), "{msg}");
        assert!(msg.contains("3 of 10"), "{msg}");

        let err = CraneError::invalid_config("max_placement_attempts must be > 0");
        assert!(format!("{err}").contains("max_placement_attempts"));
    }
}
