use rep_counter_core::Exercise;

#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{got} event delivered to the {expected} board")]
    ExerciseMismatch { expected: Exercise, got: Exercise },
}
