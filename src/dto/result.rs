use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{GameResultEntity, NewGameResultEntity},
    dto::{format_system_time, validation::validate_difficulty},
    state::session::Completion,
};

/// Payload submitted once a game completes.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitResultRequest {
    /// Grid tag the game was played on (e.g. `"3x2"`).
    pub difficulty: String,
    /// Completed two-card resolutions.
    pub moves: u32,
    /// Wall time between the first flip and the final match, in seconds.
    pub time_taken_seconds: u32,
    /// Groups found during the game.
    pub matches_made: u32,
}

impl SubmitResultRequest {
    /// Build a submission from a finished session's completion stats.
    pub fn from_completion(difficulty: impl Into<String>, completion: &Completion) -> Self {
        Self {
            difficulty: difficulty.into(),
            moves: completion.moves,
            time_taken_seconds: completion.elapsed.as_secs() as u32,
            matches_made: completion.matched_pairs as u32,
        }
    }
}

impl Validate for SubmitResultRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_difficulty(&self.difficulty) {
            errors.add("difficulty", e);
        }

        if self.moves == 0 {
            let mut err = ValidationError::new("moves_range");
            err.message = Some("A completed game has at least one move".into());
            errors.add("moves", err);
        }

        if self.matches_made == 0 {
            let mut err = ValidationError::new("matches_range");
            err.message = Some("A completed game has at least one match".into());
            errors.add("matches_made", err);
        }

        if self.matches_made > self.moves {
            let mut err = ValidationError::new("matches_exceed_moves");
            err.message = Some("Matches cannot exceed moves".into());
            errors.add("matches_made", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl From<SubmitResultRequest> for NewGameResultEntity {
    fn from(value: SubmitResultRequest) -> Self {
        Self {
            difficulty: value.difficulty,
            moves: value.moves,
            time_taken_seconds: value.time_taken_seconds,
            matches_made: value.matches_made,
        }
    }
}

/// Query parameters accepted by the high-scores route.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct HighScoresQuery {
    /// Restrict results to one grid tag.
    pub difficulty: Option<String>,
    /// Maximum number of records to return (defaults to 10).
    pub limit: Option<usize>,
}

/// Stored record returned once a result has been persisted or listed.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameResultSummary {
    /// Identifier assigned by the store.
    pub id: String,
    /// Grid tag the game was played on.
    pub difficulty: String,
    /// Completed two-card resolutions.
    pub moves: u32,
    /// Wall time between the first flip and the final match, in seconds.
    pub time_taken_seconds: u32,
    /// Groups found during the game.
    pub matches_made: u32,
    /// Completion timestamp in RFC 3339.
    pub completed_at: String,
}

impl From<GameResultEntity> for GameResultSummary {
    fn from(entity: GameResultEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            difficulty: entity.difficulty,
            moves: entity.moves,
            time_taken_seconds: entity.time_taken_seconds,
            matches_made: entity.matches_made,
            completed_at: format_system_time(entity.completed_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmitResultRequest {
        SubmitResultRequest {
            difficulty: "3x2".into(),
            moves: 5,
            time_taken_seconds: 42,
            matches_made: 3,
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn invalid_fields_are_each_reported() {
        let payload = SubmitResultRequest {
            difficulty: "easy".into(),
            moves: 0,
            time_taken_seconds: 42,
            matches_made: 0,
        };

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("difficulty"));
        assert!(fields.contains_key("moves"));
        assert!(fields.contains_key("matches_made"));
    }

    #[test]
    fn completion_stats_convert_into_a_valid_submission() {
        use std::time::Duration;

        let completion = Completion {
            moves: 7,
            elapsed: Duration::from_secs(61),
            matched_pairs: 3,
            total_pairs: 3,
        };

        let payload = SubmitResultRequest::from_completion("3x2", &completion);

        assert_eq!(payload.moves, 7);
        assert_eq!(payload.time_taken_seconds, 61);
        assert_eq!(payload.matches_made, 3);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn matches_cannot_exceed_moves() {
        let payload = SubmitResultRequest {
            moves: 2,
            matches_made: 3,
            ..request()
        };

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("matches_made"));
    }
}
