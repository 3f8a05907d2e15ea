//! Input validation rules for board content.
//!
//! # Responsibility
//! - Enforce text length contracts for situations, excuses and comments.
//! - Enforce nickname shape at registration.
//!
//! # Invariants
//! - Lengths are counted in characters, not bytes.
//! - Validation runs before any persistence side effect.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const SITUATION_MIN_CHARS: usize = 3;
pub const EXCUSE_MIN_CHARS: usize = 5;
pub const EXCUSE_MAX_CHARS: usize = 100;
pub const COMMENT_MIN_CHARS: usize = 1;
pub const COMMENT_MAX_CHARS: usize = 200;

static NICKNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{2,20}$").expect("valid nickname regex"));

/// Rejected caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    SituationTooShort { min: usize, actual: usize },
    ExcuseLengthOutOfRange { min: usize, max: usize, actual: usize },
    CommentLengthOutOfRange { min: usize, max: usize, actual: usize },
    InvalidNickname(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SituationTooShort { min, actual } => {
                write!(f, "situation needs at least {min} characters, got {actual}")
            }
            Self::ExcuseLengthOutOfRange { min, max, actual } => {
                write!(f, "excuse must be {min}-{max} characters, got {actual}")
            }
            Self::CommentLengthOutOfRange { min, max, actual } => {
                write!(f, "comment must be {min}-{max} characters, got {actual}")
            }
            Self::InvalidNickname(value) => write!(f, "invalid nickname: `{value}`"),
        }
    }
}

impl Error for ValidationError {}

pub fn validate_situation(situation: &str) -> Result<(), ValidationError> {
    let actual = situation.trim().chars().count();
    if actual < SITUATION_MIN_CHARS {
        return Err(ValidationError::SituationTooShort {
            min: SITUATION_MIN_CHARS,
            actual,
        });
    }
    Ok(())
}

pub fn validate_excuse(excuse: &str) -> Result<(), ValidationError> {
    let actual = excuse.trim().chars().count();
    if !(EXCUSE_MIN_CHARS..=EXCUSE_MAX_CHARS).contains(&actual) {
        return Err(ValidationError::ExcuseLengthOutOfRange {
            min: EXCUSE_MIN_CHARS,
            max: EXCUSE_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

pub fn validate_comment_content(content: &str) -> Result<(), ValidationError> {
    let actual = content.trim().chars().count();
    if !(COMMENT_MIN_CHARS..=COMMENT_MAX_CHARS).contains(&actual) {
        return Err(ValidationError::CommentLengthOutOfRange {
            min: COMMENT_MIN_CHARS,
            max: COMMENT_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if NICKNAME_RE.is_match(nickname) {
        Ok(())
    } else {
        Err(ValidationError::InvalidNickname(nickname.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        validate_comment_content, validate_excuse, validate_nickname, validate_situation,
        ValidationError,
    };

    #[test]
    fn situation_requires_three_chars_after_trim() {
        assert!(validate_situation("  ab  ").is_err());
        assert!(validate_situation("abc").is_ok());
    }

    #[test]
    fn excuse_length_is_bounded() {
        assert!(matches!(
            validate_excuse("spry"),
            Err(ValidationError::ExcuseLengthOutOfRange { actual: 4, .. })
        ));
        assert!(validate_excuse("my dog ate the deadline").is_ok());
        assert!(validate_excuse(&"x".repeat(101)).is_err());
    }

    #[test]
    fn comment_rejects_blank_and_overlong_content() {
        assert!(validate_comment_content("   ").is_err());
        assert!(validate_comment_content("fair enough").is_ok());
        assert!(validate_comment_content(&"y".repeat(201)).is_err());
    }

    #[test]
    fn nickname_shape_is_enforced() {
        assert!(validate_nickname("board_fan-1").is_ok());
        assert!(validate_nickname("a").is_err());
        assert!(validate_nickname("has space").is_err());
        assert!(validate_nickname(&"z".repeat(21)).is_err());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // Multi-byte text within the character bounds.
        assert!(validate_excuse("궁색한 변명들").is_ok());
    }
}
