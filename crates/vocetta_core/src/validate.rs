//! Request validation.
//!
//! Rules run in a fixed order and the first violation wins: text length,
//! voice, speed, format, instructions, repeated-content heuristics. The
//! output is a [`ValidatedRequest`] carrying the derived character count
//! and detected language, so validation happens exactly once per request.

use crate::{AudioFormat, Language, SpeechParams, ValidatedRequest, Voice};
use std::str::FromStr;
use vocetta_error::{ValidationError, ValidationErrorKind};

/// Minimum trimmed input length.
pub const MIN_TEXT_LENGTH: usize = 10;
/// Maximum trimmed input length (upstream API limit).
pub const MAX_TEXT_LENGTH: usize = 4096;
/// Minimum playback speed.
pub const MIN_SPEED: f64 = 0.25;
/// Maximum playback speed.
pub const MAX_SPEED: f64 = 4.0;
/// Maximum trimmed instructions length.
pub const MAX_INSTRUCTIONS_LENGTH: usize = 1000;

const DEFAULT_SPEED: f64 = 1.0;

/// A single character repeated more than this many times in a row is spam.
const MAX_CHAR_RUN: usize = 20;
/// A word repeated consecutively more than this many times is spam.
const MAX_WORD_RUN: usize = 10;

/// Validate raw synthesis parameters into a [`ValidatedRequest`].
///
/// Pure function over its inputs; absent speed and format fall back to
/// 1.0 and [`AudioFormat::Mp3`], blank instructions are dropped.
///
/// # Errors
///
/// Returns a [`ValidationError`] describing the first rule violated.
///
/// # Examples
///
/// ```
/// use vocetta_core::{SpeechParams, validate};
///
/// let params = SpeechParams {
///     input: Some("The quick brown fox jumps over the lazy dog.".to_string()),
///     voice: Some("coral".to_string()),
///     ..Default::default()
/// };
///
/// let request = validate(&params).unwrap();
/// assert_eq!(*request.speed(), 1.0);
/// assert_eq!(*request.character_count(), 36);
/// ```
pub fn validate(params: &SpeechParams) -> Result<ValidatedRequest, ValidationError> {
    let input = validate_text(params.input.as_deref().unwrap_or(""))?;
    let voice = validate_voice(params.voice.as_deref().unwrap_or(""))?;

    // Empty strings behave like absent parameters, mirroring form posts
    // that submit every field.
    let speed = match params.speed.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => validate_speed(raw)?,
        None => DEFAULT_SPEED,
    };
    let format = match params.format.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => validate_format(raw)?,
        None => AudioFormat::default(),
    };
    let instructions = validate_instructions(params.instructions.as_deref())?;

    if has_repeated_chars(&input) || has_repeated_words(&input) {
        return Err(ValidationError::new(ValidationErrorKind::RepeatedContent));
    }

    let character_count = count_characters(&input) as u64;
    let language = Language::detect(&input);

    Ok(ValidatedRequest::new(
        input,
        voice,
        speed,
        format,
        instructions,
        character_count,
        language,
    ))
}

/// Count the characters that bill against the quota.
///
/// Whitespace is free; everything else counts, one Unicode scalar value
/// at a time.
pub fn count_characters(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

fn validate_text(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();

    if len < MIN_TEXT_LENGTH {
        return Err(ValidationError::new(ValidationErrorKind::TextTooShort {
            min: MIN_TEXT_LENGTH,
        }));
    }
    if len > MAX_TEXT_LENGTH {
        return Err(ValidationError::new(ValidationErrorKind::TextTooLong {
            max: MAX_TEXT_LENGTH,
        }));
    }

    Ok(trimmed.to_string())
}

fn validate_voice(raw: &str) -> Result<Voice, ValidationError> {
    Voice::from_str(raw)
        .map_err(|_| ValidationError::new(ValidationErrorKind::InvalidVoice(raw.to_string())))
}

fn validate_speed(raw: &str) -> Result<f64, ValidationError> {
    let speed: f64 = raw
        .parse()
        .map_err(|_| ValidationError::new(ValidationErrorKind::InvalidSpeed(raw.to_string())))?;

    // NaN fails the containment check along with out-of-range values.
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(ValidationError::new(ValidationErrorKind::InvalidSpeed(
            raw.to_string(),
        )));
    }

    Ok(speed)
}

fn validate_format(raw: &str) -> Result<AudioFormat, ValidationError> {
    AudioFormat::from_str(raw)
        .map_err(|_| ValidationError::new(ValidationErrorKind::InvalidFormat(raw.to_string())))
}

fn validate_instructions(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_INSTRUCTIONS_LENGTH {
        return Err(ValidationError::new(
            ValidationErrorKind::InstructionsTooLong {
                max: MAX_INSTRUCTIONS_LENGTH,
            },
        ));
    }

    Ok(Some(trimmed.to_string()))
}

/// Flags any single character repeated more than [`MAX_CHAR_RUN`] times in a row.
fn has_repeated_chars(text: &str) -> bool {
    let mut prev: Option<char> = None;
    let mut run = 0usize;

    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
            if run > MAX_CHAR_RUN {
                return true;
            }
        } else {
            prev = Some(c);
            run = 1;
        }
    }

    false
}

/// Flags the same whitespace-delimited word appearing more than
/// [`MAX_WORD_RUN`] times consecutively. Comparison is case-sensitive.
fn has_repeated_words(text: &str) -> bool {
    let mut prev: Option<&str> = None;
    let mut run = 0usize;

    for word in text.split_whitespace() {
        if Some(word) == prev {
            run += 1;
            if run > MAX_WORD_RUN {
                return true;
            }
        } else {
            prev = Some(word);
            run = 1;
        }
    }

    false
}
