use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
    core::item::{ItemProcessor, ItemProcessorResult},
    BatchError,
};

/// One CSV row, resolved by header name but otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseRow {
    /// 1-based physical line of the row in the source (the header is line 1).
    pub line: u64,
    pub japanese: String,
    pub english: String,
    pub level: String,
}

/// Difficulty level of a phrase pair.
///
/// Serialized untagged: a text level becomes a JSON string, a numeric level
/// a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Level {
    Text(String),
    Numeric(i64),
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Text(text) => f.write_str(text),
            Level::Numeric(value) => write!(f, "{}", value),
        }
    }
}

/// A normalized phrase pair.
///
/// Serialized as `{"和文": .., "英文": .., "chapter": ..}`, in that order,
/// which is the shape the quiz front end loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseRecord {
    #[serde(rename = "和文")]
    pub japanese: String,
    #[serde(rename = "英文")]
    pub english: String,
    #[serde(rename = "chapter")]
    pub level: Level,
}

/// How the level column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelMode {
    /// Keep the trimmed text.
    #[default]
    Text,
    /// Parse the trimmed text as an integer.
    Numeric,
}

impl FromStr for LevelMode {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text-level" => Ok(LevelMode::Text),
            "numeric-level" => Ok(LevelMode::Numeric),
            other => Err(BatchError::ItemProcessor(format!(
                "unknown level mode '{}', expected 'text-level' or 'numeric-level'",
                other
            ))),
        }
    }
}

impl fmt::Display for LevelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelMode::Text => f.write_str("text-level"),
            LevelMode::Numeric => f.write_str("numeric-level"),
        }
    }
}

/// Maps a raw row to a [`PhraseRecord`].
///
/// Every field is trimmed of leading and trailing whitespace. In
/// [`LevelMode::Numeric`] the trimmed level must be an integer literal,
/// otherwise [`BatchError::InvalidLevel`] is returned with the row's line.
pub fn transform(row: &PhraseRow, mode: LevelMode) -> Result<PhraseRecord, BatchError> {
    let level_text = row.level.trim();

    let level = match mode {
        LevelMode::Text => Level::Text(level_text.to_owned()),
        LevelMode::Numeric => {
            let value = parse_level(level_text).ok_or_else(|| BatchError::InvalidLevel {
                line: row.line,
                value: row.level.clone(),
            })?;
            Level::Numeric(value)
        }
    };

    Ok(PhraseRecord {
        japanese: row.japanese.trim().to_owned(),
        english: row.english.trim().to_owned(),
        level,
    })
}

/// Parses an integer literal: optional sign, then decimal digits with single
/// underscores allowed between them. Full-width digits (`０`-`９`) are
/// accepted since they are common in Japanese spreadsheets.
///
/// Digits are accumulated with the literal's sign so `i64::MIN` fits.
fn parse_level(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__")
    {
        return None;
    }

    let mut value: i64 = 0;
    for c in digits.chars() {
        let digit = match c {
            '_' => continue,
            '0'..='9' => c as u32 - '0' as u32,
            '０'..='９' => c as u32 - '０' as u32,
            _ => return None,
        };
        let digit = i64::from(digit);
        value = value.checked_mul(10)?;
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
    }

    Some(value)
}

/// [`ItemProcessor`] applying [`transform`] with a fixed mode.
#[derive(Debug, Default)]
pub struct PhraseProcessor {
    mode: LevelMode,
}

impl PhraseProcessor {
    pub fn new(mode: LevelMode) -> Self {
        Self { mode }
    }
}

impl ItemProcessor<PhraseRow, PhraseRecord> for PhraseProcessor {
    fn process(&self, item: &PhraseRow) -> ItemProcessorResult<PhraseRecord> {
        transform(item, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use crate::BatchError;

    use super::{parse_level, transform, Level, LevelMode, PhraseRecord, PhraseRow};

    fn row(japanese: &str, english: &str, level: &str) -> PhraseRow {
        PhraseRow {
            line: 2,
            japanese: japanese.to_string(),
            english: english.to_string(),
            level: level.to_string(),
        }
    }

    #[test]
    fn fields_are_trimmed_on_both_sides() {
        let record = transform(&row("  犬  ", " Dog\t", " 1 "), LevelMode::Text).unwrap();

        assert_eq!(
            record,
            PhraseRecord {
                japanese: "犬".to_string(),
                english: "Dog".to_string(),
                level: Level::Text("1".to_string()),
            }
        );
    }

    #[test]
    fn ideographic_space_is_trimmed() {
        let record = transform(&row("\u{3000}猫\u{3000}", "Cat", "2"), LevelMode::Text).unwrap();

        assert_eq!(record.japanese, "猫");
    }

    #[test]
    fn text_mode_keeps_non_numeric_level() {
        let record = transform(&row("犬", "Dog", " beginner "), LevelMode::Text).unwrap();

        assert_eq!(record.level, Level::Text("beginner".to_string()));
    }

    #[test]
    fn numeric_mode_parses_level() {
        let record = transform(&row("犬", "Dog", " 12 "), LevelMode::Numeric).unwrap();

        assert_eq!(record.level, Level::Numeric(12));
    }

    #[test]
    fn numeric_mode_rejects_text_and_empty_levels() {
        for value in ["abc", "", "   ", "1.5", "1 2"] {
            let result = transform(&row("犬", "Dog", value), LevelMode::Numeric);

            match result {
                Err(BatchError::InvalidLevel { line, value: raw }) => {
                    assert_eq!(line, 2);
                    assert_eq!(raw, value);
                }
                other => panic!("expected InvalidLevel for {:?}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn integer_literals_follow_python_int_rules() {
        assert_eq!(parse_level("+7"), Some(7));
        assert_eq!(parse_level("-3"), Some(-3));
        assert_eq!(parse_level("1_000"), Some(1000));
        assert_eq!(parse_level("０３"), Some(3));
        assert_eq!(parse_level("_1"), None);
        assert_eq!(parse_level("1__0"), None);
        assert_eq!(parse_level("-"), None);
        assert_eq!(parse_level("99999999999999999999"), None);
    }

    #[test]
    fn integer_limits() {
        assert_eq!(parse_level("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_level("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_level("9223372036854775808"), None);
        assert_eq!(parse_level("-9223372036854775809"), None);
        assert_eq!(parse_level("-0"), Some(0));
    }

    #[test]
    fn transformation_is_deterministic() {
        let input = row(" 鳥 ", " Bird ", " 3 ");

        assert_eq!(
            transform(&input, LevelMode::Numeric).unwrap(),
            transform(&input, LevelMode::Numeric).unwrap()
        );
    }

    #[test]
    fn level_mode_round_trips_through_its_name() {
        for mode in [LevelMode::Text, LevelMode::Numeric] {
            assert_eq!(mode.to_string().parse::<LevelMode>().unwrap(), mode);
        }
        assert!("float-level".parse::<LevelMode>().is_err());
    }

    #[test]
    fn record_serializes_with_quiz_keys_and_numeric_chapter() {
        let record = transform(&row("犬", "Dog", "1"), LevelMode::Numeric).unwrap();

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"和文":"犬","英文":"Dog","chapter":1}"#
        );
    }
}
