use std::error::Error;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{MAX_RATING, MIN_RATING};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    RatingOutOfRange(u8),
    UnknownVariant { kind: &'static str, value: String },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingOutOfRange(value) => {
                write!(f, "rating {value} is outside {MIN_RATING}..={MAX_RATING}")
            }
            Self::UnknownVariant { kind, value } => write!(f, "unknown {kind}: {value}"),
        }
    }
}

impl Error for ModelError {}

/// Category of an extracted-entity tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Molecule,
    Protein,
    Pathway,
    Method,
    Disease,
}

impl TagType {
    pub const ALL: [Self; 5] = [
        Self::Molecule,
        Self::Protein,
        Self::Pathway,
        Self::Method,
        Self::Disease,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Molecule => "molecule",
            Self::Protein => "protein",
            Self::Pathway => "pathway",
            Self::Method => "method",
            Self::Disease => "disease",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagType {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "tag type",
                value: value.to_string(),
            })
    }
}

/// Categorized label attached to a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub tag_type: TagType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Molecule referenced by a document. The SMILES string is carried as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Molecule {
    pub id: String,
    pub name: String,
    pub smiles: String,
    pub formula: String,
}

/// Raw text placeholder for a single document page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub page_number: u32,
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
}

/// Star rating bounded to `MIN_RATING..=MAX_RATING`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Builds a rating, rejecting values above the scale.
    ///
    /// # Errors
    /// Returns `ModelError::RatingOutOfRange` when `value` is not in range.
    pub const fn new(value: u8) -> Result<Self, ModelError> {
        if value > MAX_RATING {
            return Err(ModelError::RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Like,
    Dislike,
    Maybe,
    #[default]
    None,
}

impl Preference {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::Maybe => "maybe",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            "maybe" => Ok(Self::Maybe),
            "none" | "" => Ok(Self::None),
            _ => Err(ModelError::UnknownVariant {
                kind: "preference",
                value: value.to_string(),
            }),
        }
    }
}

/// Per-document user assessment. Replaced wholesale on every edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub rating: Rating,
    #[serde(default)]
    pub preference: Preference,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Partial feedback update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<Preference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl FeedbackPatch {
    #[must_use]
    pub const fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub const fn with_preference(mut self, preference: Preference) -> Self {
        self.preference = Some(preference);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = Some(comments);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rating.is_none()
            && self.preference.is_none()
            && self.comment.is_none()
            && self.comments.is_none()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Ppt,
    Docx,
}

impl FileType {
    /// Infers the file type from a file name's extension.
    ///
    /// Slide decks (`.ppt`, `.pptx`) map to `Ppt`; anything that is neither a
    /// PDF nor a deck is treated as a word-processor document.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Self {
        let lowered = file_name.trim().to_ascii_lowercase();
        if lowered.ends_with(".pdf") {
            Self::Pdf
        } else if lowered.ends_with(".ppt") || lowered.ends_with(".pptx") {
            Self::Ppt
        } else {
            Self::Docx
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    #[default]
    Ready,
    Error,
}

/// Research document record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub file_name: String,
    pub file_type: FileType,
    pub uploaded_at: DateTime<Utc>,
    pub page_count: u32,
    pub short_summary: String,
    pub medium_summary: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub molecules: Vec<Molecule>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub feedback: Feedback,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_at: Option<DateTime<Utc>>,
}

impl Document {
    #[must_use]
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_rejects_values_above_scale() {
        assert_eq!(Rating::new(5).map(Rating::value), Ok(5));
        assert_eq!(Rating::new(6), Err(ModelError::RatingOutOfRange(6)));
    }

    #[test]
    fn rating_deserialization_goes_through_bounds_check() {
        let ok: Result<Rating, _> = serde_json::from_str("3");
        assert_eq!(ok.expect("3 is a valid rating").value(), 3);

        let err: Result<Rating, _> = serde_json::from_str("9");
        assert!(err.is_err());
    }

    #[test]
    fn preference_uses_lowercase_wire_names() {
        let json = serde_json::to_string(&Preference::None).expect("serialize preference");
        assert_eq!(json, "\"none\"");
        let parsed: Preference = serde_json::from_str("\"dislike\"").expect("parse preference");
        assert_eq!(parsed, Preference::Dislike);
        assert_eq!("Maybe".parse::<Preference>(), Ok(Preference::Maybe));
        assert!("love".parse::<Preference>().is_err());
    }

    #[test]
    fn tag_type_serializes_under_type_key() {
        let tag = Tag {
            id: "tag-1".to_string(),
            label: "InhA".to_string(),
            tag_type: TagType::Protein,
            description: None,
        };
        let value = serde_json::to_value(&tag).expect("serialize tag");
        assert_eq!(value["type"], "protein");
        assert!(value.get("description").is_none());
        assert_eq!("DISEASE".parse::<TagType>(), Ok(TagType::Disease));
    }

    #[test]
    fn file_type_is_inferred_from_extension() {
        assert_eq!(FileType::from_file_name("study.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_file_name("deck.pptx"), FileType::Ppt);
        assert_eq!(FileType::from_file_name("deck.ppt"), FileType::Ppt);
        assert_eq!(FileType::from_file_name("notes.docx"), FileType::Docx);
        assert_eq!(FileType::from_file_name("README"), FileType::Docx);
    }

    #[test]
    fn feedback_patch_omits_absent_fields() {
        let patch = FeedbackPatch::default().with_preference(Preference::Like);
        let value = serde_json::to_value(&patch).expect("serialize patch");
        assert_eq!(value, serde_json::json!({ "preference": "like" }));
        assert!(!patch.is_empty());
        assert!(FeedbackPatch::default().is_empty());
    }
}
