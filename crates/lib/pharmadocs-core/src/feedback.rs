//! Pure feedback reducers.
//!
//! Each reducer takes the current document by reference and returns the next
//! snapshot. Callers swap their stored copy for the returned value; the input
//! is never touched, so it can be kept around as history.

use chrono::{DateTime, Utc};
use pharmadocs_store::models::{Comment, Document, FeedbackPatch, Preference, User};
use pharmadocs_store::schema::make_comment_id;
use uuid::Uuid;

/// Shallow-merges `patch` over the document's feedback and records the edit.
#[must_use]
pub fn apply_feedback(
    document: &Document,
    patch: FeedbackPatch,
    editor: &User,
    now: DateTime<Utc>,
) -> Document {
    let FeedbackPatch {
        rating,
        preference,
        comment,
        comments,
    } = patch;

    let mut next = document.clone();
    if let Some(rating) = rating {
        next.feedback.rating = rating;
    }
    if let Some(preference) = preference {
        next.feedback.preference = preference;
    }
    if let Some(comment) = comment {
        next.feedback.comment = comment;
    }
    if let Some(comments) = comments {
        next.feedback.comments = comments;
    }
    next.last_edited_by = Some(editor.clone());
    next.last_edited_at = Some(now);
    next
}

/// Appends a comment, or returns an identical copy when `text` is blank.
#[must_use]
pub fn add_comment(document: &Document, text: &str, author: &User, now: DateTime<Utc>) -> Document {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return document.clone();
    }

    let mut comments = document.feedback.comments.clone();
    comments.push(Comment {
        id: make_comment_id(&Uuid::new_v4().simple().to_string()),
        text: trimmed.to_string(),
        author: author.clone(),
        created_at: now,
    });
    apply_feedback(
        document,
        FeedbackPatch::default().with_comments(comments),
        author,
        now,
    )
}

/// Picking the active preference again clears it.
#[must_use]
pub fn toggle_preference(current: Preference, chosen: Preference) -> Preference {
    if current == chosen {
        Preference::None
    } else {
        chosen
    }
}
