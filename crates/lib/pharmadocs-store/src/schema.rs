pub const MIN_RATING: u8 = 0;
pub const MAX_RATING: u8 = 5;

pub const COMMENT_ID_PREFIX: &str = "c-";

pub fn make_comment_id(suffix: &str) -> String {
    format!("{COMMENT_ID_PREFIX}{suffix}")
}
