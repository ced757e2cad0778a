//! Initial in-memory state.
//!
//! The seed is an explicit value handed to the store at startup; nothing in
//! the crate reads it from a global. `SeedData::demo` carries the bundled TB
//! research dataset, and `SeedData::load` accepts the same shape as JSON.

use std::error::Error;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use pharmadocs_store::models::{
    Comment,
    Document,
    DocumentStatus,
    Feedback,
    FileType,
    Molecule,
    Page,
    Preference,
    Rating,
    Tag,
    TagType,
    User,
};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum SeedError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnknownUser(String),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read seed file: {err}"),
            Self::Json(err) => write!(f, "invalid seed JSON: {err}"),
            Self::UnknownUser(id) => write!(f, "seed current user not found: {id}"),
        }
    }
}

impl Error for SeedError {}

impl From<std::io::Error> for SeedError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Full initial state for a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub users: Vec<User>,
    pub current_user_id: String,
    #[serde(default)]
    pub molecules: Vec<Molecule>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl SeedData {
    /// Parses a seed from JSON and checks that the current user exists.
    ///
    /// # Errors
    /// Returns `SeedError` if the JSON is malformed or the current user id is unknown.
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        let seed: Self = serde_json::from_str(json)?;
        seed.current_user()?;
        Ok(seed)
    }

    /// Reads and parses a seed file.
    ///
    /// # Errors
    /// Returns `SeedError` if the file cannot be read or fails validation.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Resolves the designated editor for this session.
    ///
    /// # Errors
    /// Returns `SeedError::UnknownUser` if `current_user_id` matches no user.
    pub fn current_user(&self) -> Result<&User, SeedError> {
        self.users
            .iter()
            .find(|user| user.id == self.current_user_id)
            .ok_or_else(|| SeedError::UnknownUser(self.current_user_id.clone()))
    }

    #[must_use]
    pub fn with_current_user(mut self, user_id: impl Into<String>) -> Self {
        self.current_user_id = user_id.into();
        self
    }

    /// Bundled demo dataset: three TB research documents.
    #[must_use]
    pub fn demo() -> Self {
        let users = vec![
            user("user-1", "Dr. Sarah Chen"),
            user("user-2", "James Miller"),
            user("user-3", "Emily Watson"),
        ];
        let molecules = vec![
            molecule("mol-1", "Aspirin", "CC(=O)OC1=CC=CC=C1C(=O)O", "C₉H₈O₄"),
            molecule("mol-2", "Caffeine", "CN1C=NC2=C1C(=O)N(C(=O)N2C)C", "C₈H₁₀N₄O₂"),
            molecule("mol-3", "Ibuprofen", "CC(C)CC1=CC=C(C=C1)C(C)C(=O)O", "C₁₃H₁₈O₂"),
            molecule("mol-4", "Paracetamol", "CC(=O)NC1=CC=C(O)C=C1", "C₈H₉NO₂"),
            molecule("mol-5", "Metformin", "CN(C)C(=N)NC(=N)N", "C₄H₁₁N₅"),
        ];
        let tags = vec![
            tag(
                "tag-1",
                "InhA",
                TagType::Protein,
                "Enoyl-ACP reductase, a key Mycobacterium tuberculosis enzyme targeted by TB drugs",
            ),
            tag(
                "tag-2",
                "DprE1",
                TagType::Protein,
                "Decaprenylphosphoryl-β-D-ribose 2′-epimerase, essential for mycobacterial cell wall synthesis",
            ),
            tag(
                "tag-3",
                "MDR-TB",
                TagType::Disease,
                "Multi-drug resistant tuberculosis, resistant to at least isoniazid and rifampicin",
            ),
            tag(
                "tag-4",
                "HPLC",
                TagType::Method,
                "High-performance liquid chromatography used for compound purity and quantification",
            ),
            // In vivo models are filed under methods.
            tag(
                "tag-5",
                "Murine TB Model",
                TagType::Method,
                "Mouse infection model used for in vivo evaluation of anti-tuberculosis compounds",
            ),
            tag(
                "tag-6",
                "Mass Spectrometry",
                TagType::Method,
                "Analytical technique for molecular identification and metabolite profiling",
            ),
        ];

        let documents = vec![
            Document {
                id: "doc-1".to_string(),
                title: "Preclinical Evaluation of BTZ-043 Against Drug-Resistant Tuberculosis"
                    .to_string(),
                file_name: "btz043_preclinical_mdr_tb_2023.pdf".to_string(),
                file_type: FileType::Pdf,
                uploaded_at: date(2023, 11, 12),
                page_count: 28,
                short_summary: "Preclinical assessment of the benzothiazinone BTZ-043 demonstrating strong activity against MDR-TB in murine infection models.".to_string(),
                medium_summary: "This study evaluates the preclinical efficacy of BTZ-043, a DprE1 inhibitor, against drug-resistant Mycobacterium tuberculosis strains. In vivo murine TB models showed significant bacterial load reduction in lung tissue after four weeks of treatment. Pharmacokinetic profiling and target engagement analyses support BTZ-043 as a promising lead compound for MDR-TB therapy. Analytical validation was performed using HPLC and mass spectrometry.".to_string(),
                tags: pick(&tags, &[0, 1, 2, 4]),
                molecules: pick(&molecules, &[0]),
                pages: vec![
                    page(
                        "p1",
                        1,
                        "Introduction to benzothiazinones and their role in targeting mycobacterial cell wall synthesis...",
                    ),
                    page(
                        "p2",
                        2,
                        "Description of murine TB infection models and dosing regimens...",
                    ),
                ],
                feedback: Feedback {
                    rating: rating(5),
                    preference: Preference::Like,
                    comment: String::new(),
                    comments: vec![Comment {
                        id: "c1".to_string(),
                        text: "Strong in vivo efficacy data; recommend progression to lead optimization.".to_string(),
                        author: users[1].clone(),
                        created_at: date(2023, 11, 14),
                    }],
                },
                status: DocumentStatus::Ready,
                last_edited_by: Some(users[1].clone()),
                last_edited_at: Some(date(2023, 11, 15)),
            },
            Document {
                id: "doc-2".to_string(),
                title: "Targeting DprE1 for Tuberculosis Drug Discovery: A Consortium Review"
                    .to_string(),
                file_name: "dpre1_target_review_tbdda.pdf".to_string(),
                file_type: FileType::Pdf,
                uploaded_at: date(2024, 1, 8),
                page_count: 22,
                short_summary: "Consortium review of DprE1 as a validated drug target for tuberculosis, summarizing recent inhibitor classes and challenges.".to_string(),
                medium_summary: "This TB Drug Discovery Accelerator consortium review summarizes progress in targeting DprE1, an essential enzyme in Mycobacterium tuberculosis cell wall biosynthesis. The document covers multiple inhibitor scaffolds, resistance mechanisms, and structure–activity relationships. Analytical approaches including HPLC and mass spectrometry are discussed for compound validation. Implications for MDR-TB drug development are highlighted.".to_string(),
                tags: pick(&tags, &[1, 2, 3, 5]),
                molecules: pick(&molecules, &[2, 3]),
                pages: vec![page(
                    "p1",
                    1,
                    "Overview of DprE1 biology and essentiality in M. tuberculosis...",
                )],
                feedback: Feedback {
                    rating: rating(4),
                    ..Feedback::default()
                },
                status: DocumentStatus::Ready,
                last_edited_by: Some(users[2].clone()),
                last_edited_at: Some(date(2024, 1, 10)),
            },
            Document {
                id: "doc-3".to_string(),
                title: "Pharmacokinetic Profiling of Anti-TB Compounds in Murine Models".to_string(),
                file_name: "pk_profiling_tb_compounds.pptx".to_string(),
                file_type: FileType::from_file_name("pk_profiling_tb_compounds.pptx"),
                uploaded_at: date(2024, 2, 2),
                page_count: 34,
                short_summary: "Presentation summarizing pharmacokinetic and exposure data for multiple TB-active compounds in murine models.".to_string(),
                medium_summary: "This presentation reviews pharmacokinetic studies conducted on a panel of TB-active compounds, including BTZ-043 analogs. Data include plasma concentration–time profiles, tissue distribution, and clearance rates in murine TB infection models. Mass spectrometry–based quantification methods were used to support exposure–response analysis.".to_string(),
                tags: pick(&tags, &[4, 5]),
                molecules: pick(&molecules, &[0, 1]),
                pages: Vec::new(),
                feedback: Feedback::default(),
                status: DocumentStatus::Ready,
                last_edited_by: None,
                last_edited_at: None,
            },
        ];

        Self {
            users,
            current_user_id: "user-1".to_string(),
            molecules,
            tags,
            documents,
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn rating(value: u8) -> Rating {
    Rating::new(value).unwrap_or_default()
}

fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        avatar: None,
    }
}

fn molecule(id: &str, name: &str, smiles: &str, formula: &str) -> Molecule {
    Molecule {
        id: id.to_string(),
        name: name.to_string(),
        smiles: smiles.to_string(),
        formula: formula.to_string(),
    }
}

fn tag(id: &str, label: &str, tag_type: TagType, description: &str) -> Tag {
    Tag {
        id: id.to_string(),
        label: label.to_string(),
        tag_type,
        description: Some(description.to_string()),
    }
}

fn page(id: &str, page_number: u32, text: &str) -> Page {
    Page {
        id: id.to_string(),
        page_number,
        text: text.to_string(),
        images: Vec::new(),
    }
}

fn pick<T: Clone>(items: &[T], indexes: &[usize]) -> Vec<T> {
    indexes
        .iter()
        .filter_map(|index| items.get(*index).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_seed_is_consistent() {
        let seed = SeedData::demo();
        assert_eq!(seed.documents.len(), 3);
        assert_eq!(seed.tags.len(), 6);
        assert_eq!(seed.molecules.len(), 5);
        assert_eq!(seed.current_user().expect("current user").name, "Dr. Sarah Chen");
        assert_eq!(seed.documents[2].file_type, FileType::Ppt);
        assert_eq!(seed.documents[0].feedback.comments.len(), 1);
    }

    #[test]
    fn json_seed_round_trips_through_loader() {
        let json = serde_json::to_string(&SeedData::demo()).expect("serialize seed");
        let parsed = SeedData::from_json_str(&json).expect("parse seed");
        assert_eq!(parsed, SeedData::demo());
    }

    #[test]
    fn unknown_current_user_is_rejected() {
        let json = serde_json::to_string(&SeedData::demo().with_current_user("user-404"))
            .expect("serialize seed");
        let err = SeedData::from_json_str(&json).expect_err("unknown user should fail");
        assert!(matches!(err, SeedError::UnknownUser(id) if id == "user-404"));
    }
}
