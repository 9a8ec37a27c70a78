//! Recognized page documents kept per user.

use penflow_recognizer::RecognitionResult;
use serde::{Deserialize, Serialize};

use crate::submission::PageSubmission;

/// A ranked recognition alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Position in the alternatives list, best first.
    pub rank: usize,
    /// Alternative text.
    pub label: String,
}

/// A recognized word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentWord {
    /// Best guess.
    pub label: String,
    /// Ranked alternatives.
    pub candidates: Option<Vec<Candidate>>,
}

/// Recognition outcome for one page, stored per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedDocument {
    /// Paper section code.
    pub section_code: i32,
    /// Paper owner code.
    pub owner_code: i32,
    /// Note code.
    pub note_code: i32,
    /// Note uuid, when the page carried one.
    #[serde(rename = "noteUUID")]
    pub note_uuid: Option<String>,
    /// Page number.
    pub page_number: i32,
    /// Submitting user.
    pub user_id: String,
    /// Recognition language.
    pub language: String,
    /// Full recognized text.
    pub label: Option<String>,
    /// Words with a non-blank label.
    pub words: Option<Vec<DocumentWord>>,
}

impl RecognizedDocument {
    /// Builds the document for `page` from its recognition result.
    pub fn build(
        user_id: impl Into<String>,
        page: &PageSubmission,
        language: impl Into<String>,
        result: &RecognitionResult,
    ) -> Self {
        let words = result.words.as_ref().map(|_| {
            result
                .labeled_words()
                .map(|word| DocumentWord {
                    label: word.label.clone(),
                    candidates: word
                        .candidates
                        .as_ref()
                        .filter(|c| !c.is_empty())
                        .map(|c| {
                            c.iter()
                                .enumerate()
                                .map(|(rank, label)| Candidate {
                                    rank,
                                    label: label.clone(),
                                })
                                .collect()
                        }),
                })
                .collect()
        });

        Self {
            section_code: page.section,
            owner_code: page.owner,
            note_code: page.book_code,
            note_uuid: page.note_uuid.clone(),
            page_number: page.page_number,
            user_id: user_id.into(),
            language: language.into(),
            label: result.label.clone(),
            words,
        }
    }
}
