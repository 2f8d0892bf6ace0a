//! Line-oriented scanner for quiz source text.
//!
//! The format is the plain-text export used by Russian trivia databases:
//!
//! ```text
//! Вопрос 1:
//! Body line one
//! body line two
//!
//! Ответ:
//! Answer text
//!
//! Комментарий:
//! Ignored.
//! ```
//!
//! A line containing the question or answer marker opens a block; the
//! block's body runs to the next blank line and is joined with single
//! spaces. Everything outside blocks is ignored.

use tracing::warn;

use crate::catalog::{Catalog, QuizEntry};
use crate::error::{BlockKind, CatalogError};
use crate::text::normalize_whitespace;

/// Marker word that opens a question block.
pub const QUESTION_MARKER: &str = "Вопрос";

/// Marker word that opens an answer block.
pub const ANSWER_MARKER: &str = "Ответ";

/// Parses decoded quiz source text into a catalog.
///
/// Each answer pairs with the most recent question. Pairs whose question or
/// answer body is empty are skipped.
///
/// # Errors
///
/// Returns `CatalogError::UnterminatedBlock` if input ends inside a block,
/// `CatalogError::AnswerWithoutQuestion` if an answer comes first, and
/// `CatalogError::Empty` if no pair was found.
pub fn parse_catalog(text: &str) -> Result<Catalog, CatalogError> {
    let mut lines = text.lines().enumerate();
    let mut question: Option<String> = None;
    let mut entries = Vec::new();

    while let Some((index, line)) = lines.next() {
        let line_number = index + 1;
        if line.contains(QUESTION_MARKER) {
            question = Some(read_block(&mut lines, BlockKind::Question, line_number)?);
        } else if line.contains(ANSWER_MARKER) {
            let answer = read_block(&mut lines, BlockKind::Answer, line_number)?;
            let Some(question) = question.as_deref() else {
                return Err(CatalogError::AnswerWithoutQuestion { line: line_number });
            };
            if question.is_empty() || answer.is_empty() {
                warn!(line = line_number, "skipping quiz entry with an empty body");
                continue;
            }
            entries.push(QuizEntry::new(question, answer));
        }
    }

    Catalog::from_entries(entries)
}

/// Consumes body lines up to the closing blank line.
fn read_block<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    kind: BlockKind,
    marker_line: usize,
) -> Result<String, CatalogError> {
    let mut parts: Vec<&str> = Vec::new();
    loop {
        let Some((_, line)) = lines.next() else {
            return Err(CatalogError::UnterminatedBlock {
                kind,
                line: marker_line,
            });
        };
        if line.trim().is_empty() {
            return Ok(normalize_whitespace(&parts.join(" ")));
        }
        parts.push(line);
    }
}
