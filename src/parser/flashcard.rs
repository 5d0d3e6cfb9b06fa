use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::card::{Flashcard, Section};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("flashcard is missing the '{0}' section")]
    MissingSection(Section),
}

#[derive(Default)]
struct MarkerLines {
    topic: Option<usize>,
    question: Option<usize>,
    answer: Option<usize>,
}

impl MarkerLines {
    // Later matches overwrite earlier ones; a line only ever counts for one marker.
    fn scan(lines: &[&str]) -> Self {
        let mut markers = MarkerLines::default();
        for (idx, line) in lines.iter().enumerate() {
            if line.contains(Section::Topic.marker()) {
                markers.topic = Some(idx);
            } else if line.contains(Section::Question.marker()) {
                markers.question = Some(idx);
            } else if line.contains(Section::Answer.marker()) {
                markers.answer = Some(idx);
            }
        }
        markers
    }
}

pub fn parse(contents: &str) -> Result<Flashcard, ParseError> {
    let lines: Vec<&str> = contents.lines().collect();
    let markers = MarkerLines::scan(&lines);

    let topic_idx = markers
        .topic
        .ok_or(ParseError::MissingSection(Section::Topic))?;
    let question_idx = markers
        .question
        .ok_or(ParseError::MissingSection(Section::Question))?;
    let answer_idx = markers
        .answer
        .ok_or(ParseError::MissingSection(Section::Answer))?;

    let topic = topic_value(lines[topic_idx]);
    let question = if question_idx < answer_idx {
        join_block(&lines[question_idx + 1..answer_idx])
    } else {
        String::new()
    };
    let answer = join_block(&lines[answer_idx + 1..]);

    Ok(Flashcard {
        topic,
        question,
        answer,
    })
}

fn topic_value(line: &str) -> String {
    let line = line.trim();
    if let Some((_, rest)) = line.split_once(": ") {
        return rest.trim().to_string();
    }
    line.split_once(Section::Topic.marker())
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

fn join_block(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

/// Reads and parses a flashcard file. Unreadable or malformed files come back
/// as [`Flashcard::sentinel`] so a review session can keep going.
pub fn load_flashcard(path: &Path) -> Flashcard {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unable to read flashcard");
            return Flashcard::sentinel();
        }
    };

    match parse(&contents) {
        Ok(card) => card,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "flashcard must contain 'Topic:', 'Question:' and 'Answer:' headers"
            );
            Flashcard::sentinel()
        }
    }
}

pub fn format_flashcard(card: &Flashcard) -> String {
    format!(
        "{} {}\n\n{}\n{}\n\n{}\n{}\n",
        Section::Topic.marker(),
        card.topic.trim(),
        Section::Question.marker(),
        card.question.trim(),
        Section::Answer.marker(),
        card.answer.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn parses_basic_card() {
        let card = parse("Topic: Math\n\nQuestion:\nWhat is 2+2?\n\nAnswer:\n4\n").unwrap();
        assert_eq!(card, Flashcard::new("Math", "What is 2+2?", "4"));
    }

    #[test]
    fn keeps_blank_lines_inside_sections() {
        let contents = "Topic: Rust\nQuestion:\nline one\n\nline two\nAnswer:\n\nfirst\n\n\nsecond\n\n";
        let card = parse(contents).unwrap();
        assert_eq!(card.question, "line one\n\nline two");
        assert_eq!(card.answer, "first\n\n\nsecond");
    }

    #[test]
    fn missing_marker_is_reported() {
        assert_eq!(
            parse("Question:\nq\nAnswer:\na"),
            Err(ParseError::MissingSection(Section::Topic))
        );
        assert_eq!(
            parse("Topic: t\nAnswer:\na"),
            Err(ParseError::MissingSection(Section::Question))
        );
        assert_eq!(
            parse("Topic: t\nQuestion:\nq"),
            Err(ParseError::MissingSection(Section::Answer))
        );
    }

    #[test]
    fn last_marker_occurrence_wins() {
        let contents = "Topic: old\nTopic: new\nQuestion:\nfirst\nQuestion:\nsecond\nAnswer:\na";
        let card = parse(contents).unwrap();
        assert_eq!(card.topic, "new");
        assert_eq!(card.question, "second");
    }

    #[test]
    fn empty_sections_are_accepted() {
        let card = parse("Topic: t\nQuestion:\nAnswer:\n").unwrap();
        assert_eq!(card.question, "");
        assert_eq!(card.answer, "");
    }

    #[test]
    fn answer_before_question_leaves_question_empty() {
        let card = parse("Topic: t\nAnswer:\na\nQuestion:\nq").unwrap();
        assert_eq!(card.question, "");
        assert_eq!(card.answer, "a\nQuestion:\nq");
    }

    #[test]
    fn topic_without_space_after_colon() {
        let card = parse("Topic:Biology\nQuestion:\nq\nAnswer:\na").unwrap();
        assert_eq!(card.topic, "Biology");
    }

    #[test]
    fn topic_keeps_later_colons() {
        let card = parse("Topic: Ratios: part 2\nQuestion:\nq\nAnswer:\na").unwrap();
        assert_eq!(card.topic, "Ratios: part 2");
    }

    #[test]
    fn load_flashcard_falls_back_to_sentinel() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.txt");
        fs::write(&broken, "Question:\nno topic here\nAnswer:\nnope\n").unwrap();
        assert!(load_flashcard(&broken).is_sentinel());

        let missing = dir.path().join("missing.txt");
        assert!(load_flashcard(&missing).is_sentinel());
    }

    #[test]
    fn load_flashcard_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample_flashcard.txt");
        fs::write(&path, "Topic: Math\n\nQuestion:\nWhat is 2+2?\n\nAnswer:\n4\n").unwrap();
        let card = load_flashcard(&path);
        assert_eq!(card.topic, "Math");
        assert_eq!(card.question, "What is 2+2?");
        assert_eq!(card.answer, "4");
    }

    fn field() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 ?.,+\n]{0,40}".prop_map(|s| s.trim().to_string())
    }

    proptest! {
        #[test]
        fn created_cards_round_trip(
            topic in "[A-Za-z0-9][A-Za-z0-9 ]{0,20}",
            question in field(),
            answer in field(),
        ) {
            let card = Flashcard::new(topic.trim(), question, answer);
            let parsed = parse(&format_flashcard(&card)).unwrap();
            prop_assert_eq!(parsed, card);
        }

        #[test]
        fn parse_never_panics(contents in "\\PC*") {
            let _ = parse(&contents);
        }
    }
}
