use std::fmt;

pub const SENTINEL_TOPIC: &str = "Error loading topic.";
pub const SENTINEL_QUESTION: &str = "Error loading question.";
pub const SENTINEL_ANSWER: &str = "Error loading answer.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flashcard {
    pub topic: String,
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(
        topic: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Flashcard {
            topic: topic.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Placeholder shown when a resource cannot be read or is missing a section.
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_TOPIC, SENTINEL_QUESTION, SENTINEL_ANSWER)
    }

    pub fn is_sentinel(&self) -> bool {
        self == &Self::sentinel()
    }

    pub fn side(&self, side: Side) -> &str {
        match side {
            Side::Question => &self.question,
            Side::Answer => &self.answer,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Question,
    Answer,
}

impl Side {
    pub fn flipped(self) -> Self {
        match self {
            Side::Question => Side::Answer,
            Side::Answer => Side::Question,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Question => "Question",
            Side::Answer => "Answer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Topic,
    Question,
    Answer,
}

impl Section {
    pub fn marker(self) -> &'static str {
        match self {
            Section::Topic => "Topic:",
            Section::Question => "Question:",
            Section::Answer => "Answer:",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Right/wrong state of the card on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mark {
    #[default]
    Unmarked,
    Correct,
    Incorrect,
}

impl Mark {
    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Mark::Correct
        } else {
            Mark::Incorrect
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mark::Unmarked => "Unmarked",
            Mark::Correct => "Right",
            Mark::Incorrect => "Wrong",
        }
    }
}
