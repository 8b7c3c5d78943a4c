//! # Exam Layout
//!
//! Declares how positions in a submission map to question numbers.
//!
//! A layout is an ordered list of segments `(first_question, count)`. Raw indices are
//! consumed segment by segment, so an exam whose paper skips question 10 (graded by hand)
//! is declared as `[(1, 9), (11, 3)]`: raw index 8 is Q9 and raw index 9 is Q11.
//! The classification loop only ever renumbers through this table.

use crate::error::MarkerError;
use crate::types::QuestionNumber;

/// Upper bound on the number of answer slots in one layout.
pub const MAX_LAYOUT_QUESTIONS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub first_question: QuestionNumber,
    pub count: u32,
}

impl Segment {
    /// Last question of the segment. Validated segments never overflow.
    pub fn last(&self) -> QuestionNumber {
        self.first_question.saturating_add(self.count.saturating_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamLayout {
    segments: Vec<Segment>,
    capacity: usize,
}

impl ExamLayout {
    /// Questions `1..=count` in submission order.
    pub fn sequential(count: u32) -> Result<Self, MarkerError> {
        Self::from_segments([(1, count)])
    }

    /// Builds a layout from `(first_question, count)` pairs.
    ///
    /// Segments must be non-empty, start at question 1 or later and must not share
    /// question numbers. At most [`MAX_LAYOUT_QUESTIONS`] slots are accepted.
    pub fn from_segments<I>(segments: I) -> Result<Self, MarkerError>
    where
        I: IntoIterator<Item = (QuestionNumber, u32)>,
    {
        let mut out: Vec<Segment> = Vec::new();
        let mut capacity = 0usize;

        for (first_question, count) in segments {
            if first_question == 0 {
                return Err(MarkerError::InvalidLayout(
                    "question numbers start at 1".to_string(),
                ));
            }
            if count == 0 {
                return Err(MarkerError::InvalidLayout(format!(
                    "segment starting at question {first_question} is empty"
                )));
            }
            let last = first_question.checked_add(count - 1).ok_or_else(|| {
                MarkerError::InvalidLayout(format!(
                    "segment starting at question {first_question} overflows"
                ))
            })?;
            capacity = capacity.saturating_add(count as usize);
            if capacity > MAX_LAYOUT_QUESTIONS {
                return Err(MarkerError::InvalidLayout(format!(
                    "layout has more than {MAX_LAYOUT_QUESTIONS} questions"
                )));
            }
            if let Some(other) = out
                .iter()
                .find(|s| s.first_question <= last && first_question <= s.last())
            {
                let shared = first_question.max(other.first_question);
                return Err(MarkerError::InvalidLayout(format!(
                    "question {shared} appears in more than one segment"
                )));
            }
            out.push(Segment {
                first_question,
                count,
            });
        }

        if out.is_empty() {
            return Err(MarkerError::InvalidLayout("layout has no segments".to_string()));
        }

        Ok(Self {
            capacity,
            segments: out,
        })
    }

    /// Number of raw answer slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Question number of the answer at `raw_index` (0-based position in the submission).
    pub fn renumber(&self, raw_index: usize) -> Result<QuestionNumber, MarkerError> {
        let mut offset = raw_index;
        for segment in &self.segments {
            let count = segment.count as usize;
            if offset < count {
                // `offset < count <= u32::MAX`, so the cast is lossless.
                return Ok(segment.first_question + offset as u32);
            }
            offset -= count;
        }
        Err(MarkerError::IndexOutOfLayout {
            index: raw_index,
            capacity: self.capacity,
        })
    }

    /// Question numbers in submission order.
    pub fn questions(&self) -> impl Iterator<Item = QuestionNumber> + '_ {
        self.segments
            .iter()
            .flat_map(|s| s.first_question..=s.last())
    }

    pub fn contains(&self, question: QuestionNumber) -> bool {
        self.segments
            .iter()
            .any(|s| question >= s.first_question && question - s.first_question < s.count)
    }
}
