//! # Score Table
//!
//! Per-question point values. Each [`ScoreRule`] selects questions by an inclusive range or an
//! explicit list and carries `(correct, partial, max)` points. Rules are checked in order and
//! the first rule that selects a question decides its award.

use std::collections::BTreeSet;

use util::exam_definition::{QuestionSelectorSpec, ScoreRuleSpec};

use crate::error::MarkerError;
use crate::types::{Outcome, QuestionNumber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSelector {
    /// Inclusive.
    Range(QuestionNumber, QuestionNumber),
    List(BTreeSet<QuestionNumber>),
}

impl QuestionSelector {
    pub fn selects(&self, question: QuestionNumber) -> bool {
        match self {
            QuestionSelector::Range(first, last) => (*first..=*last).contains(&question),
            QuestionSelector::List(questions) => questions.contains(&question),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRule {
    pub selector: QuestionSelector,
    pub correct: u32,
    pub partial: u32,
    pub max: u32,
}

impl ScoreRule {
    /// Rule for questions `first..=last`, no partial credit.
    pub fn range(first: QuestionNumber, last: QuestionNumber, correct: u32) -> Self {
        Self {
            selector: QuestionSelector::Range(first, last),
            correct,
            partial: 0,
            max: correct,
        }
    }

    pub fn single(question: QuestionNumber, correct: u32) -> Self {
        Self::range(question, question, correct)
    }

    pub fn list<I>(questions: I, correct: u32) -> Self
    where
        I: IntoIterator<Item = QuestionNumber>,
    {
        Self {
            selector: QuestionSelector::List(questions.into_iter().collect()),
            correct,
            partial: 0,
            max: correct,
        }
    }

    pub fn with_partial(mut self, partial: u32) -> Self {
        self.partial = partial;
        self
    }

    pub fn with_max(mut self, max: u32) -> Self {
        self.max = max;
        self
    }

    /// Points earned for `outcome` under this rule.
    pub fn award(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Correct => self.correct,
            Outcome::Partial => self.partial,
            Outcome::Incorrect | Outcome::NotSubmitted => 0,
        }
    }

    fn validate(&self) -> Result<(), MarkerError> {
        match &self.selector {
            QuestionSelector::Range(first, last) if *first == 0 || first > last => {
                return Err(MarkerError::InvalidScoreRule(format!(
                    "range [{first}, {last}] is empty or starts at 0"
                )));
            }
            QuestionSelector::List(questions) if questions.is_empty() || questions.contains(&0) => {
                return Err(MarkerError::InvalidScoreRule(
                    "question list is empty or contains 0".to_string(),
                ));
            }
            _ => {}
        }
        if self.partial > self.correct || self.correct > self.max {
            return Err(MarkerError::InvalidScoreRule(format!(
                "points must satisfy partial <= correct <= max (got {}/{}/{})",
                self.partial, self.correct, self.max
            )));
        }
        Ok(())
    }
}

impl TryFrom<&ScoreRuleSpec> for ScoreRule {
    type Error = MarkerError;

    fn try_from(spec: &ScoreRuleSpec) -> Result<Self, Self::Error> {
        let rule = match &spec.questions {
            QuestionSelectorSpec::Range([first, last]) => ScoreRule::range(*first, *last, spec.correct),
            QuestionSelectorSpec::List(questions) => {
                ScoreRule::list(questions.iter().copied(), spec.correct)
            }
        };
        let rule = rule
            .with_partial(spec.partial)
            .with_max(spec.max.unwrap_or(spec.correct));
        rule.validate()?;
        Ok(rule)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreTable {
    rules: Vec<ScoreRule>,
}

impl ScoreTable {
    /// Validates every rule.
    pub fn new(rules: Vec<ScoreRule>) -> Result<Self, MarkerError> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ScoreRule] {
        &self.rules
    }

    /// First rule selecting `question`.
    pub fn rule_for(&self, question: QuestionNumber) -> Result<&ScoreRule, MarkerError> {
        self.rules
            .iter()
            .find(|rule| rule.selector.selects(question))
            .ok_or(MarkerError::MissingScoreRule(question))
    }

    pub fn award(&self, question: QuestionNumber, outcome: Outcome) -> Result<u32, MarkerError> {
        Ok(self.rule_for(question)?.award(outcome))
    }

    pub fn max_points(&self, question: QuestionNumber) -> Result<u32, MarkerError> {
        Ok(self.rule_for(question)?.max)
    }

    /// Fails on the first question no rule selects.
    pub fn ensure_covers<I>(&self, questions: I) -> Result<(), MarkerError>
    where
        I: IntoIterator<Item = QuestionNumber>,
    {
        for question in questions {
            self.rule_for(question)?;
        }
        Ok(())
    }
}

impl TryFrom<&[ScoreRuleSpec]> for ScoreTable {
    type Error = MarkerError;

    fn try_from(specs: &[ScoreRuleSpec]) -> Result<Self, Self::Error> {
        let rules = specs
            .iter()
            .map(ScoreRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m31_table() -> ScoreTable {
        ScoreTable::new(vec![
            ScoreRule::range(1, 9, 2),
            ScoreRule::list([10, 14, 15], 10).with_partial(5),
            ScoreRule::range(11, 13, 4).with_partial(2),
            ScoreRule::single(16, 20).with_partial(10),
        ])
        .unwrap()
    }

    #[test]
    fn test_award_by_outcome() {
        let table = m31_table();
        assert_eq!(table.award(12, Outcome::Correct).unwrap(), 4);
        assert_eq!(table.award(12, Outcome::Partial).unwrap(), 2);
        assert_eq!(table.award(12, Outcome::Incorrect).unwrap(), 0);
        assert_eq!(table.award(12, Outcome::NotSubmitted).unwrap(), 0);
        assert_eq!(table.award(3, Outcome::Partial).unwrap(), 0);
    }

    #[test]
    fn test_list_rule_selects_scattered_questions() {
        let table = m31_table();
        assert_eq!(table.award(14, Outcome::Correct).unwrap(), 10);
        assert_eq!(table.max_points(10).unwrap(), 10);
        assert_eq!(table.max_points(16).unwrap(), 20);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let table = ScoreTable::new(vec![ScoreRule::single(5, 8), ScoreRule::range(1, 10, 1)]).unwrap();
        assert_eq!(table.award(5, Outcome::Correct).unwrap(), 8);
        assert_eq!(table.award(6, Outcome::Correct).unwrap(), 1);
    }

    #[test]
    fn test_uncovered_question() {
        let table = m31_table();
        assert_eq!(table.rule_for(17), Err(MarkerError::MissingScoreRule(17)));
        assert_eq!(
            table.ensure_covers([1, 2, 17, 18]),
            Err(MarkerError::MissingScoreRule(17))
        );
        assert!(table.ensure_covers(1..=16).is_ok());
    }

    #[test]
    fn test_invalid_rules_rejected() {
        assert!(ScoreTable::new(vec![ScoreRule::single(1, 4).with_partial(5)]).is_err());
        assert!(ScoreTable::new(vec![ScoreRule::single(1, 4).with_max(3)]).is_err());
        assert!(ScoreTable::new(vec![ScoreRule::range(5, 2, 1)]).is_err());
        assert!(ScoreTable::new(vec![ScoreRule::range(0, 2, 1)]).is_err());
        assert!(ScoreTable::new(vec![ScoreRule::list(Vec::new(), 1)]).is_err());
    }

    #[test]
    fn test_from_definition_rules() {
        let specs = vec![
            ScoreRuleSpec {
                questions: QuestionSelectorSpec::Range([1, 5]),
                correct: 4,
                partial: 2,
                max: None,
            },
            ScoreRuleSpec {
                questions: QuestionSelectorSpec::List(vec![6, 8, 9]),
                correct: 6,
                partial: 0,
                max: Some(8),
            },
        ];
        let table = ScoreTable::try_from(specs.as_slice()).unwrap();
        assert_eq!(table.award(3, Outcome::Partial).unwrap(), 2);
        assert_eq!(table.max_points(3).unwrap(), 4);
        assert_eq!(table.max_points(8).unwrap(), 8);
        assert!(table.rule_for(7).is_err());

        let bad = vec![ScoreRuleSpec {
            questions: QuestionSelectorSpec::Range([1, 1]),
            correct: 1,
            partial: 3,
            max: None,
        }];
        assert!(matches!(
            ScoreTable::try_from(bad.as_slice()),
            Err(MarkerError::InvalidScoreRule(_))
        ));
    }
}
