//! Building an [`ExamMarker`] from a loaded [`ExamDefinition`].

use tracing::{debug, info};
use util::exam_definition::{CheckSpec, ExamDefinition};

use crate::ExamMarker;
use crate::answer_key::{AnswerKey, Expected};
use crate::error::MarkerError;
use crate::feedback::manual_feedback::ManualFeedback;
use crate::layout::ExamLayout;
use crate::score_table::ScoreTable;
use crate::traits::evaluator::EvaluatorFactory;

impl ExamMarker {
    /// Builds the answer key, layout and score table of `definition`.
    ///
    /// Executable entries are instantiated through `factory`, so an unavailable fixture or a
    /// failing reference query is reported here, before any submission is graded. Instructor
    /// feedback from the definition is used for answers that are not fully correct.
    pub async fn from_definition(
        definition: &ExamDefinition,
        factory: &dyn EvaluatorFactory,
    ) -> Result<Self, MarkerError> {
        let limits = definition.limits.clone().sanitize();
        let mut key = AnswerKey::new();

        for (&question, entry) in &definition.questions {
            let expected = match &entry.check {
                CheckSpec::Exact {
                    answer,
                    case_sensitive: false,
                } => Expected::exact(answer.as_str()),
                CheckSpec::Exact {
                    answer,
                    case_sensitive: true,
                } => Expected::exact_case_sensitive(answer.as_str()),
                CheckSpec::MultiSelect { answers } => Expected::multi_select(answers),
                CheckSpec::OneOf { answers } => Expected::one_of(answers),
                CheckSpec::Sql(_) | CheckSpec::Command(_) => {
                    let evaluator = factory.build(question, &entry.check, &limits).await?;
                    debug!(question, evaluator = %evaluator.describe(), "evaluator ready");
                    Expected::executable(evaluator, limits.timeout())
                }
            };
            key.insert(question, expected)?;
            if let Some(feedback) = &entry.feedback {
                key.set_feedback(question, feedback.as_str())?;
            }
        }

        let mut builder = ExamMarker::builder(definition.name.as_str())
            .key(key)
            .scores(ScoreTable::try_from(definition.scoring.as_slice())?)
            .manual_questions(definition.manual_questions.iter().copied())
            .feedback(Box::new(ManualFeedback));

        if let Some(segments) = &definition.layout {
            builder = builder.layout(ExamLayout::from_segments(
                segments.iter().map(|s| (s.first_question, s.count)),
            )?);
        }

        let marker = builder.build()?;
        info!(
            exam = %marker.name(),
            questions = definition.questions.len(),
            slots = marker.layout().capacity(),
            manual = marker.manual_questions().len(),
            "exam definition loaded"
        );
        Ok(marker)
    }
}
