use std::str::FromStr;

use appraisal_core::AppError;
use serde::{Deserialize, Serialize};

/// Appraisal parameters stored on a faculty account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreField {
    /// Courses average pass percentage.
    CourseAveragePass,
    /// Course feedback.
    CourseFeedback,
    /// Proctored students average pass percentage.
    Proctoring,
    /// SCI indexed papers.
    SciPapers,
    /// Scopus / Web of Science papers.
    WosPapers,
    /// Research proposals submitted or funded.
    Proposals,
    /// Other research work.
    ResearchOthers,
    /// Workshops, FDPs and STTPs attended.
    Workshops,
    /// Outreach activities.
    Outreach,
    /// Additional departmental or college responsibilities.
    AdditionalResponsibilities,
    /// Special contribution.
    SpecialContribution,
}

impl ScoreField {
    /// Returns the document field that stores this score.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CourseAveragePass => "couAvgPerMarks",
            Self::CourseFeedback => "CoufeedMarks",
            Self::Proctoring => "ProctoringMarks",
            Self::SciPapers => "SciMarks",
            Self::WosPapers => "WosMarks",
            Self::Proposals => "ProposalMarks",
            Self::ResearchOthers => "ResearchSelfAsses",
            Self::Workshops => "WorkSelfAsses",
            Self::Outreach => "OutreachSelfAsses",
            Self::AdditionalResponsibilities => "AddSelfAsses",
            Self::SpecialContribution => "SpeacialSelfAsses",
        }
    }

    /// Human label shown on the appraisal form.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::CourseAveragePass => "Courses Average Pass %",
            Self::CourseFeedback => "Course Feedback",
            Self::Proctoring => "Proctoring Students Average Pass %",
            Self::SciPapers => "Research - SCI papers",
            Self::WosPapers => "Research - Scopus/WoS Papers",
            Self::Proposals => "Research – Proposals Submitted/funded",
            Self::ResearchOthers => "Research - Others",
            Self::Workshops => "Workshops, FDPs, STTP attended",
            Self::Outreach => "Outreach Activities",
            Self::AdditionalResponsibilities => {
                "Additional responsibilities in the Department / College"
            }
            Self::SpecialContribution => "Special Contribution",
        }
    }

    /// Highest score the parameter accepts.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        match self {
            Self::SciPapers | Self::WosPapers => 60,
            Self::CourseAveragePass
            | Self::CourseFeedback
            | Self::Proctoring
            | Self::Workshops
            | Self::AdditionalResponsibilities => 20,
            Self::Proposals
            | Self::ResearchOthers
            | Self::Outreach
            | Self::SpecialContribution => 10,
        }
    }

    /// Clamps a requested score into `0..=max_score`.
    #[must_use]
    pub fn bounded(&self, value: i64) -> u32 {
        let max = self.max_score();
        u32::try_from(value.max(0)).map_or(max, |value| value.min(max))
    }

    /// Returns all score parameters.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ScoreField] = &[
            ScoreField::CourseAveragePass,
            ScoreField::CourseFeedback,
            ScoreField::Proctoring,
            ScoreField::SciPapers,
            ScoreField::WosPapers,
            ScoreField::Proposals,
            ScoreField::ResearchOthers,
            ScoreField::Workshops,
            ScoreField::Outreach,
            ScoreField::AdditionalResponsibilities,
            ScoreField::SpecialContribution,
        ];

        ALL
    }
}

impl FromStr for ScoreField {
    type Err = AppError;

    /// Accepts either the stored field name or the form label.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|field| field.as_str() == value || field.label() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown score field '{value}'")))
    }
}
