use std::str::FromStr;

use appraisal_core::AppError;
use serde::{Deserialize, Serialize};

/// Closed set of business object categories that can be audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityRoot {
    /// Faculty account.
    User,
    /// Teaching class record.
    Class,
    /// Login tracking entry.
    LoginTracking,
    /// Student proctoring record.
    Proctoring,
    /// Course feedback record.
    Feedback,
    /// Research output document.
    Research,
    /// Workshop attendance record.
    Workshop,
    /// Miscellaneous activities document.
    Others,
    /// Published article.
    Article,
    /// Additional responsibility.
    Responsibility,
    /// Special contribution.
    Contribution,
    /// Award or recognition.
    Award,
}

impl EntityRoot {
    /// Returns a stable storage value for this root kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Class => "Class",
            Self::LoginTracking => "LoginTracking",
            Self::Proctoring => "Proctoring",
            Self::Feedback => "Feedback",
            Self::Research => "Research",
            Self::Workshop => "Workshop",
            Self::Others => "Others",
            Self::Article => "Article",
            Self::Responsibility => "Responsibility",
            Self::Contribution => "Contribution",
            Self::Award => "Award",
        }
    }

    /// Returns all known root kinds.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[EntityRoot] = &[
            EntityRoot::User,
            EntityRoot::Class,
            EntityRoot::LoginTracking,
            EntityRoot::Proctoring,
            EntityRoot::Feedback,
            EntityRoot::Research,
            EntityRoot::Workshop,
            EntityRoot::Others,
            EntityRoot::Article,
            EntityRoot::Responsibility,
            EntityRoot::Contribution,
            EntityRoot::Award,
        ];

        ALL
    }
}

impl FromStr for EntityRoot {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|root| root.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown entity kind '{value}'")))
    }
}

/// Entity kind of an audited object.
///
/// Items embedded in a list-valued parent document use a dotted form such as
/// `Others.Activity` or `Research.SciArticle`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityKind {
    root: EntityRoot,
    item: Option<String>,
}

impl EntityKind {
    /// Creates a top-level entity kind.
    #[must_use]
    pub fn root(root: EntityRoot) -> Self {
        Self { root, item: None }
    }

    /// Creates a kind for an item embedded in a `root` document.
    pub fn embedded(root: EntityRoot, item: impl Into<String>) -> Result<Self, AppError> {
        let item = item.into();
        validate_item_segment(item.as_str())?;
        Ok(Self {
            root,
            item: Some(item),
        })
    }

    /// Returns the root kind.
    #[must_use]
    pub fn root_kind(&self) -> EntityRoot {
        self.root
    }

    /// Returns the embedded item segment, if any.
    #[must_use]
    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    /// Returns the stable storage value (`Root` or `Root.Item`).
    #[must_use]
    pub fn as_storage(&self) -> String {
        match &self.item {
            Some(item) => format!("{}.{item}", self.root.as_str()),
            None => self.root.as_str().to_owned(),
        }
    }
}

impl From<EntityRoot> for EntityKind {
    fn from(value: EntityRoot) -> Self {
        Self::root(value)
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('.') {
            Some((root, item)) => Self::embedded(root.parse()?, item),
            None => Ok(Self::root(value.parse()?)),
        }
    }
}

impl TryFrom<String> for EntityKind {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityKind> for String {
    fn from(value: EntityKind) -> Self {
        value.as_storage()
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.root.as_str())?;
        if let Some(item) = &self.item {
            write!(formatter, ".{item}")?;
        }
        Ok(())
    }
}

fn validate_item_segment(item: &str) -> Result<(), AppError> {
    let starts_with_letter = item
        .chars()
        .next()
        .is_some_and(|character| character.is_ascii_alphabetic());
    let is_identifier = item
        .chars()
        .all(|character| character.is_ascii_alphanumeric() || character == '_');

    if !starts_with_letter || !is_identifier {
        return Err(AppError::Validation(format!(
            "invalid embedded entity kind segment '{item}'"
        )));
    }

    Ok(())
}

/// Kind of change recorded by an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// A new entity was created.
    Create,
    /// An existing entity was modified.
    Update,
    /// An entity was removed or reset.
    Delete,
}

impl OperationKind {
    /// Returns a stable storage value for this operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for OperationKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown operation '{value}', expected CREATE, UPDATE or DELETE"
            ))),
        }
    }
}
