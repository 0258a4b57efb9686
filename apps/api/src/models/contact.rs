use serde::{Serialize, Serializer};

/// Maximum number of skills kept on a record, whichever path produced it.
pub const MAX_SKILLS: usize = 20;

/// Canonical contact record returned for every parsed resume.
///
/// Absent fields serialize as empty strings (and `skills` as an empty list) so
/// consumers never see `null`. Field names are a stable contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    #[serde(serialize_with = "empty_when_absent")]
    pub full_name: Option<String>,
    #[serde(serialize_with = "empty_when_absent")]
    pub email: Option<String>,
    #[serde(serialize_with = "empty_when_absent")]
    pub phone: Option<String>,
    #[serde(serialize_with = "empty_when_absent")]
    pub address: Option<String>,
    #[serde(serialize_with = "empty_when_absent")]
    pub linkedin: Option<String>,
    pub skills: Vec<String>,
}

impl ContactRecord {
    /// Number of populated fields; `skills` counts once when non-empty.
    pub fn populated_fields(&self) -> usize {
        [
            &self.full_name,
            &self.email,
            &self.phone,
            &self.address,
            &self.linkedin,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
            + usize::from(!self.skills.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }
}

fn empty_when_absent<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

/// Case-insensitive dedup preserving first-seen spelling and order, capped at `MAX_SKILLS`.
pub fn dedup_skills<I>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .filter(|s| seen.insert(s.to_lowercase()))
        .take(MAX_SKILLS)
        .collect()
}
