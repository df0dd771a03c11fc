#[cfg(test)]
#[path = "student_test.rs"]
mod tests;

use std::collections::BTreeMap;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerDetails {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub growth_rate: String,
    #[serde(default)]
    pub education: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerMatch {
    pub title: String,
    #[serde(default)]
    pub match_percentage: f64,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub details: CareerDetails,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerGoal {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Fields left as `None` are never sent, so an update only touches what the
/// user provided.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_goal: Option<CareerGoal>,
}

impl StudentProfile {
    pub fn is_empty(&self) -> bool {
        return self.name.is_none()
            && self.email.is_none()
            && self.education.is_none()
            && self.career_goal.is_none();
    }
}

/// The backend's view of a student. Known fields are typed, everything else
/// is kept in `extra` so a stored record serializes back to exactly what the
/// backend returned. Collections are optional so an absent key and an empty
/// one stay distinct on the way back out.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_gaps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathway: Option<BTreeMap<String, Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_matches: Option<Vec<CareerMatch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<BTreeMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<StudentProfile>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

static NO_PATHWAY: BTreeMap<String, Resource> = BTreeMap::new();

impl StudentRecord {
    pub fn skills(&self) -> &[String] {
        return self.skills.as_deref().unwrap_or_default();
    }

    pub fn skill_gaps(&self) -> &[String] {
        return self.skill_gaps.as_deref().unwrap_or_default();
    }

    pub fn career_matches(&self) -> &[CareerMatch] {
        return self.career_matches.as_deref().unwrap_or_default();
    }

    pub fn pathway(&self) -> &BTreeMap<String, Resource> {
        return self.pathway.as_ref().unwrap_or(&NO_PATHWAY);
    }

    pub fn is_completed(&self, skill: &str) -> bool {
        return self
            .progress
            .as_ref()
            .and_then(|progress| return progress.get(skill).copied())
            .unwrap_or(false);
    }

    /// Returns `(completed, total)` over the skills in the learning pathway.
    pub fn progress_summary(&self) -> (usize, usize) {
        let pathway = self.pathway();
        let completed = pathway
            .keys()
            .filter(|skill| return self.is_completed(skill))
            .count();

        return (completed, pathway.len());
    }

    pub fn best_match(&self) -> Option<&CareerMatch> {
        return self.career_matches().iter().max_by(|a, b| {
            return a.match_percentage.total_cmp(&b.match_percentage);
        });
    }
}

/// Success body of `POST /analyze_resume`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedResume {
    pub student_id: String,
    #[serde(flatten)]
    pub record: StudentRecord,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub career_paths: BTreeMap<String, CareerDetails>,
}
