use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status value marking a posting as open for applications.
pub const ACTIVE_STATUS: &str = "Active";

const TEASER_CHARS: usize = 120;

/// Spreadsheet row number identifying a posting (`SL_No`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the external job board. Column names follow the sheet headers,
/// and cells may arrive either as strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobPosting {
    #[serde(rename = "SL_No", default, deserialize_with = "deserialize_id")]
    pub id: JobId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub job_category: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub industry: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub country: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub candidates_origin: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub gender: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub experience: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub salary: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub shift: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub job_type: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub requirements: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub vacancies: u32,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub status: String,
}

impl JobPosting {
    /// Only exact `"Active"` counts; the board applies no other normalization.
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// Short description shown in the application modal header.
    pub fn teaser(&self) -> String {
        let mut chars = self.description.chars();
        let head: String = chars.by_ref().take(TEASER_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<JobId, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => raw.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    };
    Ok(JobId(id))
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(raw)) => Ok(raw),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(Value::Bool(flag)) => Ok(flag.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => Ok(String::new()),
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
            .unwrap_or(0),
        Some(Value::String(raw)) => raw.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sheet_row_with_mixed_cell_types() {
        let row = json!({
            "SL_No": 7,
            "Date": "2025-10-01T00:00:00.000Z",
            "JobCategory": "Engineering",
            "Title": "Backend Engineer",
            "Description": "Build the relay.",
            "Industry": "Software",
            "Country": "Bangladesh",
            "Experience": 3,
            "Salary": "Negotiable",
            "Shift": "Day",
            "JobType": "Full-time",
            "Vacancies": "2",
            "Status": "Active"
        });

        let posting: JobPosting = serde_json::from_value(row).expect("row parses");
        assert_eq!(posting.id, JobId::new("7"));
        assert_eq!(posting.experience, "3");
        assert_eq!(posting.vacancies, 2);
        assert_eq!(posting.gender, "");
        assert!(posting.is_active());
    }

    #[test]
    fn blank_and_odd_rows_still_parse() {
        let rows: Vec<JobPosting> = serde_json::from_value(json!([
            { "SL_No": null, "Title": "", "Status": "" },
            { "Title": ["merged"], "Country": { "v": 1 }, "Status": "" },
            {}
        ]))
        .expect("rows parse");

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.id == JobId::default()));
        assert_eq!(rows[1].title, "");
        assert_eq!(rows[1].country, "");
        assert!(rows.iter().all(|row| !row.is_active()));
    }

    #[test]
    fn status_match_is_exact() {
        let mut posting: JobPosting =
            serde_json::from_value(json!({ "SL_No": "1", "Status": "active" })).expect("parses");
        assert!(!posting.is_active());
        posting.status = "Active ".to_string();
        assert!(!posting.is_active());
        posting.status = ACTIVE_STATUS.to_string();
        assert!(posting.is_active());
    }

    #[test]
    fn teaser_truncates_long_descriptions() {
        let posting: JobPosting = serde_json::from_value(json!({
            "SL_No": 1,
            "Description": "x".repeat(150),
        }))
        .expect("parses");
        let teaser = posting.teaser();
        assert!(teaser.ends_with("..."));
        assert_eq!(teaser.chars().count(), TEASER_CHARS + 3);
        assert_eq!(posting.display_title(), "Untitled");
    }
}
