use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

/// Points awarded for every accepted selection.
pub const POINTS_PER_SELECTION: u64 = 5;

/// Categories every new student starts with at zero points.
pub const KNOWN_CATEGORIES: [&str; 5] = ["collar", "hair", "makeup", "shoes", "sweater"];

/// One student row as persisted in the roster file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub total_points: u64,
    #[serde(default)]
    pub last_fill_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub points_by_category: BTreeMap<String, u64>,
}

/// Student-facing projection with the derived same-day flag.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub total_points: u64,
    pub can_fill_today: bool,
}

/// The whole persisted roster. Always loaded and written as one unit.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RosterDocument {
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}

/// Calendar date of an instant in the server's local time zone.
pub fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

impl StudentRecord {
    /// Fresh record: zero points, never filled, the known categories at zero.
    pub fn new(student: NewStudent) -> Self {
        let points_by_category = KNOWN_CATEGORIES.iter().map(|c| (c.to_string(), 0)).collect();
        Self {
            id: student.id,
            first_name: student.first_name,
            last_name: student.last_name,
            grade: student.grade,
            class_name: student.class_name,
            total_points: 0,
            last_fill_date: None,
            points_by_category,
        }
    }

    /// Date-only gate: a submission is allowed unless the last one fell on `today`.
    pub fn can_fill_on(&self, today: NaiveDate) -> bool {
        match self.last_fill_date {
            None => true,
            Some(last) => local_date(last) != today,
        }
    }

    /// Award points for each selection and stamp the fill date. Returns the points added.
    ///
    /// Category names are taken as given; unknown ones are created on first use.
    pub fn apply_submission(&mut self, selections: &[String], now: DateTime<Utc>) -> u64 {
        for category in selections {
            *self.points_by_category.entry(category.clone()).or_insert(0) += POINTS_PER_SELECTION;
        }
        let added = POINTS_PER_SELECTION * selections.len() as u64;
        self.total_points += added;
        self.last_fill_date = Some(now);
        added
    }

    pub fn view(&self, today: NaiveDate) -> StudentView {
        StudentView {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            grade: self.grade.clone(),
            class_name: self.class_name.clone(),
            total_points: self.total_points,
            can_fill_today: self.can_fill_on(today),
        }
    }
}

impl RosterDocument {
    pub fn find(&self, id: &str) -> Option<&StudentRecord> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut StudentRecord> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

/// Body of a submission request. Fields stay loose so shape errors surface as
/// validation failures instead of deserialization failures.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInput {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub selections: Option<Value>,
}

/// A submission that passed shape validation.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub student_id: String,
    pub selections: Vec<String>,
}

impl SubmitInput {
    pub fn validate(self) -> Result<Submission, ServiceError> {
        let missing = || ServiceError::Validation("studentId and a selections array are required".into());
        let student_id = self.student_id.filter(|id| !id.is_empty()).ok_or_else(missing)?;
        let items = match self.selections {
            Some(Value::Array(items)) => items,
            _ => return Err(missing()),
        };
        let selections = items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(ServiceError::Validation(format!("selection must be a string, got {other}"))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Submission { student_id, selections })
    }
}

/// Body of an add-student request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
}

/// A new student with every required field present.
#[derive(Clone, Debug, PartialEq)]
pub struct NewStudent {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    pub class_name: String,
}

impl NewStudentInput {
    pub fn validate(self) -> Result<NewStudent, ServiceError> {
        fn required(value: Option<String>) -> Result<String, ServiceError> {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ServiceError::Validation("All fields are required".into()))
        }
        Ok(NewStudent {
            id: required(self.id)?,
            first_name: required(self.first_name)?,
            last_name: required(self.last_name)?,
            grade: required(self.grade)?,
            class_name: required(self.class_name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn student(id: &str) -> StudentRecord {
        StudentRecord::new(NewStudent {
            id: id.into(),
            first_name: "Noa".into(),
            last_name: "Levi".into(),
            grade: "10".into(),
            class_name: "3".into(),
        })
    }

    #[test]
    fn new_record_is_zeroed_with_known_categories() {
        let s = student("1");
        assert_eq!(s.total_points, 0);
        assert!(s.last_fill_date.is_none());
        assert_eq!(s.points_by_category.len(), 5);
        assert!(KNOWN_CATEGORIES.iter().all(|c| s.points_by_category[*c] == 0));
    }

    #[test]
    fn submission_counts_duplicates_and_creates_unknown_categories() {
        let mut s = student("1");
        let now = Utc::now();
        let added = s.apply_submission(&["hair".into(), "shoes".into(), "hair".into(), "glitter".into()], now);
        assert_eq!(added, 20);
        assert_eq!(s.total_points, 20);
        assert_eq!(s.points_by_category["hair"], 10);
        assert_eq!(s.points_by_category["shoes"], 5);
        assert_eq!(s.points_by_category["glitter"], 5);
        assert_eq!(s.last_fill_date, Some(now));
    }

    #[test]
    fn gate_compares_local_dates_not_durations() {
        let mut s = student("1");
        let today = Local::now().date_naive();
        assert!(s.can_fill_on(today));

        // one minute before local midnight: yesterday, though far less than a day ago
        let midnight = Local
            .from_local_datetime(&today.and_hms_opt(0, 0, 0).unwrap())
            .earliest()
            .unwrap();
        s.last_fill_date = Some((midnight - Duration::minutes(1)).with_timezone(&Utc));
        assert!(s.can_fill_on(today));

        s.last_fill_date = Some(midnight.with_timezone(&Utc));
        assert!(!s.can_fill_on(today));
    }

    #[test]
    fn record_serializes_with_camel_case_and_class_key() {
        let value = serde_json::to_value(student("42")).unwrap();
        assert_eq!(value["firstName"], "Noa");
        assert_eq!(value["class"], "3");
        assert_eq!(value["totalPoints"], 0);
        assert!(value["lastFillDate"].is_null());
        assert_eq!(value["pointsByCategory"]["sweater"], 0);
    }

    #[test]
    fn submit_input_requires_student_id_and_array() {
        let ok: SubmitInput = serde_json::from_value(json!({"studentId": "1", "selections": []})).unwrap();
        assert_eq!(ok.validate().unwrap().selections.len(), 0);

        let cases = [
            json!({"selections": ["hair"]}),
            json!({"studentId": "", "selections": ["hair"]}),
            json!({"studentId": "1"}),
            json!({"studentId": "1", "selections": "hair"}),
            json!({"studentId": "1", "selections": null}),
            json!({"studentId": "1", "selections": ["hair", 3]}),
        ];
        for case in cases {
            let input: SubmitInput = serde_json::from_value(case.clone()).unwrap();
            assert!(matches!(input.validate(), Err(ServiceError::Validation(_))), "{case}");
        }
    }

    #[test]
    fn new_student_input_rejects_missing_or_empty_fields() {
        let full = json!({"id": "1", "firstName": "a", "lastName": "b", "grade": "c", "className": "d"});
        let input: NewStudentInput = serde_json::from_value(full.clone()).unwrap();
        assert_eq!(input.validate().unwrap().class_name, "d");

        for key in ["id", "firstName", "lastName", "grade", "className"] {
            let mut missing = full.clone();
            missing.as_object_mut().unwrap().remove(key);
            let input: NewStudentInput = serde_json::from_value(missing).unwrap();
            assert!(input.validate().is_err(), "missing {key}");

            let mut empty = full.clone();
            empty[key] = json!("");
            let input: NewStudentInput = serde_json::from_value(empty).unwrap();
            assert!(input.validate().is_err(), "empty {key}");
        }
    }
}
