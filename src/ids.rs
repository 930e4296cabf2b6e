//! Record identifiers shared by comments and family members.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a comment or family member as the API hands it out.
///
/// The backend mixes numeric and string keys, so both are accepted and
/// compared by value. Numbers order before strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
	/// Numeric key, e.g. `42`.
	Number(i64),
	/// String key, e.g. `"c-9f2"`.
	Text(String),
}

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RecordId::Number(n) => write!(f, "{n}"),
			RecordId::Text(s) => f.write_str(s),
		}
	}
}

impl From<i64> for RecordId {
	fn from(n: i64) -> Self {
		RecordId::Number(n)
	}
}

impl From<&str> for RecordId {
	fn from(s: &str) -> Self {
		RecordId::Text(s.to_owned())
	}
}

impl From<String> for RecordId {
	fn from(s: String) -> Self {
		RecordId::Text(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_numbers_and_strings() {
		let ids: Vec<RecordId> = serde_json::from_str(r#"[7, "abc"]"#).unwrap();
		assert_eq!(ids, vec![RecordId::from(7), RecordId::from("abc")]);
		assert_eq!(ids[1].to_string(), "abc");
	}

	#[test]
	fn numbers_sort_before_text() {
		assert!(RecordId::from(1000) < RecordId::from("1"));
		assert!(RecordId::from(2) < RecordId::from(10));
	}
}
