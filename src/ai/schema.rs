use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const MAX_HEADING_CHARS: usize = 200;

/// Structured answer to a natural-language inventory question.
///
/// Field names are capitalised on the wire (`Topic`, `Heading`, ...) and are
/// shared between the server response and the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct QueryAnswer {
    #[serde(rename = "Topic")]
    #[validate]
    pub topic: AnswerTopic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AnswerTopic {
    #[serde(rename = "Heading")]
    #[validate(
        length(max = 200, message = "Heading must be at most 200 characters"),
        custom = "validate_not_blank"
    )]
    pub heading: String,

    #[serde(rename = "Description")]
    #[validate(custom = "validate_not_blank")]
    pub description: String,

    /// Illustrative SQL, each entry a complete statement
    #[serde(rename = "SqlQuery", default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_statements")]
    pub sql_query: Option<Vec<String>>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_statements(statements: &Vec<String>) -> Result<(), ValidationError> {
    if statements.iter().any(|s| strip_code_fence(s).trim().is_empty()) {
        return Err(ValidationError::new("blank_statement"));
    }
    Ok(())
}

impl QueryAnswer {
    pub fn new(heading: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            topic: AnswerTopic {
                heading: heading.into(),
                description: description.into(),
                sql_query: None,
            },
        }
    }

    pub fn with_sql(mut self, statements: Vec<String>) -> Self {
        self.topic.sql_query = Some(statements);
        self
    }

    /// SQL statements with any surrounding markdown fences removed.
    pub fn sql_statements(&self) -> Vec<&str> {
        self.topic
            .sql_query
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|s| strip_code_fence(s).trim())
            .collect()
    }

    /// Renders the answer as markdown: heading, description, then the SQL
    /// statements as an ordered list of code blocks.
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {}\n\n{}\n",
            self.topic.heading.trim(),
            self.topic.description.trim()
        );

        let statements = self.sql_statements();
        if !statements.is_empty() {
            out.push_str("\n### SQL\n\n");
            for (idx, stmt) in statements.iter().enumerate() {
                out.push_str(&format!("{}. ```sql\n{}\n```\n", idx + 1, stmt));
            }
        }

        out
    }
}

/// Response schema handed to the model, in the OpenAPI subset the
/// generateContent endpoint accepts.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "Topic": {
                "type": "OBJECT",
                "properties": {
                    "Heading": {
                        "type": "STRING",
                        "description": format!(
                            "Short title for the analysis, at most {} characters",
                            MAX_HEADING_CHARS
                        )
                    },
                    "Description": {
                        "type": "STRING",
                        "description": "The analysis itself, answering the question from the supplied data"
                    },
                    "SqlQuery": {
                        "type": "ARRAY",
                        "description": "Optional SQL statements that would reproduce the analysis",
                        "items": { "type": "STRING" }
                    }
                },
                "required": ["Heading", "Description"]
            }
        },
        "required": ["Topic"]
    })
}

/// Removes a surrounding ```` ``` ```` or ```` ```lang ```` fence, if any.
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn deserializes_capitalised_wire_format() {
        let raw = json!({
            "Topic": {
                "Heading": "Low stock",
                "Description": "Two products need reordering.",
                "SqlQuery": ["SELECT * FROM products WHERE stock <= min_stock;"]
            }
        });

        let answer: QueryAnswer = serde_json::from_value(raw).unwrap();
        assert_eq!(answer.topic.heading, "Low stock");
        assert_eq!(answer.sql_statements().len(), 1);
        assert!(answer.validate().is_ok());
    }

    #[test]
    fn sql_query_is_optional_and_omitted_when_absent() {
        let answer = QueryAnswer::new("Revenue", "Revenue grew.");
        let value = serde_json::to_value(&answer).unwrap();
        assert!(value["Topic"].get("SqlQuery").is_none());
        assert!(answer.to_markdown().starts_with("## Revenue"));
        assert!(!answer.to_markdown().contains("```sql"));
    }

    #[rstest]
    #[case("", "desc")]
    #[case("   ", "desc")]
    #[case("heading", "")]
    fn blank_fields_fail_validation(#[case] heading: &str, #[case] description: &str) {
        assert!(QueryAnswer::new(heading, description).validate().is_err());
    }

    #[test]
    fn overlong_heading_fails_validation() {
        let answer = QueryAnswer::new("x".repeat(MAX_HEADING_CHARS + 1), "desc");
        assert!(answer.validate().is_err());
    }

    #[test]
    fn blank_sql_statement_fails_validation() {
        let answer = QueryAnswer::new("h", "d").with_sql(vec!["```sql\n```".into()]);
        assert!(answer.validate().is_err());
    }

    #[test]
    fn markdown_renders_statements_as_ordered_code_blocks() {
        let answer = QueryAnswer::new("Top sellers", "Widgets lead.").with_sql(vec![
            "```sql\nSELECT 1;\n```".into(),
            "SELECT 2;".into(),
        ]);
        let md = answer.to_markdown();
        assert!(md.contains("1. ```sql\nSELECT 1;\n```"));
        assert!(md.contains("2. ```sql\nSELECT 2;\n```"));
    }

    #[rstest]
    #[case("SELECT 1;", "SELECT 1;")]
    #[case("```sql\nSELECT 1;\n```", "SELECT 1;")]
    #[case("```\n{\"a\":1}\n```", "{\"a\":1}")]
    fn strips_code_fences(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_code_fence(input), expected);
    }

    #[test]
    fn schema_requires_topic_heading_and_description() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(["Topic"]));
        assert_eq!(
            schema["properties"]["Topic"]["required"],
            json!(["Heading", "Description"])
        );
    }
}
