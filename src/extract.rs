//! Schema extraction through the LLM port.
//!
//! Builds a single prompt from the discovered files, sends it once, and turns
//! the reply into a [`Schema`]. Replies are often wrapped in Markdown fences
//! despite the instructions, so those are removed before parsing.

use std::fmt::Write as _;

use serde::Deserialize;
use tracing::info;

use crate::config::ExtractionSettings;
use crate::discovery::SchemaFiles;
use crate::error::ExtractionError;
use crate::ports::llm::{CompletionRequest, LlmClient};
use crate::schema::Schema;

const TRUNCATION_MARKER: &str = "\n... [truncated]";

const INSTRUCTIONS: &str = r#"Your task:
Extract entities, attributes, and relationships to create a proper ER diagram.

Return ONLY a valid JSON object in this EXACT format (no markdown, no code blocks):
{
  "entities": {
    "EntityName": {
      "attributes": {
        "attributeName": {
          "type": "string|number|date|boolean",
          "isKey": false
        }
      }
    }
  },
  "relationships": {
    "RelationshipName": {
      "entity1": "EntityName1",
      "entity2": "EntityName2",
      "cardinality1": "1|M|N",
      "cardinality2": "1|M|N"
    }
  }
}

Important rules:
1. Entity names should be singular, capitalized (e.g., "Patient", "Doctor", "Employee")
2. Attributes should be simple properties of entities (e.g., "name", "age", "email")
3. Mark primary key attributes with "isKey": true
4. Relationship names should be verbs (e.g., "Consults", "Maintains", "Has")
5. Cardinality: use "1" for one, "M" or "N" for many
6. Common entities: User, Customer, Order, Product, Employee, Patient, Doctor, etc.
7. Foreign keys become relationships, NOT attributes
8. Return ONLY the JSON object, no additional text"#;

/// Cuts `content` to at most `max_chars` characters, appending a marker if cut.
#[must_use]
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{TRUNCATION_MARKER}", &content[..byte_idx]),
        None => content.to_string(),
    }
}

/// Builds the extraction prompt for a set of discovered files.
#[must_use]
pub fn build_prompt(files: &SchemaFiles, max_file_chars: usize) -> String {
    let context = files
        .file_contents
        .iter()
        .map(|(path, content)| {
            format!("--- File: {path} ---\n{}\n", truncate_content(content, max_file_chars))
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut prompt = String::from(
        "You are an Entity-Relationship (ER) diagram expert. \
         Analyze the following code files and extract a complete ER diagram.\n\n",
    );
    let _ = write!(prompt, "Detected Technologies: {}\n\n", files.detected_tech.join(", "));
    let _ = write!(prompt, "Files to analyze:\n{context}\n\n");
    prompt.push_str(INSTRUCTIONS);
    prompt
}

/// Removes Markdown code fences around a model reply.
#[must_use]
pub fn strip_code_fence(text: &str) -> String {
    let text = text.trim();
    let unwrapped = if text.starts_with("```json") {
        remove_fences(&remove_fences(text, "```json"), "```")
    } else if text.starts_with("```") {
        remove_fences(text, "```")
    } else {
        text.to_string()
    };
    unwrapped.trim().to_string()
}

/// Removes every `fence`, together with one newline directly after it.
fn remove_fences(text: &str, fence: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find(fence) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + fence.len()..];
        rest = rest.strip_prefix('\n').unwrap_or(rest);
    }
    out.push_str(rest);
    out
}

/// A parsed model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The reply read leniently into the typed model.
    pub schema: Schema,
    /// The reply object exactly as the model returned it.
    pub raw: serde_json::Value,
}

/// Parses an unwrapped model reply, keeping the raw object next to the schema.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidJson`] when the text is not JSON,
/// [`ExtractionError::NotAnObject`] when it is not a JSON object, and
/// [`ExtractionError::Malformed`] when `entities`, `relationships` or an
/// `attributes` value is present but not a map.
pub fn parse_reply(text: &str) -> Result<Extraction, ExtractionError> {
    let raw: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;
    if !raw.is_object() {
        return Err(ExtractionError::NotAnObject);
    }
    let schema = Schema::deserialize(&raw).map_err(|e| ExtractionError::Malformed(e.to_string()))?;
    Ok(Extraction { schema, raw })
}

/// Parses an unwrapped model reply into a [`Schema`].
///
/// # Errors
///
/// Fails as [`parse_reply`] does.
pub fn parse_schema(text: &str) -> Result<Schema, ExtractionError> {
    parse_reply(text).map(|extraction| extraction.schema)
}

/// Turns discovered files into a [`Schema`] with one LLM call.
pub struct SchemaExtractor<'a> {
    llm: &'a dyn LlmClient,
    settings: &'a ExtractionSettings,
}

impl<'a> SchemaExtractor<'a> {
    /// Creates an extractor over the given client and settings.
    #[must_use]
    pub fn new(llm: &'a dyn LlmClient, settings: &'a ExtractionSettings) -> Self {
        Self { llm, settings }
    }

    /// Builds the request that [`SchemaExtractor::extract`] would send.
    #[must_use]
    pub fn request_for(&self, files: &SchemaFiles) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            prompt: build_prompt(files, self.settings.max_file_chars),
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            top_k: self.settings.top_k,
        }
    }

    /// Extracts a schema from the discovered files. The model is called once.
    ///
    /// # Errors
    ///
    /// Returns a humanized [`ExtractionError`] when the call fails or the reply
    /// cannot be parsed.
    pub async fn extract(&self, files: &SchemaFiles) -> Result<Extraction, ExtractionError> {
        let request = self.request_for(files);
        info!(model = %request.model, files = files.total_files, "calling model for schema extraction");

        let response = self
            .llm
            .complete(&request)
            .await
            .map_err(|e| ExtractionError::from_client_message(&e.to_string()))?;
        info!(
            prompt_tokens = response.prompt_tokens,
            completion_tokens = response.completion_tokens,
            "model response received"
        );

        let extraction = parse_reply(&strip_code_fence(&response.text))?;
        info!(entities = extraction.schema.tables_count(), "schema extracted");
        Ok(extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm::{CompletionFuture, CompletionResponse};
    use crate::ports::PortError;
    use std::sync::Mutex;

    const USER_SCHEMA: &str = r#"{"entities":{"User":{"attributes":{"id":{"type":"number","isKey":true}}}},"relationships":{}}"#;

    /// Replies with a fixed text or error and remembers the prompts it saw.
    struct FixedLlm {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl FixedLlm {
        fn ok(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), seen: Mutex::new(Vec::new()) }
        }

        fn err(msg: &str) -> Self {
            Self { reply: Err(msg.to_string()), seen: Mutex::new(Vec::new()) }
        }
    }

    impl LlmClient for FixedLlm {
        fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
            self.seen.lock().unwrap().push(request.clone());
            let reply = self.reply.clone();
            Box::pin(async move {
                reply
                    .map(|text| CompletionResponse { text, prompt_tokens: 10, completion_tokens: 5 })
                    .map_err(PortError::from)
            })
        }
    }

    fn files(entries: &[(&str, &str)]) -> SchemaFiles {
        let mut files = SchemaFiles { detected_tech: vec!["SQL".into()], ..SchemaFiles::default() };
        for (path, content) in entries {
            files.files_analyzed.push((*path).to_string());
            files.file_contents.insert((*path).to_string(), (*content).to_string());
        }
        files.total_files = files.file_contents.len();
        files
    }

    #[test]
    fn short_content_is_untouched() {
        assert_eq!(truncate_content("abc", 4000), "abc");
        assert_eq!(truncate_content("abcd", 4), "abcd");
    }

    #[test]
    fn long_content_is_cut_by_chars() {
        assert_eq!(truncate_content("abcdef", 3), "abc\n... [truncated]");
        assert_eq!(truncate_content("ééééé", 2), "éé\n... [truncated]");
    }

    #[test]
    fn prompt_lists_technologies_and_file_blocks() {
        let mut input = files(&[("a.sql", "CREATE TABLE a ();"), ("b.sql", "CREATE TABLE b ();")]);
        input.detected_tech.push("Prisma".into());

        let prompt = build_prompt(&input, 4000);

        assert!(prompt.starts_with("You are an Entity-Relationship (ER) diagram expert."));
        assert!(prompt.contains("Detected Technologies: SQL, Prisma\n"));
        assert!(prompt.contains(
            "--- File: a.sql ---\nCREATE TABLE a ();\n\n\n--- File: b.sql ---\nCREATE TABLE b ();\n"
        ));
        assert!(prompt.ends_with("8. Return ONLY the JSON object, no additional text"));
    }

    #[test]
    fn prompt_truncates_large_files() {
        let big = "x".repeat(4100);
        let prompt = build_prompt(&files(&[("big.sql", big.as_str())]), 4000);
        let expected = format!("--- File: big.sql ---\n{}\n... [truncated]\n", "x".repeat(4000));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"x".repeat(4001)));
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  ```\n{\"a\":1}\n```  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence(" {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn parse_rejects_non_json_and_non_objects() {
        assert!(matches!(parse_schema("not json"), Err(ExtractionError::InvalidJson(_))));
        assert_eq!(parse_schema("[1, 2]"), Err(ExtractionError::NotAnObject));
        assert_eq!(parse_schema("null"), Err(ExtractionError::NotAnObject));
        assert!(matches!(
            parse_schema(r#"{"entities": []}"#),
            Err(ExtractionError::Malformed(_))
        ));
    }

    #[test]
    fn parse_accepts_partial_objects() {
        let schema = parse_schema("{}").unwrap();
        assert_eq!(schema.tables_count(), 0);
    }

    #[test]
    fn parse_tolerates_loosely_typed_attributes() {
        let schema = parse_schema(
            r#"{"entities":{"User":{"attributes":{"id":{"type":"number","isKey":"true"}}}}}"#,
        )
        .unwrap();
        assert!(schema.entities["User"].attributes["id"].is_key);

        let schema =
            parse_schema(r#"{"entities":{"User":{"attributes":{"id":{"type":5,"isKey":1}}}}}"#)
                .unwrap();
        assert!(schema.entities["User"].attributes["id"].is_key);

        let schema =
            parse_schema(r#"{"entities":{"User":{"attributes":{"id":"number"}}}}"#).unwrap();
        assert!(!schema.entities["User"].attributes["id"].is_key);
    }

    #[test]
    fn parse_keeps_reply_order_and_raw_object() {
        let text = r#"{"entities":{"Zebra":{},"Apple":{}},"relationships":{},"notes":"extra"}"#;
        let extraction = parse_reply(text).unwrap();

        let names: Vec<&str> = extraction.schema.entities.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zebra", "Apple"]);
        assert_eq!(extraction.raw["notes"], "extra");
    }

    #[tokio::test]
    async fn extract_sends_one_request_with_settings() {
        let llm = FixedLlm::ok(USER_SCHEMA);
        let settings = ExtractionSettings::default();
        let extractor = SchemaExtractor::new(&llm, &settings);

        let extraction =
            extractor.extract(&files(&[("schema.sql", "CREATE TABLE users ();")])).await.unwrap();

        assert_eq!(extraction.schema.tables_count(), 1);
        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gemini-2.5-pro");
        assert_eq!(seen[0].top_k, 10);
        assert!(seen[0].prompt.contains("--- File: schema.sql ---"));
    }

    #[tokio::test]
    async fn fenced_reply_gives_the_same_schema() {
        let settings = ExtractionSettings::default();
        let input = files(&[("schema.sql", "CREATE TABLE users ();")]);

        let plain = FixedLlm::ok(USER_SCHEMA);
        let fenced = FixedLlm::ok(&format!("```json\n{USER_SCHEMA}\n```"));

        let a = SchemaExtractor::new(&plain, &settings).extract(&input).await.unwrap();
        let b = SchemaExtractor::new(&fenced, &settings).extract(&input).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn client_failures_are_humanized() {
        let settings = ExtractionSettings::default();
        let input = files(&[("schema.sql", "")]);

        let llm = FixedLlm::err("Gemini API rate limit reached (429)");
        let err = SchemaExtractor::new(&llm, &settings).extract(&input).await.unwrap_err();
        assert_eq!(err, ExtractionError::RateLimited);

        let llm = FixedLlm::err("socket closed");
        let err = SchemaExtractor::new(&llm, &settings).extract(&input).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to extract schema with Gemini: socket closed");
    }
}
