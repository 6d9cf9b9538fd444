//! Replacement of volatile values with stable placeholders.
//!
//! Integration runs generate fresh tenant ids, resource UUIDs, names and
//! passwords every time. The scrubber rewrites those values to fixed tokens
//! such as `<tenant_id>` or `<name>` so that structurally identical requests
//! become textually identical and the report stays diff-stable between runs.
//!
//! Every rule is a plain search-and-replace. A rule that finds nothing leaves
//! the text untouched, so scrubbing never fails and scrubbing an already
//! scrubbed record changes nothing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::request::RequestRecord;

const HEX_32: &str = r"[a-fA-F0-9]{32}";
const TENANT_ALTERNATIVE: &str = r"p-[a-fA-F0-9]{9}";
const UUID: &str =
    r"[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}";

/// A compiled search-and-replace
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> crate::Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

static PATH_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        (HEX_32, "<tenant_id>"),
        (TENANT_ALTERNATIVE, "<tenant_id>"),
        (UUID, "<resource_id>"),
    ]
    .iter()
    .map(|(pattern, replacement)| builtin(pattern, replacement))
    .collect()
});

static BODY_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        (UUID, "<resource_id>"),
        (r#""new_size":\d+"#, r#""new_size":"<new_size>""#),
        (r#""volume_size":\d+"#, r#""volume_size":"<volume_size>""#),
        (r#""flavorRef":"\d+""#, r#""flavorRef":"<flavorRef_id>""#),
        (r#""size":\d+"#, r#""size":"<size>""#),
        (r#""protocol_port":\d+"#, r#""protocol_port":"<protocol_port>""#),
    ]
    .iter()
    .map(|(pattern, replacement)| builtin(pattern, replacement))
    .collect()
});

fn builtin(pattern: &str, replacement: &str) -> Rule {
    Rule::new(pattern, replacement).expect("builtin scrub rules are valid regexes")
}

/// Scrubs request records according to a [`Config`].
#[derive(Debug, Clone)]
pub struct Scrubber {
    fake_resource_ids: Vec<String>,
    query_rules: Vec<Rule>,
    body_key_rules: Vec<Rule>,
}

impl Scrubber {
    /// Compile the per-key rules for the configured sensitive keys
    pub fn new(config: &Config) -> crate::Result<Self> {
        let mut query_rules = Vec::with_capacity(config.sensitive_keys.len() * 2);
        let mut body_key_rules = Vec::with_capacity(config.sensitive_keys.len() * 2);

        for key in &config.sensitive_keys {
            let escaped = regex::escape(key);
            let literal = key.replace('$', "$$");
            let placeholder = format!(r#""{}":"<{}>""#, literal, literal);

            query_rules.push(Rule::new(
                &format!(r#"(\A|&|=|"){}=.*?(\z|&|")"#, escaped),
                format!("${{1}}{}=<{}>${{2}}", literal, literal),
            )?);
            query_rules.push(Rule::new(
                &format!(r#""{}"=>".*?""#, escaped),
                placeholder.clone(),
            )?);

            body_key_rules.push(Rule::new(
                &format!(r#""{}":".*?""#, escaped),
                placeholder.clone(),
            )?);
            body_key_rules.push(Rule::new(
                &format!(r#""{}":\{{[^{{]*?\}}"#, escaped),
                placeholder,
            )?);
        }

        Ok(Self {
            fake_resource_ids: config.fake_resource_ids.clone(),
            query_rules,
            body_key_rules,
        })
    }

    /// Return the record with path, query and body scrubbed
    pub fn scrub(&self, request: RequestRecord) -> RequestRecord {
        let path = self.scrub_path(&request.path);
        let query = request.query.as_deref().map(|q| self.scrub_query(q));
        let body = request.body.as_deref().map(|b| self.scrub_body(b));
        RequestRecord {
            path,
            query,
            body,
            ..request
        }
    }

    pub fn scrub_path(&self, path: &str) -> String {
        let mut path = apply_all(&PATH_RULES, path.to_string());
        for fake_id in &self.fake_resource_ids {
            path = path.replace(fake_id.as_str(), "<resource_id>");
        }
        path
    }

    pub fn scrub_query(&self, query: &str) -> String {
        apply_all(&self.query_rules, query.to_string())
    }

    pub fn scrub_body(&self, body: &str) -> String {
        let body = apply_all(&BODY_RULES, body.to_string());
        apply_all(&self.body_key_rules, body)
    }
}

fn apply_all(rules: &[Rule], text: String) -> String {
    rules.iter().fold(text, |text, rule| rule.apply(&text))
}
