//! Core data models for webdict
//!
//! This module contains the dictionary entry types returned by the upstream
//! API and the client used to fetch them. Only the fields rendered by the
//! front-end are modeled; unknown fields in the upstream JSON are ignored.

pub mod dictionary;

pub use dictionary::{ClientError, DictionaryClient, RawResponse, DEFAULT_API_BASE};

use serde::{Deserialize, Serialize};

/// A single dictionary headword with its phonetics and meanings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordEntry {
    /// The headword itself
    pub word: String,
    /// Primary phonetic spelling, if the API supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    /// All known phonetic spellings
    pub phonetics: Vec<Phonetic>,
    /// Meanings grouped by part of speech
    pub meanings: Vec<Meaning>,
    /// Pages the entry was sourced from
    pub source_urls: Vec<String>,
}

/// A phonetic spelling with an optional pronunciation recording
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Phonetic {
    pub text: Option<String>,
    /// URL of an audio file; the API sends an empty string when there is none
    #[serde(deserialize_with = "empty_string_as_none")]
    pub audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Definitions for one part of speech
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meaning {
    /// e.g. "noun", "verb", "interjection"
    pub part_of_speech: String,
    /// Definitions in the order the API returned them
    pub definitions: Vec<Definition>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

/// A single definition with an optional usage example
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Definition {
    pub definition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

/// Error body returned by the API for non-2xx responses
///
/// The title is shown as the page heading, so the lookup layer appends the
/// queried word to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupError {
    pub title: String,
    pub message: String,
    /// Suggested next step, e.g. "You can try the search again at later time"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
