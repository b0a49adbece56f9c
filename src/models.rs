//! Server-defined records mirrored by the client
//!
//! The client never owns canonical state. Every struct here is a cached
//! mirror of a backend row; lifecycle (create/mutate/delete) is delegated to
//! the server and reflected locally through the query cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A practice language (e.g. Nepali, Mandarin)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: i64,
    pub name: String,
    pub lang_code: String,
}

/// Payload for creating or updating a language
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDraft {
    pub name: String,
    pub lang_code: String,
}

/// A practice dialogue within a language and domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialogue {
    pub id: i64,
    pub title: String,
    pub language_id: i64,
    pub domain_id: i64,
}

/// Payload for creating or updating a dialogue
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueDraft {
    pub title: String,
    pub language_id: i64,
    pub domain_id: i64,
}

/// One utterance of a dialogue, with optional recorded audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: i64,
    pub dialogue_id: i64,
    pub text_content: String,
    pub segment_order: i32,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub suggested_audio_url: Option<String>,
}

/// Text fields of a segment create/update; audio travels as multipart parts
#[derive(Debug, Clone)]
pub struct SegmentDraft {
    pub dialogue_id: i64,
    pub text_content: String,
    pub segment_order: i32,
}

/// A vocabulary entry with original/converted word pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    pub id: i64,
    pub language_id: i64,
    pub original_word: String,
    pub converted_word: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub original_audio_url: Option<String>,
    #[serde(default)]
    pub converted_audio_url: Option<String>,
}

/// Text fields of a vocabulary create/update; audio travels as multipart parts
#[derive(Debug, Clone)]
pub struct VocabularyDraft {
    pub language_id: i64,
    pub original_word: String,
    pub converted_word: String,
    pub description: Option<String>,
}

/// A timed mock test pairing two dialogues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockTest {
    pub id: i64,
    pub title: String,
    pub language_id: i64,
    pub dialogue_id: i64,
    #[serde(rename = "dialogueId2")]
    pub dialogue_id_2: i64,
    pub duration_seconds: i64,
    pub total_marks: i32,
    pub pass_marks: i32,
}

/// Payload for creating or updating a mock test
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockTestDraft {
    pub title: String,
    pub language_id: i64,
    pub dialogue_id: i64,
    #[serde(rename = "dialogueId2")]
    pub dialogue_id_2: i64,
    pub duration_seconds: i64,
    pub total_marks: i32,
    pub pass_marks: i32,
}

/// A rapid-review set referencing segments across dialogues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RapidReview {
    pub id: i64,
    pub title: String,
    pub language_id: i64,
    pub segments: Vec<i64>,
}

/// Payload for creating or updating a rapid review
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RapidReviewDraft {
    pub title: String,
    pub language_id: i64,
    pub segments: Vec<i64>,
}

/// A user's subscription to one language's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub language_id: i64,
    pub status: String,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub stripe_subscription_id: Option<String>,
}

/// Summary of whether a user currently holds access, per language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub active: bool,
    #[serde(default)]
    pub language_ids: Vec<i64>,
}

/// A payment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub stripe_invoice_id: Option<String>,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Fields of a transaction an admin may amend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// A message submitted through the contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// One server-driven page of contact messages, the canonical cached shape
/// for the paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPage {
    pub messages: Vec<ContactMessage>,
    pub total: i64,
}
