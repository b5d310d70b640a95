//! Company Archive: round-wise interview questions for a named company.
//!
//! Results are cached in Redis per lower-cased company name. The cache is best-effort:
//! read and write failures are logged and the request proceeds without it.

use redis::aio::ConnectionLike;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::generation::prompts::{COMPANY_ARCHIVE_PROMPT_TEMPLATE, COMPANY_ARCHIVE_SYSTEM_TEMPLATE};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::GenerationRequest;
use crate::normalize::fields::{
    fraction, fraction_key, items, opt_text, percent_key, round2, text, KeyPath, NumericKey,
};
use crate::normalize::retry::StructuredRequest;
use crate::normalize::Shape;

pub const NO_QUESTIONS_NOTE: &str = "no prior questions found";
const DEFAULT_SOURCE: &str = "inferred";
const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveQuestion {
    pub question: String,
    pub source: String,
    /// 0.0-1.0
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRound {
    pub round_name: String,
    pub questions: Vec<ArchiveQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyArchive {
    pub company: String,
    pub rounds: Vec<InterviewRound>,
    pub note: String,
}

const COMPANY: &[KeyPath] = &[&["company"], &["Company"], &["company_name"], &["companyName"]];
const ROUNDS: &[KeyPath] = &[&["rounds"], &["Rounds"], &["interview_rounds"]];
const ROUND_NAME: &[KeyPath] = &[&["round_name"], &["roundName"], &["name"], &["round"]];
const QUESTIONS: &[KeyPath] = &[&["questions"], &["Questions"]];
const QUESTION: &[KeyPath] = &[&["question"], &["Question"], &["text"]];
const SOURCE: &[KeyPath] = &[&["source"], &["Source"]];
const CONFIDENCE: &[NumericKey] = &[
    fraction_key(&["confidence"]),
    fraction_key(&["Confidence"]),
    percent_key(&["confidence_score"]),
    percent_key(&["confidenceScore"]),
];
const NOTE: &[KeyPath] = &[&["note"], &["Note"], &["notes"]];

impl CompanyArchive {
    /// Normalizes a parsed answer; `requested` names the company when the model omits it.
    pub fn normalize(value: &Value, requested: &str) -> Self {
        let rounds: Vec<InterviewRound> = items(value, ROUNDS)
            .iter()
            .enumerate()
            .map(|(i, round)| InterviewRound {
                round_name: text(round, ROUND_NAME, &format!("Round {}", i + 1)),
                questions: items(round, QUESTIONS)
                    .iter()
                    .filter_map(|q| {
                        let question = match q {
                            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
                            _ => opt_text(q, QUESTION)?,
                        };
                        Some(ArchiveQuestion {
                            question,
                            source: text(q, SOURCE, DEFAULT_SOURCE),
                            confidence: round2(fraction(q, CONFIDENCE).unwrap_or(DEFAULT_CONFIDENCE)),
                        })
                    })
                    .collect(),
            })
            .filter(|round| !round.questions.is_empty())
            .collect();

        let note = match opt_text(value, NOTE) {
            Some(note) => note,
            None if rounds.is_empty() => NO_QUESTIONS_NOTE.to_string(),
            None => String::new(),
        };

        Self {
            company: text(value, COMPANY, requested.trim()),
            rounds,
            note,
        }
    }
}

pub fn company_archive_request(company: &str) -> StructuredRequest {
    let system = fill_template(COMPANY_ARCHIVE_SYSTEM_TEMPLATE, &[("company", company)]);
    let prompt = fill_template(COMPANY_ARCHIVE_PROMPT_TEMPLATE, &[("company", company)]);
    StructuredRequest::new(
        GenerationRequest::new(prompt, system).with_max_output_tokens(4096),
        Shape::Object,
    )
}

pub fn cache_key(company: &str) -> String {
    format!("company_archive:{}", company.trim().to_lowercase())
}

/// Reads a cached archive. Misses, command failures and undecodable entries are all `None`.
pub async fn read_cached<C>(redis: &C, key: &str) -> Option<CompanyArchive>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    let mut conn = redis.clone();
    let cached: Option<String> = match conn.get(key).await {
        Ok(cached) => cached,
        Err(e) => {
            warn!(key, "Cache read failed: {e}");
            return None;
        }
    };
    let archive = serde_json::from_str(&cached?)
        .map_err(|e| warn!(key, "Discarding undecodable cache entry: {e}"))
        .ok()?;
    debug!(key, "Company archive cache hit");
    Some(archive)
}

pub async fn write_cache<C>(redis: &C, key: &str, archive: &CompanyArchive, ttl_secs: u64)
where
    C: ConnectionLike + Clone + Send + Sync,
{
    let payload = match serde_json::to_string(archive) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(key, "Failed to encode company archive for cache: {e}");
            return;
        }
    };
    let mut conn = redis.clone();
    let stored: redis::RedisResult<()> = conn.set_ex(key, payload, ttl_secs).await;
    if let Err(e) = stored {
        warn!(key, "Cache write failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::{Arg, Cmd, Pipeline, RedisResult, Value as RedisValue};
    use serde_json::json;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    type Reply<'a, T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send + 'a>>;

    /// In-memory stand-in for a Redis connection: GET and SETEX only.
    #[derive(Clone, Default)]
    struct MemoryRedis {
        entries: Arc<Mutex<HashMap<String, (String, u64)>>>,
    }

    impl MemoryRedis {
        fn insert(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), 0));
        }

        fn ttl(&self, key: &str) -> Option<u64> {
            self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
        }

        fn reply(&self, cmd: &Cmd) -> RedisValue {
            let args: Vec<String> = cmd
                .args_iter()
                .filter_map(|arg| match arg {
                    Arg::Simple(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
                    Arg::Cursor => None,
                })
                .collect();
            let mut entries = self.entries.lock().unwrap();
            match args.first().map(String::as_str) {
                Some("GET") => match entries.get(&args[1]) {
                    Some((value, _)) => RedisValue::Data(value.clone().into_bytes()),
                    None => RedisValue::Nil,
                },
                Some("SETEX") => {
                    let ttl = args[2].parse().unwrap();
                    entries.insert(args[1].clone(), (args[3].clone(), ttl));
                    RedisValue::Okay
                }
                _ => RedisValue::Nil,
            }
        }
    }

    impl ConnectionLike for MemoryRedis {
        fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> Reply<'a, RedisValue> {
            let reply = self.reply(cmd);
            Box::pin(async move { Ok(reply) })
        }

        fn req_packed_commands<'a>(
            &'a mut self,
            _pipeline: &'a Pipeline,
            _offset: usize,
            _count: usize,
        ) -> Reply<'a, Vec<RedisValue>> {
            Box::pin(async move { Ok(Vec::new()) })
        }

        fn get_db(&self) -> i64 {
            0
        }
    }

    fn sample_archive() -> CompanyArchive {
        CompanyArchive::normalize(
            &json!({"company": "Acme", "rounds": [{"round_name": "HR", "questions": ["Why Acme?"]}]}),
            "acme",
        )
    }

    #[tokio::test]
    async fn test_cache_round_trip_through_shared_connection() {
        let redis = MemoryRedis::default();
        let key = cache_key("Acme");
        assert!(read_cached(&redis, &key).await.is_none());

        write_cache(&redis, &key, &sample_archive(), 86_400).await;
        assert_eq!(redis.ttl(&key), Some(86_400));
        assert_eq!(read_cached(&redis, &key).await, Some(sample_archive()));
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_is_a_miss() {
        let redis = MemoryRedis::default();
        redis.insert("company_archive:acme", "not json");
        assert!(read_cached(&redis, "company_archive:acme").await.is_none());
    }

    #[test]
    fn test_normalize_camel_case_answer() {
        let value = json!({
            "company": "Acme Corp",
            "rounds": [
                {"roundName": "Online Assessment", "questions": [
                    {"question": "Two sum", "source": "Glassdoor", "confidence": 0.8},
                    {"question": "LRU cache", "confidence": "high"},
                    {"question": "  "}
                ]},
                {"roundName": "HR", "questions": ["Why Acme?"]}
            ],
            "note": ""
        });
        let archive = CompanyArchive::normalize(&value, "acme");
        assert_eq!(archive.company, "Acme Corp");
        assert_eq!(archive.rounds.len(), 2);
        let oa = &archive.rounds[0];
        assert_eq!(oa.round_name, "Online Assessment");
        assert_eq!(oa.questions.len(), 2);
        assert_eq!(oa.questions[0].confidence, 0.8);
        assert_eq!(oa.questions[1].source, "inferred");
        assert_eq!(oa.questions[1].confidence, 0.9);
        assert_eq!(archive.rounds[1].questions[0].question, "Why Acme?");
        assert_eq!(archive.rounds[1].questions[0].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(archive.note, "");
    }

    #[test]
    fn test_empty_answer_gets_defaults() {
        let archive = CompanyArchive::normalize(&json!({}), "  Initech ");
        assert_eq!(archive.company, "Initech");
        assert!(archive.rounds.is_empty());
        assert_eq!(archive.note, NO_QUESTIONS_NOTE);
    }

    #[test]
    fn test_percent_confidence_is_scaled() {
        let value = json!({"rounds": [{"round_name": "Tech", "questions": [
            {"question": "Q", "confidence": 75},
            {"question": "R", "confidenceScore": 30}
        ]}]});
        let archive = CompanyArchive::normalize(&value, "x");
        assert_eq!(archive.rounds[0].questions[0].confidence, 0.75);
        assert_eq!(archive.rounds[0].questions[1].confidence, 0.3);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let value = json!({"Company": "Globex", "Rounds": [{"round": "Onsite", "questions": [{"text": "Q", "confidence": 0.333}]}]});
        let once = CompanyArchive::normalize(&value, "globex");
        let twice = CompanyArchive::normalize(&serde_json::to_value(&once).unwrap(), "globex");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_cache_key_is_case_insensitive() {
        assert_eq!(cache_key(" Google "), "company_archive:google");
        assert_eq!(cache_key("GOOGLE"), cache_key("google"));
    }
}
