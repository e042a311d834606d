use async_trait::async_trait;
use pitch_core::{ContactEnricher, ContactInfo, Result};
use sha2::{Digest, Sha256};

use crate::ranking::round_half_up;

/// Guesses contact details from a byline and outlet name.
///
/// Stands in for a real enrichment API behind the same [`ContactEnricher`]
/// interface. Output is deterministic per `(name, outlet)`.
#[derive(Debug, Clone, Default)]
pub struct MockContactEnricher;

impl MockContactEnricher {
    pub fn new() -> Self {
        Self
    }

    fn email(name: &str, outlet: &str) -> String {
        let parts: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
        let first = parts.first().map(String::as_str).unwrap_or("unknown");
        let last = parts.last().map(String::as_str).unwrap_or("unknown");

        let mut domain: String = outlet
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        if domain.is_empty() {
            domain.push_str("unknown");
        }

        format!("{}.{}@{}.com", first, last, domain)
    }

    fn twitter_handle(name: &str) -> String {
        format!("@{}", name.split_whitespace().collect::<String>().to_lowercase())
    }

    fn linkedin_url(name: &str) -> String {
        let slug = name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();
        format!("https://linkedin.com/in/{}", slug)
    }

    /// Confidence in `[0.50, 0.95]`, fixed per reporter.
    fn email_confidence(name: &str, outlet: &str) -> f64 {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update([0x1f]);
        hasher.update(outlet.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        let fraction = u64::from_le_bytes(bytes) as f64 / u64::MAX as f64;
        round_half_up(0.5 + fraction * 0.45, 2).min(0.95)
    }
}

#[async_trait]
impl ContactEnricher for MockContactEnricher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn enrich(&self, name: &str, outlet: &str) -> Result<ContactInfo> {
        Ok(ContactInfo {
            email: Some(Self::email(name, outlet)),
            email_confidence: Some(Self::email_confidence(name, outlet)),
            linkedin_url: Some(Self::linkedin_url(name)),
            twitter_handle: Some(Self::twitter_handle(name)),
        })
    }
}
