//! Reply selection policies.

use std::time::Duration;

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::models::Artifact;

/// Canned replies played back by the random policy.
pub const CANNED_RESPONSES: [&str; 3] = [
    "Here's a comprehensive analysis of your question. The key aspects to consider include performance optimization, user experience, and scalability. Let me break this down into several important points that will help you understand the full picture.",
    "That's an interesting question. Based on current best practices, I'd recommend focusing on component architecture first. Clean separation of concerns will make your codebase more maintainable and easier to scale as your application grows.",
    "Let me explain this concept step by step. First, we need to understand the fundamentals. Then we can explore more advanced techniques that professional developers use in production environments.",
];

/// Reply text streamed when an artifact is attached.
pub const ARTIFACT_REPLY: &str =
    "Here's a code example:\n```javascript\nconst hello = () => console.log('Hello World');\n```";

/// Code carried by the attached artifact.
pub const ARTIFACT_CODE: &str = "const hello = () => console.log('Hello World');";

/// Chance that a reply carries an artifact.
pub const ARTIFACT_PROBABILITY: f64 = 0.3;

/// Shortest pause before a fragment.
pub const MIN_FRAGMENT_DELAY: Duration = Duration::from_millis(50);

/// Longest pause before a fragment.
pub const MAX_FRAGMENT_DELAY: Duration = Duration::from_millis(100);

/// A chosen reply: text to stream plus an optional artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub artifact: Option<Artifact>,
}

impl Reply {
    /// A plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            artifact: None,
        }
    }

    /// Attach an artifact.
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifact = Some(artifact);
        self
    }
}

/// Decides what the mock responder says and how fast.
pub trait ResponsePolicy: Send + Sync {
    /// Pick the reply for `prompt`.
    fn compose(&self, prompt: &str) -> Reply;

    /// Pause before the next fragment.
    fn fragment_delay(&self) -> Duration;
}

/// Random canned replies with random pacing.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    responses: Vec<String>,
    artifact_probability: f64,
    min_delay: Duration,
    max_delay: Duration,
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self {
            responses: CANNED_RESPONSES.iter().map(|s| s.to_string()).collect(),
            artifact_probability: ARTIFACT_PROBABILITY,
            min_delay: MIN_FRAGMENT_DELAY,
            max_delay: MAX_FRAGMENT_DELAY,
        }
    }
}

impl RandomPolicy {
    /// Policy with the reference replies, 0.3 artifact chance and 50-100ms pacing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the canned replies. An empty list keeps the defaults.
    pub fn with_responses(mut self, responses: Vec<String>) -> Self {
        if !responses.is_empty() {
            self.responses = responses;
        }
        self
    }

    /// Set the artifact probability (clamped to 0.0..=1.0).
    pub fn with_artifact_probability(mut self, probability: f64) -> Self {
        self.artifact_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Set the pacing range. The bounds are swapped if given in reverse.
    pub fn with_delay_range(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min.min(max);
        self.max_delay = max.max(min);
        self
    }
}

impl ResponsePolicy for RandomPolicy {
    fn compose(&self, _prompt: &str) -> Reply {
        let mut rng = rand::rng();
        if rng.random_bool(self.artifact_probability) {
            return Reply::text(ARTIFACT_REPLY).with_artifact(Artifact::code(ARTIFACT_CODE));
        }
        let text = self
            .responses
            .choose(&mut rng)
            .map(String::as_str)
            .unwrap_or(CANNED_RESPONSES[0]);
        Reply::text(text)
    }

    fn fragment_delay(&self) -> Duration {
        if self.min_delay == self.max_delay {
            return self.min_delay;
        }
        rand::rng().random_range(self.min_delay..=self.max_delay)
    }
}

/// Always the same reply, no pacing. For tests and demos.
#[derive(Debug, Clone)]
pub struct FixedPolicy {
    reply: Reply,
    delay: Duration,
}

impl FixedPolicy {
    /// Always answer with `reply`.
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
        }
    }

    /// Pause for `delay` before every fragment.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl ResponsePolicy for FixedPolicy {
    fn compose(&self, _prompt: &str) -> Reply {
        self.reply.clone()
    }

    fn fragment_delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_policy_always_artifact() {
        let policy = RandomPolicy::new().with_artifact_probability(1.0);
        let reply = policy.compose("anything");
        assert_eq!(reply.text, ARTIFACT_REPLY);
        assert_eq!(reply.artifact, Some(Artifact::code(ARTIFACT_CODE)));
    }

    #[test]
    fn test_random_policy_never_artifact_picks_canned() {
        let policy = RandomPolicy::new().with_artifact_probability(0.0);
        for _ in 0..20 {
            let reply = policy.compose("anything");
            assert!(reply.artifact.is_none());
            assert!(CANNED_RESPONSES.contains(&reply.text.as_str()));
        }
    }

    #[test]
    fn test_random_policy_custom_responses() {
        let policy = RandomPolicy::new()
            .with_artifact_probability(0.0)
            .with_responses(vec!["only one".to_string()]);
        assert_eq!(policy.compose("q").text, "only one");
    }

    #[test]
    fn test_delay_within_range() {
        let policy = RandomPolicy::new();
        for _ in 0..50 {
            let delay = policy.fragment_delay();
            assert!(delay >= MIN_FRAGMENT_DELAY && delay <= MAX_FRAGMENT_DELAY);
        }
    }

    #[test]
    fn test_delay_range_normalized() {
        let policy = RandomPolicy::new()
            .with_delay_range(Duration::from_millis(9), Duration::from_millis(3));
        let delay = policy.fragment_delay();
        assert!(delay >= Duration::from_millis(3) && delay <= Duration::from_millis(9));
    }

    #[test]
    fn test_fixed_policy() {
        let policy = FixedPolicy::new(Reply::text("hi there"));
        assert_eq!(policy.compose("x"), Reply::text("hi there"));
        assert_eq!(policy.fragment_delay(), Duration::ZERO);
    }
}
