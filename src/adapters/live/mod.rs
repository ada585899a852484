//! Adapters that talk to the real world: system time, the `git` binary and
//! the Gemini REST API.

pub mod clock;
pub mod git;
pub mod llm;

pub use clock::LiveClock;
pub use git::LiveGitTransport;
pub use llm::GeminiClient;
