//! The prompt template pool
//!
//! Every template embeds the contract address verbatim, the ticker when it
//! is known, and the shared `constraints` partial that caps length and
//! keeps hashtags out of the reply. The single hashtag is appended at
//! formatting time.

use serde::{Deserialize, Serialize};

/// Tone of a prompt template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Enthusiastic,
    /// FOMO-driven
    Urgent,
    Community,
    Cryptic,
    Educational,
    Meme,
    Milestone,
    Contrarian,
}

/// A prompt template in handlebars syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub tone: Tone,
    pub body: &'static str,
}

/// Appended to every template
pub(crate) const CONSTRAINTS_PARTIAL: &str = "Keep it under {{max_chars}} characters. \
Do not include any hashtags and do not wrap the post in quotes.";

/// The fixed template pool
pub const PROMPT_POOL: &[PromptTemplate] = &[
    PromptTemplate {
        tone: Tone::Enthusiastic,
        body: "Write an enthusiastic promotional message for a memecoin \
with contract address {{address}}. \
{{#if ticker}}The token symbol is ${{ticker}}. {{/if}}{{#if name}}It is called {{name}}. {{/if}}\
Encourage readers to join in on the next big opportunity in crypto. {{> constraints}}",
    },
    PromptTemplate {
        tone: Tone::Urgent,
        body: "Write an urgent, FOMO-inducing post about a token that is moving right now. \
Contract address: {{address}}. {{#if ticker}}Ticker: ${{ticker}}. {{/if}}\
Make readers feel they are about to miss the train, without promising returns. {{> constraints}}",
    },
    PromptTemplate {
        tone: Tone::Community,
        body: "Write a warm, community-building post inviting people to join the holders of \
{{#if name}}{{name}} {{/if}}{{#if ticker}}(${{ticker}}) {{/if}}at contract address {{address}}. \
Focus on belonging and building together. {{> constraints}}",
    },
    PromptTemplate {
        tone: Tone::Cryptic,
        body: "Write a short, cryptic teaser post that hints something big is brewing. \
Drop the contract address {{address}} as if it were a secret. \
{{#if ticker}}Mention ${{ticker}} exactly once. {{/if}}{{> constraints}}",
    },
    PromptTemplate {
        tone: Tone::Educational,
        body: "Write a brief, educational post that introduces a token to newcomers. \
{{#if ticker}}Its ticker is ${{ticker}}{{#if name}} and its name is {{name}}{{/if}}. {{/if}}\
Include the contract address {{address}} and remind readers to do their own research. \
{{> constraints}}",
    },
    PromptTemplate {
        tone: Tone::Meme,
        body: "Write a funny, meme-style post about a degen token. \
{{#if ticker}}The ticker is ${{ticker}}. {{/if}}Contract address: {{address}}. \
Use internet slang and at most two emojis. {{> constraints}}",
    },
    PromptTemplate {
        tone: Tone::Milestone,
        body: "Write a celebratory post announcing fresh on-chain activity for the token at \
contract address {{address}}. {{#if ticker}}Call it ${{ticker}}. {{/if}}\
Frame it as a milestone the community earned. {{> constraints}}",
    },
    PromptTemplate {
        tone: Tone::Contrarian,
        body: "Write a confident, contrarian post arguing that everyone is sleeping on this token. \
{{#if ticker}}Ticker: ${{ticker}}. {{/if}}Contract address: {{address}}. \
Keep it punchy and self-assured. {{> constraints}}",
    },
];
