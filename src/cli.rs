use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "llm-probe")]
#[command(about = "A CLI tool for probing LLM inference services")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the inference service
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Model name to probe (defaults to the first model the service lists)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Bearer token for authenticated deployments
    #[arg(short = 'k', long, global = true)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Path to a YAML config file (default: ~/.config/llm-probe/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Local environment reports (GPU/CUDA, host specs)
    #[command(subcommand)]
    Env(EnvCommands),

    /// Single-shot service probes (health, models, inference)
    #[command(subcommand)]
    Probe(ProbeCommands),

    /// Probe the chat endpoint with increasing synthetic context sizes
    Sweep {
        /// Target context sizes in tokens, ascending
        #[arg(short = 'T', long, value_delimiter = ',', default_value = "1000,100000,200000")]
        targets: Vec<u64>,

        /// Maximum completion tokens per probe
        #[arg(short = 'n', long, default_value = "150")]
        max_tokens: u32,

        /// Sampling temperature
        #[arg(long, default_value = "0.3")]
        temperature: f32,

        /// Pause between successful probes, in seconds
        #[arg(short, long, default_value = "2")]
        pause: u64,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },

    /// Run the full smoke-test sequence with a pass/fail summary
    Suite {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum EnvCommands {
    /// Report GPU devices, driver, and CUDA toolkit status
    Gpu {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Report host specs (OS, CPU, memory)
    Host {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Report the full environment (host + GPU)
    All {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ProbeCommands {
    /// Check that the service is reachable
    Health {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// List available models
    Models {
        /// API style to query: native (/api/tags) or openai (/v1/models)
        #[arg(short, long, default_value = "native")]
        api: String,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Show model metadata via /api/show
    ModelInfo {
        /// Model name (defaults to the configured model)
        #[arg(short, long)]
        name: Option<String>,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Single-turn completion via the native /api/generate endpoint
    Generate {
        /// Prompt text
        #[arg(short, long)]
        prompt: Option<String>,

        /// Maximum completion tokens (options.num_predict)
        #[arg(short = 'n', long, default_value = "500")]
        max_tokens: u32,

        /// Sampling temperature
        #[arg(long, default_value = "0.7")]
        temperature: f32,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Chat completion via the OpenAI-compatible /v1/chat/completions endpoint
    Chat {
        /// User prompt text
        #[arg(short, long)]
        prompt: Option<String>,

        /// Optional system prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Maximum completion tokens
        #[arg(short = 'n', long, default_value = "500")]
        max_tokens: u32,

        /// Sampling temperature
        #[arg(long, default_value = "0.7")]
        temperature: f32,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Streaming chat completion (server-sent events)
    Stream {
        /// User prompt text
        #[arg(short, long)]
        prompt: Option<String>,

        /// Maximum completion tokens
        #[arg(short = 'n', long, default_value = "200")]
        max_tokens: u32,

        /// Sampling temperature
        #[arg(long, default_value = "0.5")]
        temperature: f32,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Multi-turn chat that grows the context each turn
    Conversation {
        /// Number of turns to run
        #[arg(short = 'N', long, default_value = "10")]
        turns: u32,

        /// Maximum completion tokens per turn
        #[arg(short = 'n', long, default_value = "200")]
        max_tokens: u32,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
}
