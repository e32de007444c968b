use std::{
    fs,
    io::{self, Read},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tool_call_extractor::{
    build_parser,
    logging::{self, LoggingConfig},
    tokenizer::Tokenizer,
    tool_parser::{ExtractionOutput, ParserRegistry},
    ToolParserConfig,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tool-call-extractor")]
#[command(about = "Split a model generation into content and tool calls")]
#[command(long_about = r#"
Split a model generation into content and tool calls

Reads one generation, decodes it with a HuggingFace tokenizer and prints the
remaining content together with every tool call found, as JSON.

Examples:
  # Token ids as a JSON array on stdin
  echo '[151657, 198, 4913]' | tool-call-extractor --tokenizer tokenizer.json

  # Raw text, encoded with the same tokenizer first
  tool-call-extractor --tokenizer tokenizer.json --text --input reply.txt
"#)]
struct CliArgs {
    /// Path to a HuggingFace tokenizer.json
    #[arg(long, required_unless_present = "list_parsers")]
    tokenizer: Option<String>,

    /// Tool call format (defaults to TOOL_PARSER_FORMAT or "hermes")
    #[arg(long)]
    parser: Option<String>,

    /// Input file, "-" for stdin
    #[arg(long, default_value = "-")]
    input: String,

    /// Treat the input as raw text instead of a JSON array of token ids
    #[arg(long, default_value_t = false)]
    text: bool,

    /// Drop special tokens while decoding
    #[arg(long, default_value_t = false)]
    skip_special_tokens: bool,

    /// Maximum number of concurrent decodes
    #[arg(long)]
    decode_workers: Option<usize>,

    /// Wrap extraction in tracing spans
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    log_json: bool,

    /// Directory for rolling log files
    #[arg(long)]
    log_dir: Option<String>,

    /// Print the registered tool call formats and exit
    #[arg(long, default_value_t = false)]
    list_parsers: bool,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

impl CliArgs {
    /// Apply the logging flags on top of `base`
    fn logging_config(&self, mut base: LoggingConfig) -> Result<LoggingConfig> {
        if let Some(level) = &self.log_level {
            base.level = match logging::parse_level(level) {
                Some(level) => level,
                None => bail!("Invalid log level: {}", level),
            };
        }
        if self.log_json {
            base.json_format = true;
        }
        if let Some(dir) = &self.log_dir {
            base.log_dir = Some(dir.clone());
        }
        Ok(base)
    }

    /// Apply the parser flags on top of `base`
    fn parser_config(&self, mut base: ToolParserConfig) -> ToolParserConfig {
        if let Some(parser) = &self.parser {
            base = base.with_format(parser.clone());
        }
        if let Some(workers) = self.decode_workers {
            base = base.with_max_concurrent_decodes(workers);
        }
        if self.skip_special_tokens {
            base = base.with_skip_special_tokens(true);
        }
        if self.trace {
            base = base.with_trace(true);
        }
        base
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let _log_guard = logging::init_logging(args.logging_config(LoggingConfig::from_env())?);

    let registry = ParserRegistry::global();
    if args.list_parsers {
        for name in registry.list_parsers() {
            println!("{}", name);
        }
        return Ok(());
    }

    let tokenizer_path = args
        .tokenizer
        .as_deref()
        .context("--tokenizer is required")?;
    let tokenizer = Tokenizer::from_file(tokenizer_path)?;

    let config = args.parser_config(ToolParserConfig::from_env()?);
    let parser = build_parser(&config, registry, tokenizer)?;
    info!("Using tool parser '{}'", parser.name());

    let raw = read_input(&args.input)?;
    let token_ids: Vec<u32> = if args.text {
        parser.tokenizer().encode(&raw)?.token_ids().to_vec()
    } else {
        serde_json::from_str(&raw).context("Input must be a JSON array of token ids")?
    };

    let output = ExtractionOutput::from(parser.extract_tool_calls(&token_ids).await?);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(())
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        let argv = ["tool-call-extractor"].iter().chain(args).copied();
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_tokenizer_required_unless_listing() {
        assert!(CliArgs::try_parse_from(["tool-call-extractor"]).is_err());

        let args = parse(&["--list-parsers"]);
        assert!(args.list_parsers);
        assert!(args.tokenizer.is_none());
        assert_eq!(args.input, "-");
    }

    #[test]
    fn test_flags_override_base_parser_config() {
        let args = parse(&[
            "--tokenizer",
            "tok.json",
            "--parser",
            "passthrough",
            "--decode-workers",
            "3",
            "--skip-special-tokens",
        ]);
        let config = args.parser_config(ToolParserConfig::default());

        assert_eq!(config.format, "passthrough");
        assert_eq!(config.max_concurrent_decodes, 3);
        assert!(config.skip_special_tokens);
        assert!(!config.trace);
    }

    #[test]
    fn test_base_parser_config_kept_without_flags() {
        let args = parse(&["--tokenizer", "tok.json"]);
        let base = ToolParserConfig::default()
            .with_format("passthrough")
            .with_max_concurrent_decodes(7)
            .with_skip_special_tokens(true)
            .with_trace(true);

        assert_eq!(args.parser_config(base.clone()), base);
    }

    #[test]
    fn test_logging_flags_override_base() {
        let args = parse(&[
            "--list-parsers",
            "--log-level",
            "debug",
            "--log-json",
            "--log-dir",
            "/tmp/logs",
        ]);
        let config = args.logging_config(LoggingConfig::default()).unwrap();

        assert_eq!(config.level, Level::DEBUG);
        assert!(config.json_format);
        assert_eq!(config.log_dir.as_deref(), Some("/tmp/logs"));
    }

    #[test]
    fn test_base_logging_config_kept_without_flags() {
        let base = LoggingConfig {
            level: Level::INFO,
            json_format: true,
            log_dir: Some("/var/log/extractor".to_string()),
            ..Default::default()
        };
        let config = parse(&["--list-parsers"]).logging_config(base).unwrap();

        assert_eq!(config.level, Level::INFO);
        assert!(config.json_format);
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/extractor"));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let args = parse(&["--list-parsers", "--log-level", "loud"]);
        let err = args.logging_config(LoggingConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }
}
