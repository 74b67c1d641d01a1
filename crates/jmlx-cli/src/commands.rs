//! CLI command implementations

use anyhow::{Context, bail};
use jmlx_core::lexer::lex;
use jmlx_core::{
    ConfigLoader, JavaToken, JmlxConfig, PrettyPrinter, RoundTripValidator, Sanitizer, parse,
};
use jmlx_core::token::AngleSplit;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Load `path`, or discover a configuration file from the working directory
pub fn load_config(path: Option<&Path>) -> anyhow::Result<JmlxConfig> {
    let config = ConfigLoader::load(path, None)?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

fn read_source(file: &Path) -> anyhow::Result<String> {
    fs::read_to_string(file).with_context(|| format!("cannot read {}", file.display()))
}

/// Print command implementation
pub fn print(file: &Path, config: &JmlxConfig) -> anyhow::Result<()> {
    let source = read_source(file)?;
    let parsed = parse(&source, &config.parser).with_context(|| format!("in {}", file.display()))?;
    let printed = PrettyPrinter::new(&config.printer).print(&parsed.ast, parsed.root)?;
    print!("{printed}");
    Ok(())
}

/// Sanitize command implementation
///
/// Prints the file's modeling comments as the parser sees them: every
/// character at its source position, comment syntax blanked.
pub fn sanitize(file: &Path, config: &JmlxConfig) -> anyhow::Result<()> {
    let source = read_source(file)?;
    let (raws, errors) = lex(&source);
    if let Some(error) = errors.first() {
        bail!("{}:{}: {}", file.display(), error.position, error.message);
    }
    let modeling = raws
        .iter()
        .filter(|raw| raw.kind.is_modeling_comment())
        .map(|raw| JavaToken::from_raw(raw, AngleSplit::Whole))
        .collect::<jmlx_core::Result<Vec<_>>>()?;
    debug!(comments = modeling.len(), "sanitizing modeling comments");

    let sanitized = Sanitizer::from_config(&config.parser).sanitize_tokens(&modeling)?;
    println!("{}", sanitized.text());
    Ok(())
}

/// Tokens command implementation
///
/// Dumps the main token chain, including whitespace and comments, after
/// right-angle runs were split for type arguments.
pub fn tokens(file: &Path, config: &JmlxConfig, json: bool) -> anyhow::Result<()> {
    let source = read_source(file)?;
    let parsed = parse(&source, &config.parser).with_context(|| format!("in {}", file.display()))?;
    let tokens = parsed.ast.tokens();
    let Some(range) = parsed.ast.token_range(parsed.root) else {
        bail!("{} produced no tokens", file.display());
    };
    let chain: Vec<&JavaToken> = tokens
        .iter_from(tokens.find_first_token(range.begin()))
        .map(|id| tokens.get(id))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&chain)?);
        return Ok(());
    }
    for token in chain {
        let range = token
            .range()
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        println!("{range}\t{:?}\t{:?}", token.kind(), token.text());
    }
    Ok(())
}

/// Check command implementation
///
/// Returns whether every file round-tripped. Files that do not parse or
/// print are reported and counted as failures.
pub fn check(files: &[impl AsRef<Path>], config: &JmlxConfig) -> anyhow::Result<bool> {
    let validator = RoundTripValidator::with_config(config.parser.clone(), config.printer.clone());
    let mut failed = 0usize;
    for file in files {
        let file = file.as_ref();
        let source = read_source(file)?;
        match validator.validate_round_trip(&source) {
            Ok(result) if result.is_valid() => println!("ok      {}", file.display()),
            Ok(result) => {
                failed += 1;
                println!("FAILED  {}", file.display());
                for issue in result.issues() {
                    println!("        {issue}");
                }
            }
            Err(err) if err.is_recoverable() => {
                failed += 1;
                println!("FAILED  {}", file.display());
                println!("        {err}");
            }
            Err(err) => return Err(err).with_context(|| format!("in {}", file.display())),
        }
    }
    info!(files = files.len(), failed, "check finished");
    if failed > 0 {
        println!("{failed} of {} files failed", files.len());
    }
    Ok(failed == 0)
}
