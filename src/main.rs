use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use quick_snippet::config::{self, Config};
use quick_snippet::error::{ResultExt, SnippetError};
use quick_snippet::logging;
use quick_snippet::search::{browse_order, search_ranked, SearchEngine};
use quick_snippet::snippets::{NewSnippet, Snippet, SnippetStore};
use quick_snippet::tags;
use quick_snippet::usage::UsageTracker;
use quick_snippet::variables::{missing_variables, substitute_variables};

mod args;
use args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let guard = logging::init(cli.verbose);
    let result = run(cli);
    // exit() skips destructors; flush the log file first
    drop(guard);

    if let Err(e) = result {
        let message = match e.downcast_ref::<SnippetError>() {
            Some(err) if e.chain().count() == 1 => err.user_message(),
            _ => format!("{:#}", e),
        };
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

struct AppContext {
    config: Config,
    config_path: PathBuf,
    store: SnippetStore,
    usage: UsageTracker,
}

impl AppContext {
    fn usage_count(&self, snippet: &Snippet) -> u32 {
        self.usage.count(&snippet.id)
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Search {
            query,
            threshold,
            limit,
            json,
        } => handle_search(&ctx, &query, threshold, limit, json),
        Commands::List { limit, json } => handle_list(&ctx, limit, json),
        Commands::Vars { id } => handle_vars(&ctx, &id),
        Commands::Expand { id, vars, no_track } => handle_expand(&mut ctx, &id, vars, no_track),
        Commands::Add {
            name,
            content,
            description,
            tags,
        } => handle_add(&mut ctx, name, content, description, tags),
        Commands::Delete { ids } => handle_delete(&mut ctx, &ids),
        Commands::Tags { partial } => handle_tags(&ctx, partial.as_deref().unwrap_or("")),
        Commands::Config { validate } => handle_config(&ctx, validate),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path);

    let snippet_path = cli.snippets.clone().unwrap_or_else(|| config.snippet_path());
    let mut store = SnippetStore::new(snippet_path);
    store.load().context("Failed to load snippet library")?;

    let mut usage = UsageTracker::with_path(config::default_usage_path());
    usage.load().warn_on_err();

    debug!(
        snippets = store.len(),
        used = usage.all_counts().len(),
        "Context ready"
    );

    Ok(AppContext {
        config,
        config_path,
        store,
        usage,
    })
}

#[derive(Serialize)]
struct SnippetView<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    usage: u32,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_search(
    ctx: &AppContext,
    query: &str,
    threshold: Option<f64>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let threshold = threshold.unwrap_or_else(|| ctx.config.threshold());
    let limit = limit.unwrap_or(ctx.config.max_results as usize);

    let started = Instant::now();
    let engine = SearchEngine::new(ctx.store.snippets());
    let results = search_ranked(&engine, query, threshold, |s| ctx.usage_count(s), limit);
    logging::log_search_event(
        query.chars().count(),
        results.len(),
        started.elapsed().as_millis() as u64,
    );

    if json {
        let views: Vec<SnippetView> = results
            .iter()
            .map(|r| SnippetView {
                id: &r.record.id,
                name: &r.record.name,
                description: &r.record.description,
                tags: &r.record.tags,
                score: Some(r.score),
                usage: ctx.usage_count(r.record),
            })
            .collect();
        return print_json(&views);
    }

    if results.is_empty() {
        println!("No snippets match '{}'", query.trim());
        return Ok(());
    }
    for result in &results {
        println!(
            "{:>6.2}  {:<24}  {}",
            result.score, result.record.id, result.record.name
        );
    }
    Ok(())
}

fn handle_list(ctx: &AppContext, limit: Option<usize>, json: bool) -> Result<()> {
    let limit = limit.unwrap_or(usize::MAX);
    let ordered = browse_order(ctx.store.snippets(), |s| ctx.usage_count(s), limit);

    if json {
        let views: Vec<SnippetView> = ordered
            .iter()
            .map(|s| SnippetView {
                id: &s.id,
                name: &s.name,
                description: &s.description,
                tags: &s.tags,
                score: None,
                usage: ctx.usage_count(s),
            })
            .collect();
        return print_json(&views);
    }

    for snippet in ordered {
        let used = ctx.usage_count(snippet);
        let tags = if snippet.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", snippet.tags.join(", "))
        };
        println!("{:<24}  {}  ({}x){}", snippet.id, snippet.name, used, tags);
    }
    Ok(())
}

fn find_snippet<'a>(ctx: &'a AppContext, id: &str) -> Result<&'a Snippet> {
    ctx.store
        .get(id)
        .ok_or_else(|| SnippetError::SnippetNotFound(id.to_string()).into())
}

fn handle_vars(ctx: &AppContext, id: &str) -> Result<()> {
    let snippet = find_snippet(ctx, id)?;
    let variables = snippet.variables();
    if variables.is_empty() {
        println!("{} has no variables", snippet.id);
        return Ok(());
    }
    for var in variables {
        match var.default {
            Some(default) => println!("{} (default: {})", var.name, default),
            None => println!("{} (required)", var.name),
        }
    }
    Ok(())
}

fn handle_expand(
    ctx: &mut AppContext,
    id: &str,
    vars: Vec<(String, String)>,
    no_track: bool,
) -> Result<()> {
    let snippet = find_snippet(ctx, id)?;
    let values: HashMap<String, String> = vars.into_iter().collect();
    let variable_count = snippet.variables().len();

    let expanded = match substitute_variables(&snippet.content, &values) {
        Ok(text) => text,
        Err(e) => {
            logging::log_expand_event(id, variable_count, false);
            let missing = missing_variables(&snippet.content, &values);
            return Err(anyhow::Error::new(SnippetError::from(e)).context(format!(
                "Missing values for: {} (pass --var NAME=VALUE)",
                missing.join(", ")
            )));
        }
    };
    logging::log_expand_event(id, variable_count, true);
    print!("{}", expanded);
    if !expanded.ends_with('\n') {
        println!();
    }

    if !no_track {
        let count = ctx.usage.increment(id);
        info!(snippet_id = %id, count = count, "Recorded use");
        ctx.usage.save().log_err();
    }
    Ok(())
}

fn handle_add(
    ctx: &mut AppContext,
    name: String,
    content: String,
    description: Option<String>,
    tags: Option<String>,
) -> Result<()> {
    let new = NewSnippet {
        name,
        content,
        description,
        tags: tags.as_deref().map(tags::parse_tag_list).unwrap_or_default(),
    };
    let id = ctx.store.add_snippet(new)?;
    println!("Added {} to {}", id, ctx.store.path().display());
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, ids: &[String]) -> Result<()> {
    ctx.store.delete_snippets(ids)?;

    let remaining = ctx.store.snippets().iter().map(|s| s.id.as_str());
    if ctx.usage.cleanup_orphaned(remaining) > 0 {
        ctx.usage.save().log_err();
    }

    println!("Deleted {} snippet(s)", ids.len());
    Ok(())
}

fn handle_tags(ctx: &AppContext, input: &str) -> Result<()> {
    let all = ctx.store.all_tags();
    for tag in tags::complete(&all, tags::current_tag(input)) {
        println!("{}", tag);
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, validate: bool) -> Result<()> {
    let errors = ctx.config.validate();

    if validate {
        if errors.is_empty() {
            println!("{}: OK", ctx.config_path.display());
            return Ok(());
        }
        for error in &errors {
            eprintln!("{}", error);
        }
        bail!("{} configuration problem(s) found", errors.len());
    }

    println!("# {}", ctx.config_path.display());
    print!("{}", serde_yaml::to_string(&ctx.config)?);
    for error in &errors {
        eprintln!("warning: {}", error);
    }
    Ok(())
}
