use colored::Colorize;
use commands::command_argument_builder;
use linkhound_engine::{CrawlConfig, CrawlExport, Crawler, tree};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use url::Url;

mod commands;

const BANNER: &str = r#"
 _ _       _    _                           _
| (_)_ __ | | _| |__   ___  _   _ _ __   __| |
| | | '_ \| |/ / '_ \ / _ \| | | | '_ \ / _` |
| | | | | |   <| | | | (_) | |_| | | | | (_| |
|_|_|_| |_|_|\_\_| |_|\___/ \__,_|_| |_|\__,_|
"#;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();

    let verbose = matches.get_flag("verbose");
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::ERROR })
        .with_target(false)
        .init();

    if !matches.get_flag("quiet") {
        println!("{}", BANNER.cyan());
    }

    let raw_url = matches
        .get_one::<String>("url")
        .expect("clap enforces --url")
        .clone();
    let target = ensure_scheme(raw_url);
    if let Err(e) = Url::parse(&target) {
        eprintln!("{} Invalid URL: {}", "[ERR]".red(), e);
        std::process::exit(1);
    }

    let depth = *matches.get_one::<usize>("depth").expect("depth has a default");
    let only_external = matches.get_flag("ext");
    let only_internal = matches.get_flag("int");
    let output = matches.get_one::<PathBuf>("output").cloned();
    let show_tree = matches.get_flag("tree");
    let concurrency = matches.get_one::<u64>("concurrency").map(|n| *n as usize);

    println!("{} Scanning {} (depth: {})", "[INF]".green(), target, depth);
    if only_external {
        println!("{} Filter: external links only", "[INF]".yellow());
    }
    if only_internal {
        println!("{} Filter: internal links only", "[INF]".yellow());
    }
    if let Some(ref path) = output {
        println!(
            "{} Output will be saved to {}",
            "[INF]".blue(),
            path.display()
        );
    }

    let mut config = CrawlConfig::new(target.clone()).with_max_depth(depth);
    if only_internal {
        config = config.internal_only();
    }
    if only_external {
        config = config.external_only();
    }

    let mut crawler = Crawler::new(config).with_link_callback(Arc::new(|url, is_external| {
        if is_external {
            println!("[{}] {}", "EXT".cyan(), url);
        } else {
            println!("[{}] {}", "INT".green(), url);
        }
    }));
    if let Some(permits) = concurrency {
        crawler = crawler.with_concurrency(permits);
    }

    let results = match crawler.run().await {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{} {}", "[FATAL] Crawler failed:".red(), e);
            std::process::exit(1);
        }
    };

    if show_tree {
        println!("\n{}\n{}", "=== Site Tree ===".magenta(), target);
        let root = tree::build_tree(&target, &results);
        print!("{}", tree::render(&root));
    }

    if let Some(path) = output {
        let tree_node = show_tree.then(|| tree::build_tree(&target, &results));
        let export = CrawlExport::new(target, results, tree_node);
        match export.write_to(&path) {
            Ok(()) => println!("{} Saved results to {}", "[INF]".green(), path.display()),
            Err(e) => eprintln!("{} Failed to save output: {}", "[ERR]".red(), e),
        }
    }
}

fn ensure_scheme(url: String) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url
    } else {
        format!("https://{url}")
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
