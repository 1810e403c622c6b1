//! Quokka CLI
//!
//! Sanitizes an HTML fragment and prints the resulting tree or markup.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use quokka_ast::print_tree;
use quokka_parser::{DomParser, Format, ParserArgs, ParserSettings, serialize};
use quokka_schema::{Schema, SchemaSettings};

/// Sanitize and normalize untrusted HTML
#[derive(Parser, Debug)]
#[command(name = "quokka")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the sanitized tree of a file
    quokka ./fragment.html

    # Parse inline HTML and print the serialized result
    quokka -s --html '<p onclick="x()">Hi<script>bad()</script></p>'

    # Parse as content for a list item, with custom settings
    quokka --context li --settings parser.json --html '<ul><li>a</li></ul>'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Parser settings as a JSON file
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Schema settings as a JSON file
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Parse as content of this element
    #[arg(long, value_name = "TAG")]
    context: Option<String>,

    /// Input format (html or xhtml)
    #[arg(long, default_value = "html")]
    format: Format,

    /// Treat the input as the whole root content
    #[arg(long)]
    root_content: bool,

    /// Treat the input as content being inserted
    #[arg(long)]
    insert: bool,

    /// Print serialized HTML instead of the tree
    #[arg(short, long)]
    serialize: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let html = load_input(&cli)?;
    let parser = build_parser(&cli)?;

    let mut args = ParserArgs {
        context: cli.context.clone(),
        is_root_content: cli.root_content,
        format: cli.format,
        insert: cli.insert,
        ..ParserArgs::default()
    };
    let tree = parser.parse(&html, &mut args);

    if cli.serialize {
        println!("{}", serialize(&tree, parser.schema()));
    } else {
        println!("{}", "=== AST ===".bold());
        print_tree(&tree, tree.root(), 0);
    }

    if args.invalid {
        eprintln!(
            "{} content is not valid inside <{}>",
            "warning:".yellow().bold(),
            tree.name(tree.root())
        );
    }

    Ok(())
}

/// Read the markup from `--html` or the file argument
fn load_input(cli: &Cli) -> anyhow::Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    } else {
        anyhow::bail!("expected a file path or --html")
    }
}

/// Build the parser from the optional settings and schema files
fn build_parser(cli: &Cli) -> anyhow::Result<DomParser> {
    let settings = match cli.settings {
        Some(ref path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ParserSettings::from_json(&json)
                .with_context(|| format!("invalid parser settings in {}", path.display()))?
        }
        None => ParserSettings::default(),
    };

    let schema = match cli.schema {
        Some(ref path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let schema_settings: SchemaSettings = serde_json::from_str(&json)
                .with_context(|| format!("invalid schema settings in {}", path.display()))?;
            Schema::new(&schema_settings)?
        }
        None => Schema::html5(),
    };

    Ok(DomParser::new(settings, schema))
}
