//! ircompare CLI - compare IR summaries with LLM prompt templates
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::{bail, Context};
use clap::{Args, CommandFactory, Parser, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use ircompare::company::CompanyCount;
use ircompare::input::{load_company_list, load_company_texts};
use ircompare::models::Provider;
use ircompare::prompt::{analyze_variables, prompt_stats, validate_prompt};
use ircompare::report::{self, ReportFormat};
use ircompare::template::{TemplateError, TemplateFile};
use ircompare::{AnalysisRequest, Analyzer, CompanyList, Config, Locale, PromptEngine, Template, TemplateLoader, ValidationReport};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ircompare")]
#[command(author, version, about = "Compare IR summaries of several companies with an LLM", long_about = None)]
struct Cli {
    /// Path to a config file (default: ./ircompare.toml, then ~/.config/ircompare/)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Language of markers and messages
    #[arg(long, global = true, value_parser = parse_locale)]
    locale: Option<Locale>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CompanyArgs {
    /// Company list as JSON or TOML
    #[arg(long, conflicts_with_all = ["base", "comp"], required_unless_present = "base")]
    companies: Option<PathBuf>,
    /// Base company as text: first line name, rest summary
    #[arg(long)]
    base: Option<PathBuf>,
    /// Comparison company text file, repeat for each company
    #[arg(long, requires = "base")]
    comp: Vec<PathBuf>,
}

#[derive(Args)]
struct TemplateArgs {
    /// Id of a template from the template directory or a built-in
    #[arg(short, long, conflicts_with = "prompt_file", required_unless_present = "prompt_file")]
    template: Option<String>,
    /// Prompt text file, with or without front matter
    #[arg(long)]
    prompt_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available prompt templates
    Templates {
        /// Only templates of this category
        #[arg(long)]
        category: Option<String>,
        /// Print the front matter of template files as JSON
        #[arg(long)]
        metadata: bool,
    },
    /// Print a template
    Show {
        /// Template id
        id: String,
    },
    /// Print the resolved prompt for a set of companies
    Preview {
        #[command(flatten)]
        companies: CompanyArgs,
        #[command(flatten)]
        template: TemplateArgs,
        /// Stop after expanding aggregate placeholders
        #[arg(long)]
        expanded: bool,
    },
    /// Check a template against a set of companies
    Check {
        #[command(flatten)]
        companies: CompanyArgs,
        #[command(flatten)]
        template: TemplateArgs,
    },
    /// Send the resolved prompt to a model
    Analyze {
        #[command(flatten)]
        companies: CompanyArgs,
        #[command(flatten)]
        template: TemplateArgs,
        /// Model id, see `ircompare models`
        #[arg(short, long)]
        model: String,
        /// Edit the prompt in $EDITOR before sending
        #[arg(long)]
        edit: bool,
        /// Send even when validation reports errors, without asking
        #[arg(short, long)]
        yes: bool,
        /// What to print
        #[arg(long, value_enum, default_value_t = ReportFormat::Full)]
        format: ReportFormat,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List models and whether their provider is configured
    Models,
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn parse_locale(value: &str) -> Result<Locale, String> {
    match value {
        "ja" => Ok(Locale::Japanese),
        "en" => Ok(Locale::English),
        other => Err(format!("unknown locale '{}', expected 'ja' or 'en'", other)),
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    let engine = PromptEngine::new(config.locale);
    let loader = TemplateLoader::new(&config.templates.dir);

    match cli.command {
        Commands::Templates { category, metadata } => {
            if metadata {
                println!("{}", serde_json::to_string_pretty(&loader.metadata_list())?);
                return Ok(());
            }

            let templates = match &category {
                Some(category) => loader.load_by_category(category),
                None => loader.templates(),
            };
            if templates.is_empty() {
                println!("No templates found in {}", loader.dir().display());
            } else {
                for template in templates {
                    println!("{}  {}", template.id.bold(), template.name);
                }
            }
        }
        Commands::Show { id } => {
            let template = loader
                .find(&id)
                .with_context(|| format!("template '{}' not found", id))?;
            println!("{}\n", template.name.bold());
            println!("{}", template.content);
        }
        Commands::Preview {
            companies,
            template,
            expanded,
        } => {
            let companies = load_companies(&companies)?;
            let template = load_template(&loader, &template)?;

            let count = CompanyCount::filled(&companies);
            let text = if expanded {
                engine.expand(&template.content, count)
            } else {
                engine.resolve(&template.content, &companies)
            };
            println!("{}", text);

            print_report(&engine.validate(&template.content, count));
        }
        Commands::Check { companies, template } => {
            let companies = load_companies(&companies)?;
            let template = load_template(&loader, &template)?;

            let variables = analyze_variables(&template.content);
            let stats = prompt_stats(&template.content);
            println!("{} ({})", template.name.bold(), template.id);
            println!(
                "  {} characters, {} words, {} lines, {} variables",
                stats.character_count, stats.word_count, stats.line_count, stats.variable_count
            );
            for variable in &variables.invalid_variables {
                println!("  {} unknown variable {}", "?".yellow(), variable);
            }

            let status = companies.input_status();
            println!(
                "  base company {}, {} of {} comparison companies filled",
                if status.base_company_filled { "filled" } else { "missing" },
                status.comparison_companies_filled,
                companies.comparison_companies.len()
            );

            let report = combined_report(&engine, &template, &companies);
            print_report(&report);
            if !report.is_valid {
                bail!("template check failed with {} error(s)", report.errors.len());
            }
            println!("{}", "✓ Ready to analyze".green());
        }
        Commands::Analyze {
            companies,
            template,
            model,
            edit,
            yes,
            format,
            output,
        } => {
            let companies = load_companies(&companies)?;
            let mut template = load_template(&loader, &template)?;

            if edit {
                template.content = edit::edit(&template.content).context("failed to edit prompt")?;
            }

            let report = combined_report(&engine, &template, &companies);
            print_report(&report);
            for problem in companies.validate(config.locale) {
                eprintln!("{} {}", "warning:".yellow().bold(), problem);
            }

            if !report.is_valid && !yes {
                bail!("validation failed, fix the errors above or pass --yes to send anyway");
            }
            if report.has_warnings() && !yes && atty::is(atty::Stream::Stdin) {
                let proceed = Confirm::new()
                    .with_prompt("Send the prompt despite the warnings?")
                    .default(false)
                    .interact()?;
                if !proceed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            let locale = config.locale;
            let analyzer = Analyzer::new(config)?;
            let request = AnalysisRequest {
                companies,
                prompt: template.content.clone(),
                model_id: model,
            };

            eprintln!("Analyzing with {}...", request.model_id);
            let result = analyzer.execute(&template.name, &request).await?;
            if let Some(error) = &result.error {
                bail!("analysis failed: {}", error);
            }

            let text = report::render(&result, format, locale);
            match output {
                Some(path) => {
                    fs::write(&path, text)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("{} {}", "Saved to".green(), path.display());
                }
                None => println!("{}", text),
            }
            eprintln!(
                "{} input / {} output tokens, estimated ${:.4}",
                result.usage.input_tokens, result.usage.output_tokens, result.usage.estimated_cost
            );
        }
        Commands::Models => {
            for provider in [Provider::AzureOpenai, Provider::Gemini] {
                let mark = if config.provider_configured(provider) {
                    "configured".green()
                } else {
                    "not configured".red()
                };
                println!("{} ({})", provider.to_string().bold(), mark);
                for model in config.models.iter().filter(|m| m.provider == provider) {
                    println!(
                        "  {:<22} {:<20} max {} tokens, ${}/${} per 1K",
                        model.id, model.name, model.max_tokens, model.pricing.input, model.pricing.output
                    );
                }
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ircompare", &mut io::stdout());
        }
    }

    Ok(())
}

fn load_companies(args: &CompanyArgs) -> anyhow::Result<CompanyList> {
    let companies = match (&args.companies, &args.base) {
        (Some(path), _) => load_company_list(path)?,
        (None, Some(base)) => load_company_texts(base, &args.comp)?,
        (None, None) => bail!("pass --companies FILE or --base FILE"),
    };
    Ok(companies)
}

fn load_template(loader: &TemplateLoader, args: &TemplateArgs) -> anyhow::Result<Template> {
    match (&args.template, &args.prompt_file) {
        (Some(id), _) => loader
            .find(id)
            .with_context(|| format!("template '{}' not found", id)),
        (None, Some(path)) => load_prompt_file(path),
        (None, None) => bail!("pass --template ID or --prompt-file FILE"),
    }
}

/// A prompt file may be a full template or just the prompt text.
fn load_prompt_file(path: &Path) -> anyhow::Result<Template> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    match TemplateFile::parse(path, &raw) {
        Ok(file) => Ok(file.into_template()),
        Err(TemplateError::MissingFrontMatter(_)) => {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "prompt".to_string());
            Ok(Template::new(name.clone(), name, raw.trim()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Placeholder checks plus the prompt's own name and length checks
fn combined_report(engine: &PromptEngine, template: &Template, companies: &CompanyList) -> ValidationReport {
    let placeholders = engine.validate(&template.content, CompanyCount::filled(companies));
    let prompt = validate_prompt(&template.name, &template.content, engine.locale);

    let mut errors = prompt.errors;
    errors.extend(placeholders.errors);
    ValidationReport::from_parts(placeholders.warnings, errors)
}

fn print_report(report: &ValidationReport) {
    for warning in &report.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    for error in &report.errors {
        eprintln!("{} {}", "error:".red().bold(), error);
    }
}
