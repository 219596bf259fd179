use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use whatnow_core::time::parse_date;
use whatnow_core::{
    CollectionStore, Filters, FocusTimer, JsonDirStore, Level, NullSink, Recurrence, Suggestion, Task, Template,
    WhatNow, dispatch,
};

mod config;
mod outbox;
mod render;
mod state;

use config::Config;
use outbox::OutboxSink;

#[derive(Parser, Debug)]
#[command(
    name = "whatnow",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("WHATNOW_BUILD_SHA"), ")"),
    about = "What should I do now? Small tasks matched to how you feel."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task
    Add {
        /// Required unless --from-template supplies one
        name: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        /// Pre-fill from a saved template
        #[arg(long, value_name = "TEMPLATE_ID")]
        from_template: Option<String>,
        /// Also keep this task's name and costs as a template
        #[arg(long)]
        save_template: bool,
    },

    /// List tasks, most urgent first
    List {
        /// Only tasks past their due date
        #[arg(long)]
        overdue: bool,
    },

    /// Change fields of an existing task
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },

    /// Delete a task
    Delete { id: String },

    /// Saved task presets
    Template {
        #[command(subcommand)]
        command: Option<TemplateCommand>,
    },

    /// Show or edit task categories
    Types {
        #[command(subcommand)]
        command: Option<TypesCommand>,
    },

    /// Suggest tasks that fit your current energy, social battery and time
    Suggest {
        #[arg(long, value_parser = parse_level)]
        energy: Option<Level>,
        #[arg(long, value_parser = parse_level)]
        social: Option<Level>,
        /// Minutes available
        #[arg(long)]
        time: Option<u32>,
        /// Max suggestions printed (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Take a suggestion on
    Accept {
        #[command(flatten)]
        target: Target,
    },

    /// Pass on a suggestion
    Skip {
        #[command(flatten)]
        target: Target,
    },

    /// Mark a task done and collect the points
    Done {
        #[command(flatten)]
        target: Target,
        /// Seconds measured by a focus timer
        #[arg(long)]
        timer_seconds: Option<u32>,
    },

    /// Run a focus timer for a task; Ctrl-C stops it and completes the task
    Focus {
        #[command(flatten)]
        target: Target,
    },

    /// Points, rank and totals
    Stats,

    /// Recently completed tasks
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Effects waiting in the sync outbox
    Outbox {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(clap::Args, Debug, Default)]
struct TaskFields {
    #[arg(long)]
    desc: Option<String>,
    /// Category, e.g. Chores
    #[arg(long = "type")]
    kind: Option<String>,
    /// Minutes (5, 15, 30 or 60)
    #[arg(long)]
    time: Option<u32>,
    #[arg(long, value_parser = parse_level)]
    social: Option<Level>,
    #[arg(long, value_parser = parse_level)]
    energy: Option<Level>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_due)]
    due: Option<chrono::NaiveDate>,
    /// none, daily, weekly or monthly
    #[arg(long, value_parser = parse_recurrence)]
    recurring: Option<Recurrence>,
}

impl TaskFields {
    fn apply(self, t: &mut Task) {
        if let Some(v) = self.desc {
            t.description = Some(v).filter(|d| !d.trim().is_empty());
        }
        if let Some(v) = self.kind {
            t.kind = v;
        }
        if let Some(v) = self.time {
            t.time = Some(v);
        }
        if let Some(v) = self.social {
            t.social = Some(v);
        }
        if let Some(v) = self.energy {
            t.energy = Some(v);
        }
        if let Some(v) = self.due {
            t.due_date = Some(v);
        }
        if let Some(v) = self.recurring {
            t.recurring = v;
        }
    }
}

/// Which suggestion a lifecycle command acts on. With neither an id nor a
/// built-in name, the currently accepted suggestion is used.
#[derive(clap::Args, Debug)]
struct Target {
    id: Option<String>,
    /// Name of a built-in task
    #[arg(long, conflicts_with = "id")]
    fallback: Option<String>,
}

#[derive(Subcommand, Debug)]
enum TypesCommand {
    Add { name: String },
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// List templates (the default)
    List,
    /// Save a template without creating a task
    Add {
        name: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.whatnow/config.toml with defaults
    Init,
}

fn parse_level(s: &str) -> std::result::Result<Level, String> {
    Level::parse(s).ok_or_else(|| format!("expected low, medium or high, got {s:?}"))
}

fn parse_recurrence(s: &str) -> std::result::Result<Recurrence, String> {
    Recurrence::parse(s).ok_or_else(|| format!("expected none, daily, weekly or monthly, got {s:?}"))
}

fn parse_due(s: &str) -> std::result::Result<chrono::NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("expected YYYY-MM-DD, got {s:?}"))
}

fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_tracing(&cfg);

    if let Command::Config { command } = &cli.command {
        match command {
            ConfigCommand::Init => config::init_config()?,
        }
        return Ok(());
    }
    if let Command::Outbox { limit } = &cli.command {
        return show_outbox(&cfg, *limit);
    }

    let store = state::open_store()?;
    let mut svc = WhatNow::open(store);
    if !cfg.suggest.fallback {
        svc = svc.with_builtins(Vec::new());
    }

    run(cli.command, &mut svc, &cfg).await?;
    flush_effects(&mut svc, &cfg).await
}

async fn run(command: Command, svc: &mut WhatNow<JsonDirStore>, cfg: &Config) -> Result<()> {
    let today = svc.today();

    match command {
        Command::Add {
            name,
            fields,
            from_template,
            save_template,
        } => {
            let fill = |t: &mut Task| {
                if let Some(n) = name {
                    t.name = n;
                }
                fields.apply(t);
            };
            let t = match from_template {
                Some(id) => svc
                    .add_task_from_template(&id, fill)?
                    .with_context(|| format!("No template with id {id}"))?,
                None => {
                    let mut draft = Task::new("", "");
                    fill(&mut draft);
                    if draft.name.trim().is_empty() {
                        bail!("A task needs a name (or pass --from-template <id>)");
                    }
                    svc.add_task(draft)?
                }
            };
            println!("Added {}", render::task_line(&t, today));
            if save_template {
                let tpl = svc.add_template(Template::from_task(&t))?;
                println!("Saved template {}", render::template_line(&tpl));
            }
        }

        Command::Template { command } => match command.unwrap_or(TemplateCommand::List) {
            TemplateCommand::List => {
                let templates = svc.templates()?;
                if templates.is_empty() {
                    println!("No templates. Save one with `whatnow add <name> --save-template`.");
                }
                for tpl in &templates {
                    println!("{}", render::template_line(tpl));
                }
            }
            TemplateCommand::Add { name, fields } => {
                let mut draft = Task::new("", name);
                fields.apply(&mut draft);
                let tpl = svc.add_template(Template::from_task(&draft))?;
                println!("Saved template {}", render::template_line(&tpl));
            }
            TemplateCommand::Delete { id } => {
                if !svc.delete_template(&id)? {
                    bail!("No template with id {id}");
                }
                println!("Deleted template {id}");
            }
        },

        Command::List { overdue } => {
            let tasks = if overdue {
                svc.overdue_tasks()?
            } else {
                whatnow_core::find_matching_tasks(&Filters::default(), &svc.tasks()?, today)
            };
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for t in &tasks {
                println!("{}", render::task_line(t, today));
            }
        }

        Command::Edit {
            id,
            name,
            fields,
            clear_due,
        } => {
            let updated = svc.update_task(&id, |t| {
                if let Some(n) = name {
                    t.name = n;
                }
                fields.apply(t);
                if clear_due {
                    t.due_date = None;
                }
            })?;
            match updated {
                Some(t) => println!("Updated {}", render::task_line(&t, today)),
                None => bail!("No task with id {id}"),
            }
        }

        Command::Delete { id } => {
            if !svc.delete_task(&id)? {
                bail!("No task with id {id}");
            }
            println!("Deleted {id}");
        }

        Command::Types { command } => {
            let types = match command {
                None => svc.task_types()?,
                Some(TypesCommand::Add { name }) => svc.add_task_type(&name)?,
                Some(TypesCommand::Remove { name }) => svc.remove_task_type(&name)?,
            };
            println!("{}", types.join(", "));
        }

        Command::Suggest {
            energy,
            social,
            time,
            limit,
        } => {
            let filters = Filters::new(energy, social, time);
            let out = svc.suggest(&filters)?;
            if out.is_empty() {
                println!("Nothing fits right now. Add a task with `whatnow add`.");
            }
            if out.first().is_some_and(Suggestion::is_fallback) {
                println!("None of your tasks fit; some quick ideas:\n");
            }
            for s in out.iter().take(limit.unwrap_or(cfg.suggest.limit)) {
                println!("- {}", render::suggestion_line(s, today));
            }
        }

        Command::Accept { target } => {
            let s = resolve(svc, target)?;
            if let Some(s) = svc.accept(&s)? {
                println!("Accepted: {}. Run `whatnow done` when finished.", s.task().name);
            }
        }

        Command::Skip { target } => {
            let s = resolve(svc, target)?;
            if let Some(s) = svc.skip(&s)? {
                println!("Skipped: {}", s.task().name);
            }
        }

        Command::Done { target, timer_seconds } => {
            let s = resolve(svc, target)?;
            complete(svc, &s, timer_seconds)?;
        }

        Command::Focus { target } => {
            let s = resolve(svc, target)?;
            let seconds = run_focus_timer(&s).await?;
            complete(svc, &s, Some(seconds))?;
        }

        Command::Stats => {
            for line in render::stats_lines(&svc.stats()?, svc.overdue_count()?) {
                println!("{line}");
            }
        }

        Command::History { limit } => {
            let log = svc.completed_log()?;
            if log.is_empty() {
                println!("Nothing completed yet.");
            }
            for e in log.iter().rev().take(limit) {
                println!("{}", render::history_line(e));
            }
        }

        Command::Outbox { .. } | Command::Config { .. } => {}
    }

    Ok(())
}

fn resolve<S: CollectionStore>(svc: &WhatNow<S>, target: Target) -> Result<Suggestion> {
    if let Some(name) = target.fallback {
        return svc
            .fallback_named(&name)
            .with_context(|| format!("No built-in task named {name:?}"));
    }

    let current = svc.current()?;
    match target.id {
        Some(id) => {
            if let Some(cur) = current.filter(|c| c.id() == id) {
                return Ok(cur);
            }
            svc.owned(&id)?.with_context(|| format!("No task with id {id}"))
        }
        None => current.context("Nothing accepted yet; pass a task id or --fallback <name>"),
    }
}

fn complete<S: CollectionStore>(svc: &mut WhatNow<S>, s: &Suggestion, timer_seconds: Option<u32>) -> Result<()> {
    match svc.complete(s, timer_seconds)? {
        Some(report) => {
            for line in render::completion_lines(&report) {
                println!("{line}");
            }
        }
        None => println!("{} is no longer in your list.", s.task().name),
    }
    Ok(())
}

async fn run_focus_timer(s: &Suggestion) -> Result<u32> {
    let mut timer = FocusTimer::new();
    timer.start(s.id());
    println!(
        "Focusing on {} ({}). Ctrl-C to finish.",
        s.task().name,
        render::minutes(s.task().time)
    );

    let mut tick = tokio::time::interval(Duration::from_secs(1));
    tick.tick().await;
    loop {
        tokio::select! {
            _ = tick.tick() => {
                timer.tick();
                eprint!("\r{}", timer.display());
            }
            res = tokio::signal::ctrl_c() => {
                res.context("listen for Ctrl-C")?;
                break;
            }
        }
    }
    eprintln!();

    Ok(timer.finish().unwrap_or(0))
}

/// Hand queued effects to the outbox once local state is on disk.
async fn flush_effects<S: CollectionStore>(svc: &mut WhatNow<S>, cfg: &Config) -> Result<()> {
    let effects = svc.take_effects();
    if effects.is_empty() {
        return Ok(());
    }

    if cfg.sync.enabled {
        let mut sink = OutboxSink::spawn(cfg.sync.outbox_path()?);
        let sent = dispatch(effects, &mut sink);
        sink.close().await;
        debug!(sent, "sync effects queued");
    } else {
        dispatch(effects, &mut NullSink);
    }
    Ok(())
}

fn show_outbox(cfg: &Config, limit: usize) -> Result<()> {
    let path = cfg.sync.outbox_path()?;
    let rows = outbox::read_outbox(&path)?;
    println!("{} pending in {}", rows.len(), path.display());
    for e in rows.iter().rev().take(limit) {
        println!("- {}", e.op());
    }
    Ok(())
}
