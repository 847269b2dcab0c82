use std::io;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use clipbook_cli::{ClipbookConfig, PromptExit, StatusReport, open_review, run_prompt};
use clipbook_report::write_docx;

use crate::cli::{ExportArgs, PublishArgs, ReviewArgs, SourceArgs, StatusArgs};
use crate::summary::{print_load_report, print_mapping, print_status};

fn apply_publish_args(config: &mut ClipbookConfig, args: &PublishArgs) {
    if let Some(dir) = &args.publish_dir {
        config.publish.directory = Some(dir.clone());
    }
    if args.no_prune {
        config.publish.prune = false;
    }
}

fn apply_handle(config: &mut ClipbookConfig, handle: Option<&String>) {
    if let Some(handle) = handle {
        config.citation.handle.clone_from(handle);
    }
}

fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn run_review(args: &ReviewArgs, mut config: ClipbookConfig) -> Result<()> {
    let source = &args.source.source;
    let _span = info_span!("review", source = %source.display()).entered();
    if let Some(interval) = args.save_interval {
        config.review.save_interval = interval;
    }
    if let Some(document) = &args.document {
        config.review.document = Some(document.clone());
    }
    apply_handle(&mut config, args.handle.as_ref());
    apply_publish_args(&mut config, &args.publish);

    let mut opened = open_review(source, &config)?;
    print_load_report(&opened.report);
    println!(
        "Saving every {} actions to {} and {}. Type 'help' for commands.",
        opened.reviewer.session().policy().interval(),
        opened.reviewer.sink().source().display(),
        opened.reviewer.sink().document().display()
    );

    let stdin = io::stdin();
    let exit = run_prompt(&mut opened.reviewer, stdin.lock(), io::stdout())
        .context("review prompt I/O")?;
    let counters = opened.reviewer.session().counters();
    info!(
        passed = counters.pass_count,
        bulleted = counters.bullet_count,
        remaining = opened.reviewer.session().remaining(),
        "review ended"
    );
    match exit {
        PromptExit::Clean => Ok(()),
        PromptExit::SaveFailed(message) => bail!("final save failed: {message}"),
    }
}

pub fn run_status(args: &StatusArgs, config: &ClipbookConfig) -> Result<()> {
    let source = &args.source.source;
    let opened = open_review(source, config)?;
    let report = StatusReport::collect(
        source,
        &opened.reviewer,
        &opened.mapping,
        opened.report,
        local_now(),
    );
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize status")?;
        println!("{json}");
    } else {
        print_status(&report);
    }
    Ok(())
}

/// Regenerate only the document; the source file is not rewritten.
pub fn run_rebuild(args: &SourceArgs, config: &ClipbookConfig) -> Result<()> {
    let source = &args.source;
    let mut opened = open_review(source, config)?;
    opened.reviewer.rebuild_from_source();
    let document = opened.reviewer.sink().document().to_path_buf();
    write_docx(&document, opened.reviewer.session().document())
        .with_context(|| format!("write {}", document.display()))?;
    let index = opened.reviewer.session().topic_index();
    println!(
        "Rebuilt {} ({} topics, {} excerpts)",
        document.display(),
        index.topic_count(),
        index.excerpt_count()
    );
    Ok(())
}

pub fn run_export(args: &ExportArgs, mut config: ClipbookConfig) -> Result<()> {
    apply_handle(&mut config, args.handle.as_ref());
    apply_publish_args(&mut config, &args.publish);
    let mut opened = open_review(&args.source.source, &config)?;
    let location = opened
        .reviewer
        .export_copy(args.name.as_deref())
        .map_err(|error| anyhow::anyhow!("{error}. {}", error.suggestion()))?;
    println!("Exported to {location}");
    Ok(())
}

pub fn run_columns(args: &SourceArgs, config: &ClipbookConfig) -> Result<()> {
    let opened = open_review(&args.source, config)?;
    print_mapping(&opened.mapping);
    Ok(())
}
