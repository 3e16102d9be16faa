use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use kanfile_app::{Board, DragCoordinator, DragEffect, DropTarget, DueDateEdit, TaskEditData, TaskFilterBuilder};
use kanfile_core::stats::BoardStats;
use kanfile_core::template::{self, QuickAction};
use kanfile_core::{export, Priority, Status, TaskDraft, TaskId};
use kanfile_store_json::BoardStore;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::config::BoardConfig;
use crate::view;
use crate::{ExportFormat, OutputFormat};

#[allow(clippy::too_many_arguments)]
pub(super) fn handle_new<S: BoardStore>(
    board: &mut Board<S>,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    due: Option<String>,
    tags: Vec<String>,
    template: Option<String>,
    vars: Vec<String>,
    quick: Option<String>,
) -> Result<()> {
    if template.is_some() && quick.is_some() {
        bail!("--template and --quick are mutually exclusive");
    }

    let now = OffsetDateTime::now_utc();
    let mut draft = match (template, quick) {
        (Some(template_id), None) => {
            let template = template::find_template(&template_id)
                .ok_or_else(|| anyhow!("unknown template: {template_id}"))?;
            let variables = parse_vars(&vars)?;
            let mut draft = template.apply(&variables, now);
            if let Some(title) = title {
                draft.title = title;
            }
            draft
        }
        (None, Some(action_id)) => {
            let QuickAction { mut draft, .. } = template::find_quick_action(&action_id, now)
                .ok_or_else(|| anyhow!("unknown quick action: {action_id}"))?;
            // Quick-action titles are prefixes the user completes.
            if let Some(title) = title {
                draft.title.push_str(&title);
            }
            draft
        }
        (None, None) => {
            let title = title.ok_or_else(|| anyhow!("--title is required without --template or --quick"))?;
            TaskDraft {
                title,
                ..TaskDraft::default()
            }
        }
        (Some(_), Some(_)) => unreachable!("rejected above"),
    };

    if let Some(description) = description {
        draft.description = Some(description);
    }
    if let Some(status) = status {
        draft.status = parse_status(&status)?;
    }
    if let Some(priority) = priority {
        draft.priority = parse_priority(&priority)?;
    }
    if let Some(due) = due {
        draft.due_date = Some(parse_due(&due)?);
    }
    if !tags.is_empty() {
        draft.tags.extend(tags);
    }

    let task = board.add(draft)?;
    println!("created {} {}", task.id, task.title);
    Ok(())
}

pub(super) fn handle_ls<S: BoardStore>(
    board: &Board<S>,
    config: &BoardConfig,
    text: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let filter = TaskFilterBuilder::new()
        .with_text(text)
        .with_priority(priority)
        .with_status(status)
        .with_due(due)
        .build()?;

    let now = OffsetDateTime::now_utc();
    let filtered = filter.apply(board.tasks(), now);
    match format {
        OutputFormat::Table => {
            print!("{}", view::render_board(&filtered, config.due_soon_days, now)?);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&filtered)?),
    }
    Ok(())
}

pub(super) fn handle_show<S: BoardStore>(
    board: &Board<S>,
    config: &BoardConfig,
    task: &str,
) -> Result<()> {
    let id: TaskId = task.parse()?;
    let task = board
        .get(&id)
        .ok_or_else(|| anyhow!("task not found: {id}"))?;
    print!(
        "{}",
        view::render_detail(task, config.due_soon_days, OffsetDateTime::now_utc())?
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(super) fn handle_edit<S: BoardStore>(
    board: &mut Board<S>,
    task: &str,
    title: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    description: Option<String>,
    due: Option<String>,
    clear_due: bool,
    tags: Vec<String>,
    clear_tags: bool,
) -> Result<()> {
    if clear_due && due.is_some() {
        bail!("--due and --clear-due are mutually exclusive");
    }
    if clear_tags && !tags.is_empty() {
        bail!("--tag and --clear-tags are mutually exclusive");
    }

    let id: TaskId = task.parse()?;
    let due_date = if clear_due {
        DueDateEdit::Clear
    } else {
        match due {
            Some(due) => DueDateEdit::Set(parse_due(&due)?),
            None => DueDateEdit::Keep,
        }
    };
    let tags = if clear_tags {
        Some(BTreeSet::new())
    } else if tags.is_empty() {
        None
    } else {
        Some(tags.into_iter().collect())
    };

    let data = TaskEditData {
        title,
        status: status.as_deref().map(parse_status).transpose()?,
        priority: priority.as_deref().map(parse_priority).transpose()?,
        description,
        due_date,
        tags,
    };

    if !board.edit(&id, data)? {
        bail!("task not found: {id}");
    }
    println!("updated {id}");
    Ok(())
}

pub(super) fn handle_mv<S: BoardStore>(
    board: &mut Board<S>,
    tasks: &[String],
    status: Option<String>,
    onto: Option<String>,
) -> Result<()> {
    if tasks.is_empty() {
        bail!("at least one --task is required");
    }

    match (status, onto) {
        (Some(_), Some(_)) => bail!("--status and --onto are mutually exclusive"),
        (None, None) => bail!("either --status or --onto is required"),
        (Some(status), None) => {
            let ids = parse_ids(tasks)?;
            let status = parse_status(&status)?;
            let moved = board.bulk_move(&ids, status)?;
            println!("moved {moved} task(s) to {status}");
        }
        (None, Some(onto)) => {
            let [dragged] = tasks else {
                bail!("--onto moves exactly one --task");
            };
            let dragged: TaskId = dragged.parse()?;
            let target: TaskId = onto.parse()?;

            let mut coordinator = DragCoordinator::new();
            if !coordinator.begin(board.tasks(), &dragged) {
                bail!("task not found: {dragged}");
            }
            let effect = coordinator.drop_on(board.tasks(), Some(&DropTarget::Task(target)));
            if effect == DragEffect::Cancelled {
                println!("nothing to move");
            } else {
                board.apply_drop(effect)?;
                println!("moved {dragged}");
            }
        }
    }
    Ok(())
}

pub(super) fn handle_rm<S: BoardStore>(board: &mut Board<S>, tasks: &[String]) -> Result<()> {
    if tasks.is_empty() {
        bail!("at least one --task is required");
    }
    let ids = parse_ids(tasks)?;
    let removed = board.bulk_delete(&ids)?;
    println!("deleted {removed} task(s)");
    Ok(())
}

pub(super) fn handle_import<S: BoardStore>(board: &mut Board<S>, file: &str) -> Result<()> {
    let payload = if file == "-" {
        let mut payload = String::new();
        std::io::stdin()
            .read_to_string(&mut payload)
            .context("failed to read import payload from stdin")?;
        payload
    } else {
        fs::read_to_string(file).with_context(|| format!("failed to read {file}"))?
    };

    let summary = board.import(&payload).context("import failed")?;
    println!(
        "imported {} task(s), skipped {} duplicate(s)",
        summary.imported, summary.skipped
    );
    Ok(())
}

pub(super) fn handle_export<S: BoardStore>(
    board: &Board<S>,
    format: ExportFormat,
    output: Option<PathBuf>,
    copy: bool,
) -> Result<()> {
    let now = OffsetDateTime::now_utc();
    let content = match format {
        ExportFormat::Json => export::to_json(board.tasks(), now)?,
        ExportFormat::Csv => export::to_csv(board.tasks())?,
        ExportFormat::Markdown => export::to_markdown(board.tasks(), now)?,
    };

    if copy {
        copy_to_clipboard(&content);
    }

    match output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

pub(super) fn handle_stats<S: BoardStore>(
    board: &Board<S>,
    config: &BoardConfig,
    format: OutputFormat,
) -> Result<()> {
    let stats = BoardStats::compute(board.tasks(), config.due_soon_days, OffsetDateTime::now_utc());
    match format {
        OutputFormat::Table => print!("{}", view::render_stats(&stats)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}

pub(super) fn handle_templates() -> Result<()> {
    for (category, templates) in template::templates_by_category() {
        println!("{category}");
        for entry in templates {
            let days = entry
                .estimated_days
                .map(|days| format!(", ~{days}d"))
                .unwrap_or_default();
            println!("  {} {:<14} {} ({}{days})", entry.icon, entry.id, entry.name, entry.description);
        }
        println!();
    }

    println!("Quick actions");
    for action in template::quick_actions(OffsetDateTime::now_utc()) {
        println!("  {} {:<14} {} ({})", action.icon, action.id, action.name, action.description);
    }
    Ok(())
}

/// Clipboard writes are fire-and-forget: a failure is logged, never fatal.
fn copy_to_clipboard(content: &str) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(content.to_owned())) {
        Ok(()) => tracing::info!("export copied to clipboard"),
        Err(err) => tracing::warn!(%err, "failed to copy export to clipboard"),
    }
}

fn parse_vars(vars: &[String]) -> Result<BTreeMap<String, String>> {
    vars.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .ok_or_else(|| anyhow!("--var expects key=value, got: {pair}"))
        })
        .collect()
}

fn parse_ids(tasks: &[String]) -> Result<Vec<TaskId>> {
    tasks.iter().map(|task| Ok(task.parse()?)).collect()
}

fn parse_status(token: &str) -> Result<Status> {
    token.parse().map_err(|err| anyhow!("{err}"))
}

fn parse_priority(token: &str) -> Result<Priority> {
    token.parse().map_err(|err| anyhow!("{err}"))
}

fn parse_due(raw: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339)
        .with_context(|| format!("invalid due date (expected RFC 3339): {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanfile_store_json::MemoryStore;

    fn open_board() -> Board<MemoryStore> {
        Board::open(MemoryStore::new()).unwrap_or_else(|err| panic!("must open board: {err}"))
    }

    #[test]
    fn new_requires_a_title_without_a_template() {
        let mut board = open_board();
        let result = handle_new(
            &mut board, None, None, None, None, None, Vec::new(), None, Vec::new(), None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn new_from_template_substitutes_variables() {
        let mut board = open_board();
        handle_new(
            &mut board,
            None,
            None,
            None,
            None,
            None,
            Vec::new(),
            Some("bug-fix".into()),
            vec!["bug_title=Login fails".into()],
            None,
        )
        .unwrap_or_else(|err| panic!("must create from template: {err}"));

        let task = &board.tasks()[0];
        assert_eq!(task.title, "Fix: Login fails");
        assert_eq!(task.priority, Priority::High);
        assert!(task.due_date.is_some());
    }

    #[test]
    fn quick_action_title_prefix_is_completed() {
        let mut board = open_board();
        handle_new(
            &mut board,
            Some("call the bank".into()),
            None,
            None,
            None,
            None,
            Vec::new(),
            None,
            Vec::new(),
            Some("urgent-task".into()),
        )
        .unwrap_or_else(|err| panic!("must create from quick action: {err}"));

        assert_eq!(board.tasks()[0].title, "Urgent: call the bank");
    }

    #[test]
    fn mv_onto_rejects_multiple_tasks() {
        let mut board = open_board();
        let result = handle_mv(
            &mut board,
            &["a".into(), "b".into()],
            None,
            Some("c".into()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn malformed_vars_are_rejected() {
        let err = parse_vars(&["no-equals-sign".into()]).expect_err("pair must be rejected");
        assert!(err.to_string().contains("key=value"));
    }
}
