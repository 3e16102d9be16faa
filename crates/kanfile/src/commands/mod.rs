//! Command dispatch for the kanfile CLI.

mod handlers;

use anyhow::Result;
use kanfile_app::Board;
use kanfile_store_json::BoardStore;

use crate::config::BoardConfig;
use crate::Command;

/// Route a parsed command to its handler.
pub fn run<S: BoardStore>(command: Command, mut board: Board<S>, config: &BoardConfig) -> Result<()> {
    match command {
        Command::New {
            title,
            description,
            status,
            priority,
            due,
            tags,
            template,
            vars,
            quick,
        } => handlers::handle_new(
            &mut board,
            title,
            description,
            status,
            priority,
            due,
            tags,
            template,
            vars,
            quick,
        ),
        Command::Ls {
            text,
            priority,
            status,
            due,
            format,
        } => handlers::handle_ls(&board, config, text, priority, status, due, format),
        Command::Show { task } => handlers::handle_show(&board, config, &task),
        Command::Edit {
            task,
            title,
            status,
            priority,
            description,
            due,
            clear_due,
            tags,
            clear_tags,
        } => handlers::handle_edit(
            &mut board,
            &task,
            title,
            status,
            priority,
            description,
            due,
            clear_due,
            tags,
            clear_tags,
        ),
        Command::Mv { tasks, status, onto } => handlers::handle_mv(&mut board, &tasks, status, onto),
        Command::Rm { tasks } => handlers::handle_rm(&mut board, &tasks),
        Command::Import { file } => handlers::handle_import(&mut board, &file),
        Command::Export { format, output, copy } => {
            handlers::handle_export(&board, format, output, copy)
        }
        Command::Stats { format } => handlers::handle_stats(&board, config, format),
        Command::Templates => handlers::handle_templates(),
    }
}
