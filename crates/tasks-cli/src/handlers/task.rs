use crate::cli::{AddArgs, Commands, ListArgs, UpdateArgs};
use crate::context::CliContext;
use crate::output;
use tasks_domain::TaskFilters;

pub fn handle(ctx: &mut CliContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Add(AddArgs {
            title,
            description,
            state,
        }) => {
            let task = ctx.add_task(&title, &description, state)?;
            output::output_success(&task);
        }
        Commands::List(args) => {
            let tasks = list(ctx, args);
            output::output_list(tasks);
        }
        Commands::Get { id } => {
            let task = ctx.get_task(id)?;
            output::output_success(&task);
        }
        Commands::Update(UpdateArgs {
            id,
            title,
            description,
            state,
        }) => {
            let task = ctx.update_task(id, title, description, state)?;
            output::output_success(&task);
        }
        Commands::Mark { id, state } => {
            let task = ctx.mark_task(id, state)?;
            output::output_success(&task);
        }
        Commands::Advance { id } => {
            let task = ctx.advance_task(id)?;
            output::output_success(&task);
        }
        Commands::Delete { ids } => {
            let deleted = ctx.delete_tasks(&ids)?;
            output::output_success(serde_json::json!({
                "requested": ids.len(),
                "deleted": deleted,
            }));
        }
        Commands::Clear => {
            ctx.clear()?;
            output::output_success(serde_json::json!({"cleared": true}));
        }
    }
    Ok(())
}

fn list(ctx: &mut CliContext, args: ListArgs) -> Vec<tasks_domain::Task> {
    let filters = TaskFilters {
        state: args.state,
        title_query: args.title,
        description_query: args.description,
    };
    ctx.list_tasks(&filters, args.sort, args.desc)
}
