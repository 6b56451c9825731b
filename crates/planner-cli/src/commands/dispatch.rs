use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Employee { action } => commands::employee::handle(&action, ctx, flags).await,
        Commands::Initiative { action } => commands::initiative::handle(&action, ctx, flags).await,
        Commands::Thread { action } => commands::thread::handle(&action, ctx, flags).await,
        Commands::Formation { action } => commands::formation::handle(&action, ctx, flags).await,
        Commands::Budget { action } => commands::budget::handle(&action, ctx, flags).await,
        Commands::Expense { action } => commands::expense::handle(&action, ctx, flags).await,
        Commands::Finance { action } => commands::finance::handle(&action, ctx, flags).await,
        Commands::Notify { action } => commands::notify::handle(&action, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Sla(args) => commands::sla::handle(&args, ctx, flags).await,
        Commands::Watch(args) => commands::watch::handle(&args, ctx).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
