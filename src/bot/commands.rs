use teloxide::utils::command::BotCommands;

/// Slash commands with type-safe parsing
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Paper grid trading commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,

    #[command(description = "Show current balance")]
    Balance,

    #[command(description = "Show session status")]
    Status,

    #[command(description = "Run one grid evaluation now")]
    Tick,

    #[command(description = "Show help message")]
    Help,
}
