// Telegram transport: commands, menus and delivery of session updates

pub mod commands;
pub mod delivery;
pub mod handlers;
pub mod keyboards;

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::clients::PriceSource;

pub use commands::Command;
pub use delivery::{edit_menu, forward_session_events, retry_delay, send_with_retry};
pub use handlers::{handle_callback, handle_command, handle_text, is_command, parse_amount, BotContext};
pub use keyboards::{asset_menu, main_menu, trade_menu, MenuAction, TradeSide};

/// Update routing: slash commands, then button presses, then free text
pub fn schema<P: PriceSource>() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command::<P>),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback::<P>))
        .branch(Update::filter_message().endpoint(handle_text::<P>))
}

/// Dispatch updates until ctrl-c
pub async fn run<P: PriceSource>(bot: Bot, ctx: Arc<BotContext<P>>) {
    Dispatcher::builder(bot, schema::<P>())
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
