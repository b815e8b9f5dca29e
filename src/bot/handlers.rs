use std::sync::Arc;

use dashmap::DashMap;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MaybeInaccessibleMessage};
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::bot::commands::Command;
use crate::bot::delivery::edit_menu;
use crate::bot::keyboards::{asset_menu, main_menu, trade_menu, MenuAction, TradeSide};
use crate::clients::{list_symbols, PriceSource};
use crate::config::ExchangeConfig;
use crate::error::{TradingError, TradingResult};
use crate::session::{SessionHandle, SessionRegistry};

const MENU_PROMPT: &str = "Choose an action:";

/// Shared state injected into every handler
pub struct BotContext<P> {
    pub sessions: SessionRegistry<P>,
    /// Chats waiting for an amount after pressing buy or sell
    pub pending_orders: DashMap<ChatId, TradeSide>,
    pub exchange: ExchangeConfig,
}

impl<P: PriceSource> BotContext<P> {
    pub fn new(sessions: SessionRegistry<P>, exchange: ExchangeConfig) -> Self {
        Self { sessions, pending_orders: DashMap::new(), exchange }
    }

    fn session(&self, chat_id: ChatId) -> SessionHandle {
        self.sessions.session(chat_id.0)
    }
}

/// Parse a free-text trade amount
pub fn parse_amount(text: &str) -> TradingResult<f64> {
    let amount: f64 = text
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| TradingError::InvalidAmount(text.to_string()))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(TradingError::InvalidAmount(text.to_string()));
    }
    Ok(amount)
}

/// Whether a message is a slash command, known or not
pub fn is_command(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

/// Handle slash commands
pub async fn handle_command<P: PriceSource>(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: Arc<BotContext<P>>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let session = ctx.session(chat_id);

    match cmd {
        Command::Start => {
            bot.send_message(chat_id, "Hi! I am a paper grid trading bot. Choose an action:")
                .reply_markup(main_menu())
                .await?;
        }
        Command::Balance => {
            let text = match session.balance().await {
                Ok(balance) => format!("Current balance: {:.2} USD", balance),
                Err(err) => err.user_message(),
            };
            bot.send_message(chat_id, text).reply_markup(main_menu()).await?;
        }
        Command::Status => {
            let text = match session.status().await {
                Ok(status) => status.to_string(),
                Err(err) => err.user_message(),
            };
            bot.send_message(chat_id, text).await?;
        }
        Command::Tick => {
            let text = match session.tick().await {
                Ok(report) => report.to_string(),
                Err(err) => err.user_message(),
            };
            bot.send_message(chat_id, text).await?;
        }
        Command::Help => {
            bot.send_message(chat_id, Command::descriptions().to_string()).await?;
        }
    }

    Ok(())
}

/// Handle inline keyboard presses
pub async fn handle_callback<P: PriceSource>(
    bot: Bot,
    q: CallbackQuery,
    ctx: Arc<BotContext<P>>,
) -> ResponseResult<()> {
    let Some(message) = q.message.as_ref() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let Some(action) = q.data.as_deref().and_then(MenuAction::parse) else {
        warn!("Unknown callback data {:?}", q.data);
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    bot.answer_callback_query(q.id.clone()).await?;
    handle_menu_action(&bot, message, action, &ctx).await
}

async fn handle_menu_action<P: PriceSource>(
    bot: &Bot,
    message: &MaybeInaccessibleMessage,
    action: MenuAction,
    ctx: &BotContext<P>,
) -> ResponseResult<()> {
    let chat_id = message.chat().id;
    let message_id = message.id();
    let session = ctx.session(chat_id);

    match action {
        MenuAction::MainMenu => {
            edit_menu(bot, chat_id, message_id, MENU_PROMPT, Some(main_menu())).await?;
        }
        MenuAction::SelectAsset => {
            let source = ctx.sessions.engine().price_source();
            match list_symbols(source, &ctx.exchange.quote_suffix, ctx.exchange.asset_list_limit).await {
                Ok(symbols) => {
                    edit_menu(bot, chat_id, message_id, "Choose an asset to trade:", Some(asset_menu(&symbols)))
                        .await?;
                }
                Err(err) => {
                    warn!("Asset list failed for chat {}: {}", chat_id, err);
                    edit_menu(bot, chat_id, message_id, err.user_message(), Some(main_menu())).await?;
                }
            }
        }
        MenuAction::Asset(symbol) => {
            let text = match session.select_asset(&symbol).await {
                Ok(selection) => selection.to_string(),
                Err(err) => err.user_message(),
            };
            edit_menu(bot, chat_id, message_id, text, Some(main_menu())).await?;
        }
        MenuAction::Trade => {
            let has_symbol = matches!(session.status().await, Ok(status) if status.symbol.is_some());
            if has_symbol {
                edit_menu(bot, chat_id, message_id, MENU_PROMPT, Some(trade_menu())).await?;
            } else {
                let text = TradingError::no_asset_selected().user_message();
                edit_menu(bot, chat_id, message_id, text, Some(main_menu())).await?;
            }
        }
        MenuAction::Balance => {
            let text = match session.balance().await {
                Ok(balance) => format!("Current balance: {:.2} USD", balance),
                Err(err) => err.user_message(),
            };
            edit_menu(bot, chat_id, message_id, text, Some(main_menu())).await?;
        }
        MenuAction::StartAutoTrade => {
            let text = match session.start_auto_trade().await {
                Ok(true) => {
                    info!("Chat {} started autotrade", chat_id);
                    "Autotrade started. The bot will check the market automatically.".to_string()
                }
                Ok(false) => "Autotrade is already running.".to_string(),
                Err(err) => err.user_message(),
            };
            edit_menu(bot, chat_id, message_id, text, Some(main_menu())).await?;
        }
        MenuAction::StopAutoTrade => {
            let text = match session.stop_auto_trade().await {
                Ok(true) => {
                    info!("Chat {} stopped autotrade", chat_id);
                    "Autotrade stopped.".to_string()
                }
                Ok(false) => "Autotrade is not running.".to_string(),
                Err(err) => err.user_message(),
            };
            edit_menu(bot, chat_id, message_id, text, Some(main_menu())).await?;
        }
        MenuAction::Order(side) => {
            ctx.pending_orders.insert(chat_id, side);
            edit_menu(bot, chat_id, message_id, "Enter the amount to trade:", None).await?;
        }
    }

    Ok(())
}

/// Handle free text: the amount for a pending buy or sell
pub async fn handle_text<P: PriceSource>(
    bot: Bot,
    msg: Message,
    ctx: Arc<BotContext<P>>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if is_command(text) {
        debug!("Ignoring unknown command {:?} in chat {}", text, chat_id);
        return Ok(());
    }

    let Some(side) = ctx.pending_orders.get(&chat_id).map(|entry| *entry.value()) else {
        bot.send_message(chat_id, MENU_PROMPT).reply_markup(main_menu()).await?;
        return Ok(());
    };

    let amount = match parse_amount(text) {
        Ok(amount) => amount,
        Err(err) => {
            // Keep the pending order so the user can retry
            bot.send_message(chat_id, err.user_message()).await?;
            return Ok(());
        }
    };
    ctx.pending_orders.remove(&chat_id);

    let session = ctx.session(chat_id);
    let result = match side {
        TradeSide::Buy => session.buy(amount).await,
        TradeSide::Sell => session.sell(amount).await,
    };
    let reply = match result {
        Ok(receipt) => receipt.to_string(),
        Err(err) => {
            warn!("Chat {} {:?} {} rejected [{}]: {}", chat_id, side, amount, err.category(), err);
            err.user_message()
        }
    };

    bot.send_message(chat_id, reply).await?;
    bot.send_message(chat_id, "Choose your next action:")
        .reply_markup(main_menu())
        .await?;
    Ok(())
}
