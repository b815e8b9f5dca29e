// Inline keyboards and their callback data

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

const ASSET_PREFIX: &str = "asset_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Button presses understood by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    SelectAsset,
    Asset(String),
    Trade,
    Balance,
    StartAutoTrade,
    StopAutoTrade,
    MainMenu,
    Order(TradeSide),
}

impl MenuAction {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(symbol) = data.strip_prefix(ASSET_PREFIX) {
            if symbol.is_empty() {
                return None;
            }
            return Some(MenuAction::Asset(symbol.to_string()));
        }

        let action = match data {
            "select" => MenuAction::SelectAsset,
            "trade" => MenuAction::Trade,
            "balance" => MenuAction::Balance,
            "start_auto_trade" => MenuAction::StartAutoTrade,
            "stop_auto_trade" => MenuAction::StopAutoTrade,
            "main_menu" => MenuAction::MainMenu,
            "buy" => MenuAction::Order(TradeSide::Buy),
            "sell" => MenuAction::Order(TradeSide::Sell),
            _ => return None,
        };
        Some(action)
    }

    pub fn callback_data(&self) -> String {
        match self {
            MenuAction::SelectAsset => "select".to_string(),
            MenuAction::Asset(symbol) => format!("{}{}", ASSET_PREFIX, symbol),
            MenuAction::Trade => "trade".to_string(),
            MenuAction::Balance => "balance".to_string(),
            MenuAction::StartAutoTrade => "start_auto_trade".to_string(),
            MenuAction::StopAutoTrade => "stop_auto_trade".to_string(),
            MenuAction::MainMenu => "main_menu".to_string(),
            MenuAction::Order(TradeSide::Buy) => "buy".to_string(),
            MenuAction::Order(TradeSide::Sell) => "sell".to_string(),
        }
    }

    fn button(&self, text: impl Into<String>) -> InlineKeyboardButton {
        InlineKeyboardButton::callback(text, self.callback_data())
    }
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![MenuAction::SelectAsset.button("Choose asset")],
        vec![MenuAction::Trade.button("Trade")],
        vec![MenuAction::Balance.button("Show balance")],
        vec![MenuAction::StartAutoTrade.button("Start autotrade")],
        vec![MenuAction::StopAutoTrade.button("Stop autotrade")],
    ])
}

pub fn asset_menu(symbols: &[String]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = symbols
        .iter()
        .map(|symbol| vec![MenuAction::Asset(symbol.clone()).button(symbol.clone())])
        .collect();
    rows.push(vec![MenuAction::MainMenu.button("Back to menu")]);
    InlineKeyboardMarkup::new(rows)
}

pub fn trade_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![MenuAction::Order(TradeSide::Buy).button("Buy")],
        vec![MenuAction::Order(TradeSide::Sell).button("Sell")],
        vec![MenuAction::MainMenu.button("Back to menu")],
    ])
}
