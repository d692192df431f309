//! Types the game host hands to the plugin.

use std::fmt;

/// Numeric item id as the host defines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u16);

/// Numeric block id as the host defines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u16);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One gameplay event forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    ItemCrafted { item: ItemId },
    ItemSwung { item: ItemId },
    BlockPlaced { block: BlockId },
    BlockMined { block: BlockId },
    /// `pristine` is true when the block has never changed since world
    /// generation.
    BlockOpened { block: BlockId, pristine: bool },
    WisdomScrollFound,
    BookWritten,
    Teleported,
    ArcadeGamePlayed,
}

impl HostEvent {
    /// Dispatch key for handler subscriptions.
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::ItemCrafted { .. } => "item_crafted",
            HostEvent::ItemSwung { .. } => "item_swung",
            HostEvent::BlockPlaced { .. } => "block_placed",
            HostEvent::BlockMined { .. } => "block_mined",
            HostEvent::BlockOpened { .. } => "block_opened",
            HostEvent::WisdomScrollFound => "wisdom_scroll_found",
            HostEvent::BookWritten => "book_written",
            HostEvent::Teleported => "teleported",
            HostEvent::ArcadeGamePlayed => "arcade_game_played",
        }
    }
}
