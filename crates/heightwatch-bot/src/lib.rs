//! heightwatch-bot: the chat-facing side of heightwatch.
//!
//! [`commands`] turns message text into replies using only the published
//! snapshots in [`PoolState`](heightwatch_state::PoolState); [`discord`]
//! wires that into a serenity gateway client.
//!
//! | Command          | Reply                                   |
//! |------------------|-----------------------------------------|
//! | `.help`          | command list                            |
//! | `.heights`       | every polled pool and its height        |
//! | `.height`        | median height across polled pools       |
//! | `.height <pool>` | one pool's height                       |
//! | `.claim <pool>`  | claim a pool for the requesting user    |

pub mod commands;
pub mod discord;

pub use commands::{Command, respond};
pub use discord::{Handler, connect};
