//! Discord gateway glue.

use serenity::all::{Client, Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use tracing::{debug, info, warn};

use heightwatch_state::{ClaimOwner, PoolState};

use crate::commands::{Command, respond};

/// Answers chat commands from the shared pool state.
pub struct Handler {
    state: PoolState,
}

impl Handler {
    pub fn new(state: PoolState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || msg.author.id == ctx.cache.current_user().id {
            return;
        }

        let Some(command) = Command::parse(&msg.content) else {
            return;
        };
        debug!(?command, user = %msg.author.name, channel = %msg.channel_id, "command received");

        let author = ClaimOwner::new(msg.author.id.get(), msg.author.name.clone());
        for reply in respond(&command, &self.state, &author).await {
            if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
                warn!(error = %e, channel = %msg.channel_id, "failed to send reply");
            }
        }
    }

    async fn ready(&self, _: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "connected to discord");
    }
}

/// Build a gateway client that answers commands from `state`.
pub async fn connect(token: &str, state: PoolState) -> serenity::Result<Client> {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    Client::builder(token, intents)
        .event_handler(Handler::new(state))
        .await
}
