//! Discord event handler: command registration and interaction dispatch.

use std::sync::Arc;

use chrono::{Local, Utc};
use serenity::async_trait;
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::client::Context;
use serenity::model::application::{
    Command, CommandInteraction, ComponentInteraction, ComponentInteractionDataKind, Interaction,
};
use serenity::model::gateway::Ready;
use serenity::prelude::EventHandler;
use tracing::{debug, info, warn};

use super::view::{followup_message, register, response_message};
use crate::commands::{
    COMPONENT_PREFIX, HOROSCOPE_COMMAND, SelectorAction, SelectorHandler, is_control_expired,
};
use crate::vk::WallSource;

/// Routes gateway events to the picker.
pub struct Handler<S> {
    pub selector: Arc<SelectorHandler<S>>,
}

impl<S> Handler<S> {
    #[must_use]
    pub fn new(selector: Arc<SelectorHandler<S>>) -> Self {
        Self { selector }
    }
}

impl<S: WallSource + 'static> Handler<S> {
    async fn run_slash(&self, ctx: &Context, command: &CommandInteraction) {
        let today = Local::now().date_naive();
        let screen = self.selector.open(command.user.id.get(), today).await;
        let response = CreateInteractionResponse::Message(response_message(&screen));
        if let Err(e) = command.create_response(&ctx.http, response).await {
            warn!("Failed to answer /{}: {}", HOROSCOPE_COMMAND, e);
        }
    }

    async fn handle_component(&self, ctx: &Context, component: &ComponentInteraction) {
        let values: &[String] = match &component.data.kind {
            ComponentInteractionDataKind::StringSelect { values } => values.as_slice(),
            _ => &[],
        };
        let Some(action) = SelectorAction::parse(&component.data.custom_id, values) else {
            debug!("Ignoring component {}", component.data.custom_id);
            return;
        };

        let rendered_at = component
            .message
            .edited_timestamp
            .unwrap_or(component.message.timestamp)
            .unix_timestamp();
        if is_control_expired(rendered_at, Utc::now().timestamp()) {
            debug!("Picker control expired, dropping {}", action);
            let disable = CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new().components(Vec::new()),
            );
            if let Err(e) = component.create_response(&ctx.http, disable).await {
                warn!("Failed to disable expired picker: {}", e);
            }
            return;
        }

        if let Err(e) = component.defer(&ctx.http).await {
            warn!("Failed to acknowledge picker interaction: {}", e);
            return;
        }

        let screen = self.selector.handle(action, Local::now().date_naive()).await;
        if let Err(e) = component
            .create_followup(&ctx.http, followup_message(&screen))
            .await
        {
            warn!("Failed to send picker follow-up: {}", e);
        }
    }
}

#[async_trait]
impl<S: WallSource + 'static> EventHandler for Handler<S> {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) if command.data.name == HOROSCOPE_COMMAND => {
                self.run_slash(&ctx, &command).await;
            }
            Interaction::Component(component)
                if component.data.custom_id.starts_with(COMPONENT_PREFIX) =>
            {
                self.handle_component(&ctx, &component).await;
            }
            _ => {}
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected and ready!", ready.user.name);
        match Command::set_global_commands(&ctx.http, vec![register()]).await {
            Ok(commands) => info!("Registered {} global command(s)", commands.len()),
            Err(e) => warn!("Error registering global commands: {}", e),
        }
    }
}
