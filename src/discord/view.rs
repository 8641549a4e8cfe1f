//! Conversion of picker screens into serenity builders.

use serenity::builder::{
    CreateActionRow, CreateButton, CreateCommand, CreateEmbed, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateSelectMenu, CreateSelectMenuKind,
    CreateSelectMenuOption,
};
use serenity::model::application::ButtonStyle;

use crate::commands::view::{ARROW_LEFT, ARROW_RIGHT, PICKER_PLACEHOLDER};
use crate::commands::{HOROSCOPE_COMMAND, Picker, ResultCard, Screen};

/// Slash command definition.
pub fn register() -> CreateCommand {
    CreateCommand::new(HOROSCOPE_COMMAND)
        .name_localized("ru", "гороскоп")
        .description("🔮 Get today's horoscope for your zodiac sign")
        .description_localized("ru", "🔮 Получить гороскоп по знаку зодиака")
}

/// Sign menu row plus the `⬅️ | date | ➡️` row.
pub fn picker_rows(picker: &Picker) -> Vec<CreateActionRow> {
    let options = picker
        .options()
        .into_iter()
        .map(|opt| CreateSelectMenuOption::new(opt.label, opt.value).emoji(opt.emoji))
        .collect();
    let menu = CreateSelectMenu::new(picker.menu_id(), CreateSelectMenuKind::String { options })
        .placeholder(PICKER_PLACEHOLDER);

    let stepper = vec![
        CreateButton::new(picker.prev_id())
            .label(ARROW_LEFT)
            .style(ButtonStyle::Secondary),
        CreateButton::new(picker.date_id())
            .label(picker.date_label())
            .style(ButtonStyle::Secondary)
            .disabled(true),
        CreateButton::new(picker.next_id())
            .label(ARROW_RIGHT)
            .style(ButtonStyle::Secondary),
    ];

    vec![
        CreateActionRow::SelectMenu(menu),
        CreateActionRow::Buttons(stepper),
    ]
}

/// Embed showing a lookup result.
pub fn result_embed(card: &ResultCard) -> CreateEmbed {
    CreateEmbed::new()
        .title(&card.title)
        .description(&card.description)
        .color(card.colour)
}

/// Builds the direct response to the slash command.
pub fn response_message(screen: &Screen) -> CreateInteractionResponseMessage {
    let mut builder = CreateInteractionResponseMessage::new()
        .components(picker_rows(&screen.picker))
        .ephemeral(screen.ephemeral);
    if let Some(content) = &screen.content {
        builder = builder.content(content);
    }
    if let Some(card) = &screen.card {
        builder = builder.embed(result_embed(card));
    }
    builder
}

/// Builds the follow-up sent after a deferred component interaction.
pub fn followup_message(screen: &Screen) -> CreateInteractionResponseFollowup {
    let mut builder = CreateInteractionResponseFollowup::new()
        .components(picker_rows(&screen.picker))
        .ephemeral(screen.ephemeral);
    if let Some(content) = &screen.content {
        builder = builder.content(content);
    }
    if let Some(card) = &screen.card {
        builder = builder.embed(result_embed(card));
    }
    builder
}
